//! Board aggregate view.
//!
//! [`tree`] holds the loaded board/list/card hierarchy and its two
//! reconciliation strategies; [`screen`] wires it to the resource client
//! and the list/card panels.

pub mod screen;
pub mod tree;

pub use screen::{BoardScreen, load_tree};
pub use tree::{BoardTree, Reconcile};
