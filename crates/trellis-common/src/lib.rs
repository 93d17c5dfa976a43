//! Shared domain types for the Trellis board client.
//!
//! Everything here mirrors the JSON the board API sends and accepts. The
//! client never assigns identifiers; every `id` comes from the backend.

pub mod models;
pub mod requests;

pub use models::*;
pub use requests::*;
