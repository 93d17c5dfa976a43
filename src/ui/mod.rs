pub mod icons;
pub mod render;
pub mod spinner;

pub use spinner::{Spinner, with_spinner};
