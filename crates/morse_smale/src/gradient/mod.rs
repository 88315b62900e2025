//! Discrete gradient vector field construction.

mod build;
mod types;

pub use build::{build, critical_cells_sorted};
pub use types::Gradient;
