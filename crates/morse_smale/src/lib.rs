//! Discrete Morse–Smale complex engine for scalar fields on a toroidal grid.
//!
//! Given a `w` by `h` scalar field with periodic boundary conditions, this
//! crate computes a discrete gradient vector field (Forman's discrete Morse
//! theory), the resulting critical cells and their Morse indices, the
//! Morse–Smale graph, separatrix arcs, persistence pairs, and a topological
//! simplifier that cancels low-persistence pairs by one of two strategies.
//!
//! The typical entry point is [`engine::Engine::build_all`].

pub mod arcs;
pub mod cell;
pub mod engine;
pub mod error;
pub mod field;
pub mod gradient;
pub mod msgraph;
pub mod persistence;
pub mod simplify;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports for quick use at call sites.
pub mod prelude {
    pub use crate::cell::{CellId, GridShape};
    pub use crate::engine::Engine;
    pub use crate::error::{MorseError, Result};
    pub use crate::field::Field;
    pub use crate::persistence::PersistencePair;
    pub use crate::simplify::SimplifyMethod;
}
