//! Error type for the Morse–Smale engine.
//!
//! Most engine operations are infallible once a field has been built: the
//! gradient, graph, arcs and persistence pairs are all derived deterministically
//! and are kept internally consistent by construction. The error cases below are
//! the ones a caller can actually trigger by passing bad arguments, plus the two
//! invariant violations ([`MorseError::NotASaddle`], [`MorseError::WrongSaddleDegree`])
//! that indicate a corrupted Morse–Smale graph rather than a bad call.

use crate::cell::CellId;

/// Errors surfaced by the Morse–Smale engine's public API.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MorseError {
    /// An operation that requires a 1-cell (saddle) was given a cell of another dimension.
    #[error("cell {0:?} is not a saddle")]
    NotASaddle(CellId),

    /// A saddle in the Morse–Smale graph does not have exactly two neighbours of the
    /// expected Morse index. This can only happen if the graph was built from a gradient
    /// that violates the discrete Morse function axioms.
    #[error("saddle {saddle:?} has {found} {expected_kind} neighbours in the MS graph, expected 2")]
    WrongSaddleDegree {
        saddle: CellId,
        expected_kind: &'static str,
        found: usize,
    },

    /// No separatrix arc was recorded between the given saddle and extremum.
    #[error("no arc found from saddle {saddle:?} to extremum {extremum:?}")]
    ArcNotFound { saddle: CellId, extremum: CellId },

    /// `simplify_by_percent` was called with a percentage outside `[0, 100]`.
    #[error("percent must be in [0, 100], got {0}")]
    PercentOutOfRange(f64),

    /// `simplify_by_pairs_remained` was asked to leave fewer than 2 pairs.
    #[error("pairs_remained must be at least 2, got {0}")]
    TooFewPairsRequested(usize),
}

pub type Result<T> = std::result::Result<T, MorseError>;
