//! Error type shared by every stage of a mask recovery.

use std::fmt;
use std::io;

use crate::bitvec::BitVector;

/// Errors surfaced by table parsing, basis construction, solving and
/// validation.
///
/// None of these are retried internally. `Exhausted` and `NoValidMask` end
/// one attempt; the caller may start a fresh one.
#[derive(Debug)]
pub enum RecoveryError {
    /// The truth table (or a bit string inside it) is malformed.
    InvalidInput {
        /// Human-readable reason.
        reason: String,
    },
    /// A vector had a different width than the one in use.
    WidthMismatch {
        /// Width in use.
        expected: usize,
        /// Width received.
        got: usize,
    },
    /// The completer did not find exactly one empty pivot slot.
    MissingProvenance {
        /// Every empty slot that was found.
        missing: Vec<usize>,
    },
    /// Row `row` of a matrix handed to the solver does not lead at column `row`.
    NotUpperTriangular {
        /// First offending row.
        row: usize,
    },
    /// The solved mask is not a period of the truth table.
    NoValidMask {
        /// The candidate that failed validation.
        candidate: BitVector,
    },
    /// The sample cap was reached before the basis reached `needed` entries.
    Exhausted {
        /// Samples drawn from the oracle.
        samples: usize,
        /// Basis entries collected.
        rank: usize,
        /// Basis entries required.
        needed: usize,
    },
    /// Filesystem error while loading or saving a table.
    Io(io::Error),
    /// JSON encoding or decoding error.
    Json(serde_json::Error),
}

impl RecoveryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RecoveryError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for the input-validation failure kind.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, RecoveryError::InvalidInput { .. })
    }
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::InvalidInput { reason } => {
                write!(f, "invalid input: {}", reason)
            }
            RecoveryError::WidthMismatch { expected, got } => {
                write!(f, "width mismatch: expected {} bits, got {}", expected, got)
            }
            RecoveryError::MissingProvenance { missing } => write!(
                f,
                "missing-provenance invariant violated: expected exactly one empty slot, found {:?}",
                missing
            ),
            RecoveryError::NotUpperTriangular { row } => {
                write!(f, "matrix is not upper triangular at row {}", row)
            }
            RecoveryError::NoValidMask { candidate } => {
                write!(f, "no valid mask found (candidate {} failed validation)", candidate)
            }
            RecoveryError::Exhausted {
                samples,
                rank,
                needed,
            } => write!(
                f,
                "sampling exhausted after {} samples with {} of {} independent vectors",
                samples, rank, needed
            ),
            RecoveryError::Io(e) => write!(f, "io error: {}", e),
            RecoveryError::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for RecoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecoveryError::Io(e) => Some(e),
            RecoveryError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RecoveryError {
    fn from(e: io::Error) -> Self {
        RecoveryError::Io(e)
    }
}

impl From<serde_json::Error> for RecoveryError {
    fn from(e: serde_json::Error) -> Self {
        RecoveryError::Json(e)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecoveryError>;
