//! Simon Mask - hidden XOR period recovery over GF(2)
//!
//! Copyright (c) 2026 Simon Mask Contributors
//! Licensed under MIT License
//!
//! Recovers the mask `s` of a 2-to-1 function `f(x) = f(x ⊕ s)` from a
//! stream of samples orthogonal to `s`, then certifies it against the truth
//! table.
//!
//! # Pipeline
//!
//! - [`BasisAccumulator`]: online row-echelon basis keyed by leading one
//! - [`BasisAccumulator::complete`]: fills the single missing pivot
//! - [`UpperTriangular::solve`]: back substitution over GF(2)
//! - [`validate_mask`]: `f(k) == f(k ⊕ mask)` for every key
//! - [`MaskRecovery`] / [`find_mask`]: drives the stages end to end
//!
//! # Quick Start
//!
//! ```
//! use simon_mask::{bitmap, MaskRecovery, RecoveryConfig};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(5);
//! let table = bitmap::valid_two_to_one(&"1011".parse().unwrap(), &mut rng)?;
//!
//! let recovery = MaskRecovery::new(RecoveryConfig::for_width(4).with_seed(11));
//! let report = recovery.recover_simulated(&table)?;
//! assert_eq!(report.mask.to_string(), "1011");
//! # Ok::<(), simon_mask::RecoveryError>(())
//! ```

mod obs;

pub mod basis;
pub mod bitmap;
pub mod bitvec;
pub mod cli;
pub mod error;
pub mod oracle;
pub mod recovery;
pub mod solver;
pub mod truth_table;
pub mod validator;

// Re-export main types for convenience
pub use basis::{AccumulatorStats, AddOutcome, BasisAccumulator, CompletedBasis};
pub use bitvec::BitVector;
pub use error::{RecoveryError, Result};
pub use obs::init_logging;
pub use oracle::{SamplingOracle, SimulatedOracle};
pub use recovery::{find_mask, MaskRecovery, RecoveryAttempt, RecoveryConfig, RecoveryReport, Stage};
pub use solver::{back_substitute, UpperTriangular};
pub use truth_table::TruthTable;
pub use validator::{check_mask, validate_mask, MaskCheck};
