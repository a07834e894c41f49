//! Recovery orchestration.
//!
//! One [`RecoveryAttempt`] runs the whole pipeline for one truth table:
//!
//! ```text
//! Init ──► Sampling ──► Completing ──► Validating ──► Done
//!             │              │              │
//!             └──────────────┴──────────────┴──────► Failed
//! ```
//!
//! Sampling draws from the oracle until the basis holds `n - 1` vectors (or
//! the configured cap is hit), Completing fills the missing pivot and solves
//! for the candidate mask, and Validating checks the candidate against the
//! table. [`RecoveryAttempt::run`] works only once per attempt; retrying
//! means constructing a new one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::basis::{AccumulatorStats, BasisAccumulator, CompletedBasis};
use crate::bitvec::BitVector;
use crate::error::{RecoveryError, Result};
use crate::obs::{obs_debug, obs_warn};
use crate::oracle::{SamplingOracle, SimulatedOracle};
use crate::truth_table::TruthTable;
use crate::validator::{check_mask, MaskCheck};

/// Knobs for a recovery run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Stop with [`RecoveryError::Exhausted`] after this many oracle calls.
    /// `None` samples until the basis is ready, however long that takes.
    pub max_samples: Option<usize>,
    /// Seed for [`SimulatedOracle`]; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl RecoveryConfig {
    /// Samples allowed per bit of width in [`RecoveryConfig::for_width`].
    pub const SAMPLES_PER_BIT: usize = 64;

    /// No cap, entropy seed.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cap the number of oracle calls.
    pub fn bounded(max_samples: usize) -> Self {
        RecoveryConfig {
            max_samples: Some(max_samples),
            seed: None,
        }
    }

    /// A cap proportional to the problem width.
    pub fn for_width(width: usize) -> Self {
        Self::bounded(Self::SAMPLES_PER_BIT * width.max(1))
    }

    /// Same config with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Where an attempt is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Stage {
    Init,
    Sampling,
    Completing,
    Validating,
    Done,
    Failed,
}

/// Everything a successful attempt produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    /// The recovered period.
    pub mask: BitVector,
    /// Pivot that sampling never reached.
    pub missing_index: usize,
    /// Completed upper-triangular rows, in pivot order.
    pub rows: Vec<BitVector>,
    /// Oracle calls made.
    pub samples: usize,
    /// What happened to those samples.
    pub stats: AccumulatorStats,
}

/// State of one recovery for one table. Never shared, never reused.
#[derive(Debug)]
pub struct RecoveryAttempt<'t> {
    table: &'t TruthTable,
    basis: BasisAccumulator,
    stage: Stage,
    samples: usize,
}

impl<'t> RecoveryAttempt<'t> {
    /// Fresh attempt with an empty basis.
    pub fn new(table: &'t TruthTable) -> Self {
        Self {
            table,
            basis: BasisAccumulator::new(table.width()),
            stage: Stage::Init,
            samples: 0,
        }
    }

    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn basis(&self) -> &BasisAccumulator {
        &self.basis
    }

    /// Oracle calls made so far.
    #[inline]
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Drive the attempt to a terminal stage.
    ///
    /// An attempt runs once; calling this again is an input error.
    pub fn run<O>(&mut self, oracle: &mut O, config: &RecoveryConfig) -> Result<RecoveryReport>
    where
        O: SamplingOracle + ?Sized,
    {
        if self.stage != Stage::Init {
            return Err(RecoveryError::invalid(format!(
                "recovery attempt already ran (stage {:?})",
                self.stage
            )));
        }
        let result = self.drive(oracle, config);
        if result.is_err() {
            self.stage = Stage::Failed;
        }
        result
    }

    fn drive<O>(&mut self, oracle: &mut O, config: &RecoveryConfig) -> Result<RecoveryReport>
    where
        O: SamplingOracle + ?Sized,
    {
        self.sample(oracle, config.max_samples)?;
        let (completed, candidate) = self.solve()?;
        let mask = self.validate(candidate)?;
        Ok(RecoveryReport {
            mask,
            missing_index: completed.missing_index,
            rows: completed.matrix.rows().to_vec(),
            samples: self.samples,
            stats: self.basis.stats(),
        })
    }

    fn sample<O>(&mut self, oracle: &mut O, max_samples: Option<usize>) -> Result<()>
    where
        O: SamplingOracle + ?Sized,
    {
        let width = self.table.width();
        let needed = width - 1;
        self.stage = Stage::Sampling;
        obs_debug!(width, needed, ?max_samples, "sampling");

        while self.basis.rank() < needed {
            if max_samples.is_some_and(|cap| self.samples >= cap) {
                obs_warn!(samples = self.samples, rank = self.basis.rank(), needed, "sampling exhausted");
                return Err(RecoveryError::Exhausted {
                    samples: self.samples,
                    rank: self.basis.rank(),
                    needed,
                });
            }
            let sample = oracle.sample(width);
            self.samples += 1;
            self.basis.try_add(sample)?;
        }

        self.stage = Stage::Completing;
        Ok(())
    }

    fn solve(&mut self) -> Result<(CompletedBasis, BitVector)> {
        let completed = self.basis.complete()?;
        let candidate = completed.matrix.solve(&completed.target())?;
        obs_debug!(missing = completed.missing_index, candidate = %candidate, "solved");
        self.stage = Stage::Validating;
        Ok((completed, candidate))
    }

    fn validate(&mut self, candidate: BitVector) -> Result<BitVector> {
        let check = check_mask(&candidate, self.table);
        if check == MaskCheck::Valid {
            self.stage = Stage::Done;
            obs_debug!(mask = %candidate, samples = self.samples, "mask recovered");
            return Ok(candidate);
        }
        obs_warn!(candidate = %candidate, ?check, "candidate mask rejected");
        self.stage = Stage::Failed;
        Err(RecoveryError::NoValidMask { candidate })
    }
}

/// Entry point: runs fresh attempts with a shared config.
#[derive(Clone, Debug, Default)]
pub struct MaskRecovery {
    pub config: RecoveryConfig,
}

impl MaskRecovery {
    pub fn new(config: RecoveryConfig) -> Self {
        Self { config }
    }

    /// Recover the mask of `table`, sampling from `oracle`.
    pub fn find_mask<O>(&self, oracle: &mut O, table: &TruthTable) -> Result<BitVector>
    where
        O: SamplingOracle + ?Sized,
    {
        self.recover(oracle, table).map(|report| report.mask)
    }

    /// Like [`find_mask`](Self::find_mask), returning the full report.
    pub fn recover<O>(&self, oracle: &mut O, table: &TruthTable) -> Result<RecoveryReport>
    where
        O: SamplingOracle + ?Sized,
    {
        RecoveryAttempt::new(table).run(oracle, &self.config)
    }

    /// Recover from an untyped JSON table.
    ///
    /// Input that is not a mapping of bit strings fails with
    /// [`RecoveryError::InvalidInput`] before the oracle is called.
    pub fn find_mask_from_json<O>(&self, oracle: &mut O, table: &Value) -> Result<BitVector>
    where
        O: SamplingOracle + ?Sized,
    {
        let table = TruthTable::from_json_value(table)?;
        self.find_mask(oracle, &table)
    }

    /// Recover using a [`SimulatedOracle`] seeded from the config.
    pub fn recover_simulated(&self, table: &TruthTable) -> Result<RecoveryReport> {
        let mut oracle = match self.config.seed {
            Some(seed) => SimulatedOracle::new(table, seed)?,
            None => SimulatedOracle::from_entropy(table)?,
        };
        self.recover(&mut oracle, table)
    }
}

/// Recover the mask of `table` with an unbounded default config.
///
/// # Examples
///
/// ```
/// use simon_mask::{find_mask, BitVector, TruthTable};
///
/// let table = TruthTable::from_pairs([
///     ("000", "101"), ("001", "010"), ("010", "000"), ("011", "110"),
///     ("100", "000"), ("101", "110"), ("110", "101"), ("111", "010"),
/// ]).unwrap();
///
/// // Samples orthogonal to the hidden mask, as the measurement would give.
/// let mut stream = ["001", "111", "110"].iter().cycle();
/// let mut oracle = |_n: usize| stream.next().unwrap().parse::<BitVector>().unwrap();
///
/// let mask = find_mask(&mut oracle, &table).unwrap();
/// assert_eq!(mask.to_string(), "110");
/// ```
pub fn find_mask<O>(oracle: &mut O, table: &TruthTable) -> Result<BitVector>
where
    O: SamplingOracle + ?Sized,
{
    MaskRecovery::default().find_mask(oracle, table)
}
