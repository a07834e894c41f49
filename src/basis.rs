//! Online row-echelon basis over GF(2).
//!
//! [`BasisAccumulator`] consumes samples one at a time and keeps at most one
//! vector per leading-one index ("provenance"). Once `n - 1` slots are full,
//! [`BasisAccumulator::complete`] fills the single empty slot with a unit
//! vector, yielding a square upper-triangular matrix.
//!
//! ```text
//! slot 0: 1 1 0 ...      each row leads at its own slot index,
//! slot 1: - (missing)    so reading slots in order gives an
//! slot 2: 0 0 1 ...      upper-triangular matrix
//! ```

use serde::Serialize;

use crate::bitvec::BitVector;
use crate::error::{RecoveryError, Result};
use crate::obs::obs_trace;
use crate::solver::UpperTriangular;

/// What happened to one sample fed to the accumulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AddOutcome {
    /// Stored as-is in an empty slot.
    Inserted { slot: usize },
    /// Collided, and the XOR with the occupant was stored in an empty slot.
    Reduced { slot: usize },
    /// All-zero or all-ones sample; dropped.
    Degenerate,
    /// XOR with the occupant was zero; dropped.
    Dependent,
    /// XOR with the occupant collided again; dropped.
    Unresolved,
}

impl AddOutcome {
    /// Whether the basis gained a dimension.
    #[inline]
    pub fn is_new_dimension(&self) -> bool {
        matches!(self, AddOutcome::Inserted { .. } | AddOutcome::Reduced { .. })
    }
}

/// Running totals of [`AddOutcome`]s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatorStats {
    /// Samples stored in an empty slot as-is.
    pub inserted: usize,
    /// Samples stored after one reduction.
    pub reduced: usize,
    /// All-zero or all-ones samples.
    pub degenerate: usize,
    /// Samples that reduced to zero.
    pub dependent: usize,
    /// Samples that collided twice.
    pub unresolved: usize,
}

impl AccumulatorStats {
    /// Samples seen in total.
    pub fn total(&self) -> usize {
        self.inserted + self.reduced + self.degenerate + self.dependent + self.unresolved
    }

    fn record(&mut self, outcome: AddOutcome) {
        match outcome {
            AddOutcome::Inserted { .. } => self.inserted += 1,
            AddOutcome::Reduced { .. } => self.reduced += 1,
            AddOutcome::Degenerate => self.degenerate += 1,
            AddOutcome::Dependent => self.dependent += 1,
            AddOutcome::Unresolved => self.unresolved += 1,
        }
    }
}

/// Partial row-echelon basis keyed by leading-one index.
#[derive(Clone, Debug)]
pub struct BasisAccumulator {
    width: usize,
    slots: Vec<Option<BitVector>>,
    rank: usize,
    stats: AccumulatorStats,
}

impl BasisAccumulator {
    /// Empty basis for vectors of `width` bits.
    ///
    /// # Panics
    /// Panics if `width` is 0 or above [`BitVector::MAX_LEN`].
    pub fn new(width: usize) -> Self {
        assert!(
            (1..=BitVector::MAX_LEN).contains(&width),
            "basis width {width} out of range"
        );
        Self {
            width,
            slots: vec![None; width],
            rank: 0,
            stats: AccumulatorStats::default(),
        }
    }

    /// Vector width `n`.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of occupied slots.
    #[inline]
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Occupant of the slot for leading-one index `index`.
    #[inline]
    pub fn entry(&self, index: usize) -> Option<BitVector> {
        self.slots.get(index).copied().flatten()
    }

    /// Occupied `(index, vector)` pairs in increasing index order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, BitVector)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|v| (i, v)))
    }

    /// Indices with no occupant.
    pub fn missing(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Sample outcome totals so far.
    #[inline]
    pub fn stats(&self) -> AccumulatorStats {
        self.stats
    }

    /// Feed one sample; true iff the basis gained a dimension.
    ///
    /// A sample of the wrong width is treated as rejected. Use
    /// [`try_add`](Self::try_add) to have that reported as an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use simon_mask::{BasisAccumulator, BitVector};
    ///
    /// let mut basis = BasisAccumulator::new(3);
    /// assert!(basis.add("110".parse().unwrap()));
    /// assert!(!basis.add("110".parse().unwrap())); // dependent
    /// assert!(!basis.add(BitVector::ones(3)));      // degenerate
    /// assert_eq!(basis.rank(), 1);
    /// ```
    pub fn add(&mut self, sample: BitVector) -> bool {
        self.try_add(sample)
            .map(|outcome| outcome.is_new_dimension())
            .unwrap_or(false)
    }

    /// Feed one sample and report exactly what happened to it.
    pub fn try_add(&mut self, sample: BitVector) -> Result<AddOutcome> {
        if sample.len() != self.width {
            return Err(RecoveryError::WidthMismatch {
                expected: self.width,
                got: sample.len(),
            });
        }
        let outcome = self.insert(sample);
        self.stats.record(outcome);
        obs_trace!(sample = %sample, ?outcome, rank = self.rank, "basis sample");
        Ok(outcome)
    }

    fn insert(&mut self, sample: BitVector) -> AddOutcome {
        // All-ones samples are dropped outright, never reduced.
        if sample.is_zero() || sample.is_ones() {
            return AddOutcome::Degenerate;
        }
        let Some(msb) = sample.leading_one() else {
            return AddOutcome::Degenerate;
        };

        let occupant = self.slots[msb];
        let Some(conflict) = occupant else {
            self.store(msb, sample);
            return AddOutcome::Inserted { slot: msb };
        };

        let reduced = conflict ^ sample;
        let Some(msb2) = reduced.leading_one() else {
            return AddOutcome::Dependent;
        };
        if self.slots[msb2].is_some() {
            return AddOutcome::Unresolved;
        }
        self.store(msb2, reduced);
        AddOutcome::Reduced { slot: msb2 }
    }

    #[inline]
    fn store(&mut self, slot: usize, v: BitVector) {
        debug_assert_eq!(v.leading_one(), Some(slot));
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(v);
        self.rank += 1;
    }

    /// Fill the single empty slot with its unit vector.
    ///
    /// Requires exactly `n - 1` occupied slots; anything else is reported as
    /// [`RecoveryError::MissingProvenance`] and leaves the basis untouched.
    pub fn complete(&mut self) -> Result<CompletedBasis> {
        let missing = self.missing();
        if missing.len() != 1 {
            return Err(RecoveryError::MissingProvenance { missing });
        }
        let missing_index = missing[0];
        self.store(missing_index, BitVector::unit(self.width, missing_index));

        let rows: Vec<BitVector> = self.slots.iter().flatten().copied().collect();
        let matrix = UpperTriangular::new(rows)?;
        Ok(CompletedBasis {
            missing_index,
            matrix,
        })
    }
}

/// A square basis produced by [`BasisAccumulator::complete`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedBasis {
    /// Slot that was filled with a unit vector.
    pub missing_index: usize,
    /// Rows ordered by leading-one index.
    pub matrix: UpperTriangular,
}

impl CompletedBasis {
    /// Unit vector at the missing index; the right-hand side for the solver.
    pub fn target(&self) -> BitVector {
        BitVector::unit(self.matrix.width(), self.missing_index)
    }
}
