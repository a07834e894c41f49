//! Sampling-oracle seam and a classical simulator behind it.
//!
//! The recovery engine only depends on [`SamplingOracle`]. Any
//! `FnMut(usize) -> BitVector` is an oracle, so tests can script the sample
//! stream directly, while [`SimulatedOracle`] reproduces the measurement
//! statistics of the quantum sampling step from a truth table.

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bitvec::BitVector;
use crate::error::{RecoveryError, Result};
use crate::obs::obs_debug;
use crate::truth_table::TruthTable;

/// Source of sample bit vectors.
///
/// Each call returns one vector of `width` bits. Implementations may be
/// randomized and must not assume anything about how often they are called.
pub trait SamplingOracle {
    fn sample(&mut self, width: usize) -> BitVector;
}

impl<F> SamplingOracle for F
where
    F: FnMut(usize) -> BitVector,
{
    fn sample(&mut self, width: usize) -> BitVector {
        self(width)
    }
}

/// Classical simulation of the Hadamard / oracle / Hadamard measurement.
///
/// Measuring the input register yields `y` with probability
///
/// ```text
/// P(y) = 4^-n · Σ_v | Σ_{x : f(x) = v} (-1)^(x·y) |²
/// ```
///
/// For a 2-to-1 function with mask `s` this is uniform over `{y : y·s = 0}`;
/// for a permutation it is uniform over the whole domain. The integer
/// weights `4^n · P(y)` are tabulated once at construction, in `O(4^n)`.
#[derive(Clone, Debug)]
pub struct SimulatedOracle {
    width: usize,
    support: Vec<BitVector>,
    weights: Vec<u64>,
    dist: WeightedIndex<u64>,
    rng: StdRng,
}

impl SimulatedOracle {
    /// Widest table the simulator will tabulate.
    pub const MAX_WIDTH: usize = 12;

    /// Simulator with a reproducible random stream.
    pub fn new(table: &TruthTable, seed: u64) -> Result<Self> {
        Self::with_rng(table, StdRng::seed_from_u64(seed))
    }

    /// Simulator seeded from the operating system.
    pub fn from_entropy(table: &TruthTable) -> Result<Self> {
        Self::with_rng(table, StdRng::from_entropy())
    }

    fn with_rng(table: &TruthTable, rng: StdRng) -> Result<Self> {
        let width = table.width();
        if width > Self::MAX_WIDTH {
            return Err(RecoveryError::invalid(format!(
                "simulated sampling supports at most {} bits, table has {}",
                Self::MAX_WIDTH,
                width
            )));
        }

        let mut preimages: Vec<Vec<u64>> = vec![Vec::new(); table.len()];
        for (key, value) in table.iter() {
            preimages[value.value() as usize].push(key.value());
        }
        preimages.retain(|group| !group.is_empty());

        let mut support = Vec::new();
        let mut weights = Vec::new();
        for y in BitVector::domain(width) {
            let weight: u64 = preimages
                .iter()
                .map(|group| {
                    let amplitude: i64 = group
                        .iter()
                        .map(|&x| if (x & y.value()).count_ones() & 1 == 1 { -1 } else { 1 })
                        .sum();
                    (amplitude * amplitude) as u64
                })
                .sum();
            if weight > 0 {
                support.push(y);
                weights.push(weight);
            }
        }

        let dist = WeightedIndex::new(weights.iter().copied())
            .map_err(|e| RecoveryError::invalid(format!("degenerate sampling distribution: {}", e)))?;
        obs_debug!(width, support = support.len(), "simulated oracle ready");

        Ok(Self {
            width,
            support,
            weights,
            dist,
            rng,
        })
    }

    /// Outcomes with non-zero probability, in increasing binary order.
    #[inline]
    pub fn support(&self) -> &[BitVector] {
        &self.support
    }

    /// Exact probability of `y`.
    pub fn probability(&self, y: &BitVector) -> f64 {
        if y.len() != self.width {
            return 0.0;
        }
        match self.support.binary_search(y) {
            Ok(i) => self.weights[i] as f64 / 4f64.powi(self.width as i32),
            Err(_) => 0.0,
        }
    }

    /// Draw one outcome.
    pub fn draw(&mut self) -> BitVector {
        self.support[self.dist.sample(&mut self.rng)]
    }
}

impl SamplingOracle for SimulatedOracle {
    /// Draws from the tabulated distribution. The requested width is not
    /// used to reshape the sample; the engine rejects a mismatch.
    fn sample(&mut self, _width: usize) -> BitVector {
        self.draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_table() -> TruthTable {
        TruthTable::from_pairs([
            ("000", "101"),
            ("001", "010"),
            ("010", "000"),
            ("011", "110"),
            ("100", "000"),
            ("101", "110"),
            ("110", "101"),
            ("111", "010"),
        ])
        .unwrap()
    }

    #[test]
    fn test_two_to_one_support_is_orthogonal_complement() {
        let oracle = SimulatedOracle::new(&reference_table(), 7).unwrap();
        let mask: BitVector = "110".parse().unwrap();
        let support: Vec<String> = oracle.support().iter().map(|y| y.to_string()).collect();
        assert_eq!(support, vec!["000", "001", "110", "111"]);
        for y in oracle.support() {
            assert!(!y.dot(&mask));
            assert!((oracle.probability(y) - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_permutation_is_uniform() {
        let table = TruthTable::from_fn(3, |x| x ^ BitVector::from_value(3, 0b101)).unwrap();
        let oracle = SimulatedOracle::new(&table, 1).unwrap();
        assert_eq!(oracle.support().len(), 8);
        let total: f64 = oracle.support().iter().map(|y| oracle.probability(y)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let table = reference_table();
        let mut a = SimulatedOracle::new(&table, 42).unwrap();
        let mut b = SimulatedOracle::new(&table, 42).unwrap();
        let xs: Vec<BitVector> = (0..32).map(|_| a.sample(3)).collect();
        let ys: Vec<BitVector> = (0..32).map(|_| b.sample(3)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_closure_is_an_oracle() {
        let mut calls = 0;
        let mut oracle = |width: usize| {
            calls += 1;
            BitVector::unit(width, 0)
        };
        assert_eq!(SamplingOracle::sample(&mut oracle, 4).to_string(), "1000");
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_rejects_tables_too_wide_to_simulate() {
        let table = TruthTable::from_fn(SimulatedOracle::MAX_WIDTH + 1, |x| x).unwrap();
        assert!(SimulatedOracle::new(&table, 0).unwrap_err().is_invalid_input());
    }
}
