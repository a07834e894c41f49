//! Generators for periodic truth tables.
//!
//! Used to build inputs for the recovery engine in tests, benchmarks and
//! the `generate` CLI command.

use rand::seq::index;
use rand::Rng;

use crate::bitvec::BitVector;
use crate::error::{RecoveryError, Result};
use crate::truth_table::TruthTable;

/// The permutation `f(x) = x ⊕ mask`.
///
/// # Examples
///
/// ```
/// use simon_mask::bitmap::periodic_one_to_one;
///
/// let table = periodic_one_to_one(&"10".parse().unwrap()).unwrap();
/// assert_eq!(table.get("01".parse().unwrap()).unwrap().to_string(), "11");
/// ```
pub fn periodic_one_to_one(mask: &BitVector) -> Result<TruthTable> {
    TruthTable::from_fn(mask.len(), |x| x ^ *mask)
}

/// A random 2-to-1 function with `f(x) = f(x ⊕ mask)`.
///
/// Keys are paired as `{x, x ⊕ mask}` in domain order and every pair gets a
/// distinct value drawn without replacement from the domain.
pub fn valid_two_to_one<R: Rng + ?Sized>(mask: &BitVector, rng: &mut R) -> Result<TruthTable> {
    let width = mask.len();
    if mask.is_zero() {
        return Err(RecoveryError::invalid(
            "a 2-to-1 function needs a non-zero mask",
        ));
    }
    if width > TruthTable::MAX_WIDTH {
        return Err(RecoveryError::invalid(format!(
            "width {} exceeds the supported maximum of {}",
            width,
            TruthTable::MAX_WIDTH
        )));
    }

    let size = 1usize << width;
    let mut images = index::sample(rng, size, size / 2).into_iter();
    let mut values: Vec<Option<BitVector>> = vec![None; size];

    for key in 0..size {
        if values[key].is_some() {
            continue;
        }
        let partner = key ^ mask.value() as usize;
        let image = images
            .next()
            .map(|v| BitVector::from_value(width, v as u64))
            .ok_or_else(|| RecoveryError::invalid("ran out of distinct images"))?;
        values[key] = Some(image);
        values[partner] = Some(image);
    }

    TruthTable::from_fn(width, |x| {
        values[x.value() as usize].unwrap_or_else(|| BitVector::zero(width))
    })
}
