//! Property tests for the basis, solver and validator

use proptest::prelude::*;
use simon_mask::{validate_mask, BasisAccumulator, BitVector, TruthTable, UpperTriangular};

/// Rank of a set of vectors by full Gaussian elimination.
fn rank_of(vectors: &[BitVector]) -> usize {
    let mut pivots: Vec<BitVector> = Vec::new();
    for &v in vectors {
        let mut v = v;
        for p in &pivots {
            if let (Some(a), Some(b)) = (v.leading_one(), p.leading_one()) {
                if a == b {
                    v = v ^ *p;
                }
            }
        }
        if !v.is_zero() {
            pivots.push(v);
            pivots.sort_by_key(|p| p.leading_one());
        }
    }
    pivots.len()
}

fn upper_triangular(width: usize, noise: &[u64]) -> UpperTriangular {
    let rows = (0..width)
        .map(|i| {
            let mut row = BitVector::from_value(width, noise[i]);
            for j in 0..=i {
                row.set(j, j == i);
            }
            row
        })
        .collect();
    UpperTriangular::new(rows).unwrap()
}

proptest! {
    #[test]
    fn degenerate_samples_leave_basis_unchanged(
        width in 1usize..=64,
        seeds in prop::collection::vec(any::<u64>(), 0..32),
    ) {
        let mut basis = BasisAccumulator::new(width);
        for s in seeds {
            basis.add(BitVector::from_value(width, s));
        }
        let before: Vec<_> = basis.entries().collect();

        prop_assert!(!basis.add(BitVector::zero(width)));
        prop_assert!(!basis.add(BitVector::ones(width)));

        let after: Vec<_> = basis.entries().collect();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn basis_entries_are_keyed_and_independent(
        width in 1usize..=16,
        samples in prop::collection::vec(any::<u64>(), 0..64),
    ) {
        let mut basis = BasisAccumulator::new(width);
        for s in samples {
            let before = basis.rank();
            let gained = basis.add(BitVector::from_value(width, s));
            prop_assert_eq!(basis.rank(), before + gained as usize);
        }

        let entries: Vec<(usize, BitVector)> = basis.entries().collect();
        for (slot, v) in &entries {
            prop_assert_eq!(v.leading_one(), Some(*slot));
        }
        let vectors: Vec<BitVector> = entries.iter().map(|(_, v)| *v).collect();
        prop_assert_eq!(rank_of(&vectors), vectors.len());
    }

    #[test]
    fn completion_is_upper_triangular(
        width in 2usize..=12,
        samples in prop::collection::vec(any::<u64>(), 0..256),
    ) {
        let mut basis = BasisAccumulator::new(width);
        for s in samples {
            if basis.rank() == width - 1 {
                break;
            }
            basis.add(BitVector::from_value(width, s));
        }
        prop_assume!(basis.rank() == width - 1);

        let completed = basis.complete().unwrap();
        let leads: Vec<Option<usize>> =
            completed.matrix.rows().iter().map(|r| r.leading_one()).collect();
        let expected: Vec<Option<usize>> = (0..width).map(Some).collect();
        prop_assert_eq!(leads, expected);
        prop_assert_eq!(
            completed.matrix.rows()[completed.missing_index],
            BitVector::unit(width, completed.missing_index)
        );
    }

    #[test]
    fn solver_solves_exactly(
        width in 1usize..=64,
        noise in prop::collection::vec(any::<u64>(), 64),
        target in any::<u64>(),
    ) {
        let m = upper_triangular(width, &noise);
        let b = BitVector::from_value(width, target);
        let x = m.solve(&b).unwrap();
        prop_assert_eq!(x.len(), width);
        prop_assert_eq!(m.mul_vec(&x).unwrap(), b);
    }

    #[test]
    fn validator_agrees_with_definition(
        width in 1usize..=5,
        values in prop::collection::vec(any::<u64>(), 32),
        mask in any::<u64>(),
    ) {
        let table = TruthTable::from_fn(width, |k| {
            // small value range so periodic tables actually occur
            BitVector::from_value(width, values[k.value() as usize] % 3)
        })
        .unwrap();
        let mask = BitVector::from_value(width, mask);
        let expected = BitVector::domain(width)
            .all(|k| table.get(k) == table.get(k ^ mask));
        prop_assert_eq!(validate_mask(&mask, &table), expected);
    }
}
