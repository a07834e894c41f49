//! Definitional check that a mask is a period of a truth table.

use crate::bitvec::BitVector;
use crate::truth_table::TruthTable;

/// Outcome of [`check_mask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskCheck {
    /// `f(k) == f(k ⊕ mask)` for every key.
    Valid,
    /// The mask width differs from the table width.
    WidthMismatch,
    /// First key in domain order for which the property fails.
    Counterexample {
        key: BitVector,
        value: BitVector,
        partner_value: BitVector,
    },
}

impl MaskCheck {
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, MaskCheck::Valid)
    }
}

/// Check `table[k] == table[k ⊕ mask]` for every key, stopping at the first
/// failure.
pub fn check_mask(mask: &BitVector, table: &TruthTable) -> MaskCheck {
    if mask.len() != table.width() {
        return MaskCheck::WidthMismatch;
    }
    let values = table.values();
    for (index, &value) in values.iter().enumerate() {
        let partner_value = values[(index as u64 ^ mask.value()) as usize];
        if value != partner_value {
            return MaskCheck::Counterexample {
                key: BitVector::from_value(table.width(), index as u64),
                value,
                partner_value,
            };
        }
    }
    MaskCheck::Valid
}

/// True iff `mask` is an XOR period of `table`.
///
/// The zero mask is trivially a period; this is a definitional check and
/// says nothing about uniqueness or minimality.
///
/// ```
/// use simon_mask::{validate_mask, TruthTable};
///
/// let table = TruthTable::from_pairs([("00", "01"), ("01", "10"), ("10", "01"), ("11", "10")]).unwrap();
/// assert!(validate_mask(&"10".parse().unwrap(), &table));
/// assert!(!validate_mask(&"01".parse().unwrap(), &table));
/// ```
pub fn validate_mask(mask: &BitVector, table: &TruthTable) -> bool {
    check_mask(mask, table).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TruthTable {
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
    fn test_only_hidden_mask_and_zero_are_valid() {
        let t = table();
        let valid: Vec<String> = BitVector::domain(3)
            .filter(|m| validate_mask(m, &t))
            .map(|m| m.to_string())
            .collect();
        assert_eq!(valid, vec!["000", "110"]);
    }

    #[test]
    fn test_counterexample_reports_first_failing_key() {
        let t = table();
        let check = check_mask(&"001".parse().unwrap(), &t);
        assert_eq!(
            check,
            MaskCheck::Counterexample {
                key: "000".parse().unwrap(),
                value: "101".parse().unwrap(),
                partner_value: "010".parse().unwrap(),
            }
        );
    }

    #[test]
    fn test_wrong_width_is_never_valid() {
        assert_eq!(check_mask(&"11".parse().unwrap(), &table()), MaskCheck::WidthMismatch);
    }

    #[test]
    fn test_validation_is_repeatable() {
        let t = table();
        let mask: BitVector = "110".parse().unwrap();
        let first = validate_mask(&mask, &t);
        let second = validate_mask(&mask, &t);
        assert_eq!(first, second);
        assert_eq!(t, table());
    }
}
