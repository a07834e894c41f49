//! Back substitution over GF(2).
//!
//! Solves `M · x = b` for a square matrix whose row `i` has its leading one
//! at column `i`. Addition is XOR and multiplication is AND, so each unknown
//! is the target bit XOR the parity of the row against the unknowns already
//! solved:
//!
//! ```text
//! x[i] = b[i] ⊕ parity(M[i] & x)      for i = n-1 down to 0
//! ```
//!
//! With one `u64` per row, each step is a single AND + popcount.

use crate::bitvec::BitVector;
use crate::error::{RecoveryError, Result};

/// Square GF(2) matrix whose row `i` leads at column `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpperTriangular {
    rows: Vec<BitVector>,
}

impl UpperTriangular {
    /// Check the shape and wrap the rows.
    ///
    /// Fails with [`RecoveryError::WidthMismatch`] if any row width differs
    /// from the row count and with [`RecoveryError::NotUpperTriangular`] if
    /// row `i` does not lead at column `i`.
    pub fn new(rows: Vec<BitVector>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(RecoveryError::invalid("matrix has no rows"));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(RecoveryError::WidthMismatch {
                    expected: n,
                    got: row.len(),
                });
            }
            if row.leading_one() != Some(i) {
                return Err(RecoveryError::NotUpperTriangular { row: i });
            }
        }
        Ok(Self { rows })
    }

    /// Dimension `n`.
    #[inline]
    pub fn width(&self) -> usize {
        self.rows.len()
    }

    /// Rows in pivot order.
    #[inline]
    pub fn rows(&self) -> &[BitVector] {
        &self.rows
    }

    /// `M · x` over GF(2).
    pub fn mul_vec(&self, x: &BitVector) -> Result<BitVector> {
        self.check_width(x)?;
        let mut out = BitVector::zero(self.width());
        for (i, row) in self.rows.iter().enumerate() {
            out.set(i, row.dot(x));
        }
        Ok(out)
    }

    /// Unique `x` with `M · x = target`.
    ///
    /// # Examples
    ///
    /// ```
    /// use simon_mask::{BitVector, UpperTriangular};
    ///
    /// let rows = ["110", "010", "001"].iter().map(|s| s.parse().unwrap()).collect();
    /// let m = UpperTriangular::new(rows).unwrap();
    /// let mask = m.solve(&BitVector::unit(3, 1)).unwrap();
    /// assert_eq!(mask.to_string(), "110");
    /// ```
    pub fn solve(&self, target: &BitVector) -> Result<BitVector> {
        self.check_width(target)?;
        let n = self.width();
        let mut x = BitVector::zero(n);
        for i in (0..n).rev() {
            // x[i] is still 0 here and columns < i of the row are 0, so the
            // parity only covers the solved unknowns x[i+1..].
            let carry = self.rows[i].dot(&x);
            x.set(i, target.get(i) ^ carry);
        }
        Ok(x)
    }

    fn check_width(&self, v: &BitVector) -> Result<()> {
        if v.len() != self.width() {
            return Err(RecoveryError::WidthMismatch {
                expected: self.width(),
                got: v.len(),
            });
        }
        Ok(())
    }
}

/// Solve `rows · x = target` by back substitution.
///
/// Convenience wrapper over [`UpperTriangular::new`] and
/// [`UpperTriangular::solve`].
pub fn back_substitute(rows: &[BitVector], target: &BitVector) -> Result<BitVector> {
    UpperTriangular::new(rows.to_vec())?.solve(target)
}
