//! Packed GF(2) bit vectors.
//!
//! A [`BitVector`] holds up to 64 bits in a single `u64` word, which turns
//! vector addition into one XOR, inner products into AND + popcount, and the
//! leading-one lookup into one `leading_zeros`.
//!
//! # Bit order
//!
//! ```text
//! position:   0   1   2        (position 0 is the most significant bit)
//! string:    "1   1   0"
//! word:      0b110 = 6         (the word equals the bit string read as binary)
//! ```
//!
//! Because the word is the binary value of the string, a truth-table key can
//! be used directly as an index into a dense table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitXor, BitXorAssign};
use std::str::FromStr;

use crate::error::RecoveryError;

/// Fixed-length vector over GF(2), at most [`BitVector::MAX_LEN`] bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitVector {
    /// Number of logical bits
    len: usize,
    /// Bit `i` (from the left) lives at word bit `len - 1 - i`
    bits: u64,
}

impl BitVector {
    /// Widest vector a single word can hold.
    pub const MAX_LEN: usize = 64;

    /// Mask for the valid bits of a `len`-bit word.
    #[inline(always)]
    const fn width_mask(len: usize) -> u64 {
        if len >= 64 {
            !0u64
        } else {
            (1u64 << len) - 1
        }
    }

    #[inline(always)]
    fn check_len(len: usize) {
        assert!(
            len <= Self::MAX_LEN,
            "bit vector length {len} exceeds {}",
            Self::MAX_LEN
        );
    }

    /// All-zero vector of the given length.
    ///
    /// # Panics
    /// Panics if `len > 64`.
    #[inline]
    pub fn zero(len: usize) -> Self {
        Self::check_len(len);
        Self { len, bits: 0 }
    }

    /// All-ones vector of the given length.
    ///
    /// # Panics
    /// Panics if `len > 64`.
    #[inline]
    pub fn ones(len: usize) -> Self {
        Self::check_len(len);
        Self {
            len,
            bits: Self::width_mask(len),
        }
    }

    /// Unit vector with a single one at `index`.
    ///
    /// # Panics
    /// Panics if `len > 64` or `index >= len`.
    pub fn unit(len: usize, index: usize) -> Self {
        let mut v = Self::zero(len);
        v.set(index, true);
        v
    }

    /// Vector whose bit string is the binary representation of `value`.
    ///
    /// Bits of `value` above `len` are discarded.
    ///
    /// # Panics
    /// Panics if `len > 64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use simon_mask::BitVector;
    ///
    /// let v = BitVector::from_value(3, 0b110);
    /// assert_eq!(v.to_string(), "110");
    /// ```
    #[inline]
    pub fn from_value(len: usize, value: u64) -> Self {
        Self::check_len(len);
        Self {
            len,
            bits: value & Self::width_mask(len),
        }
    }

    /// Build from a slice of 0/1 values, most significant first.
    pub fn from_bits(bits: &[u8]) -> Result<Self, RecoveryError> {
        if bits.len() > Self::MAX_LEN {
            return Err(RecoveryError::invalid(format!(
                "bit vector of length {} exceeds {}",
                bits.len(),
                Self::MAX_LEN
            )));
        }
        let mut word = 0u64;
        for (i, &b) in bits.iter().enumerate() {
            match b {
                0 => word <<= 1,
                1 => word = (word << 1) | 1,
                other => {
                    return Err(RecoveryError::invalid(format!(
                        "bit {} has value {}, expected 0 or 1",
                        i, other
                    )))
                }
            }
        }
        Ok(Self {
            len: bits.len(),
            bits: word,
        })
    }

    /// Every vector of width `len`, in increasing binary order.
    ///
    /// # Panics
    /// Panics if `len >= 64` (the domain would not fit in a `u64` count).
    pub fn domain(len: usize) -> impl Iterator<Item = BitVector> {
        assert!(len < 64, "domain of width {len} is too large to enumerate");
        (0..(1u64 << len)).map(move |value| BitVector { len, bits: value })
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector has no bits at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Binary value of the bit string.
    #[inline]
    pub fn value(&self) -> u64 {
        self.bits
    }

    /// Bit at position `i` (0 = most significant).
    ///
    /// # Panics
    /// Panics if `i >= len`.
    #[inline]
    pub fn get(&self, i: usize) -> bool {
        assert!(i < self.len, "bit index {i} out of range (len={})", self.len);
        (self.bits >> (self.len - 1 - i)) & 1 == 1
    }

    /// Set or clear the bit at position `i`.
    ///
    /// # Panics
    /// Panics if `i >= len`.
    #[inline]
    pub fn set(&mut self, i: usize, bit: bool) {
        assert!(i < self.len, "bit index {i} out of range (len={})", self.len);
        let mask = 1u64 << (self.len - 1 - i);
        if bit {
            self.bits |= mask;
        } else {
            self.bits &= !mask;
        }
    }

    /// True for the all-zero vector.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.bits == 0
    }

    /// True for the all-ones vector. Empty vectors are never all-ones.
    #[inline]
    pub fn is_ones(&self) -> bool {
        self.len > 0 && self.bits == Self::width_mask(self.len)
    }

    /// Position of the most significant set bit, `None` for the zero vector.
    ///
    /// ```
    /// use simon_mask::BitVector;
    ///
    /// let v: BitVector = "0101".parse().unwrap();
    /// assert_eq!(v.leading_one(), Some(1));
    /// assert_eq!(BitVector::zero(4).leading_one(), None);
    /// ```
    #[inline]
    pub fn leading_one(&self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        Some(self.bits.leading_zeros() as usize - (64 - self.len))
    }

    /// Inner product over GF(2): parity of the elementwise AND.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    #[inline]
    pub fn dot(&self, other: &Self) -> bool {
        self.assert_same_len(other, "dot");
        (self.bits & other.bits).count_ones() & 1 == 1
    }

    /// Elementwise XOR (addition over GF(2)).
    ///
    /// # Panics
    /// Panics if the lengths differ.
    #[inline]
    pub fn xor(&self, other: &Self) -> Self {
        self.assert_same_len(other, "xor");
        Self {
            len: self.len,
            bits: self.bits ^ other.bits,
        }
    }

    /// Bits as 0/1 values, most significant first.
    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.len).map(|i| self.get(i) as u8).collect()
    }

    #[inline(always)]
    fn assert_same_len(&self, other: &Self, op: &str) {
        assert_eq!(
            self.len, other.len,
            "{op}: length mismatch ({} vs {})",
            self.len, other.len
        );
    }
}

impl BitXor for BitVector {
    type Output = BitVector;

    fn bitxor(self, rhs: BitVector) -> BitVector {
        self.xor(&rhs)
    }
}

impl BitXorAssign for BitVector {
    fn bitxor_assign(&mut self, rhs: BitVector) {
        *self = self.xor(&rhs);
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.len == 0 {
            return Ok(());
        }
        write!(f, "{:0width$b}", self.bits, width = self.len)
    }
}

impl fmt::Debug for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitVector({})", self)
    }
}

impl FromStr for BitVector {
    type Err = RecoveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() > Self::MAX_LEN {
            return Err(RecoveryError::invalid(format!(
                "bit string of length {} exceeds {}",
                s.len(),
                Self::MAX_LEN
            )));
        }
        let mut bits = 0u64;
        for (i, c) in s.chars().enumerate() {
            bits <<= 1;
            match c {
                '0' => {}
                '1' => bits |= 1,
                other => {
                    return Err(RecoveryError::invalid(format!(
                        "invalid character {:?} at position {} of bit string {:?}",
                        other, i, s
                    )))
                }
            }
        }
        Ok(Self { len: s.len(), bits })
    }
}

impl TryFrom<String> for BitVector {
    type Error = RecoveryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BitVector> for String {
    fn from(v: BitVector) -> String {
        v.to_string()
    }
}
