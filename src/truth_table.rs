//! Truth tables of boolean functions `{0,1}^n -> {0,1}^n`.
//!
//! Tables are stored densely: the value for key `k` lives at index
//! `k.value()`. Every constructor checks well-formedness, so a `TruthTable`
//! in hand always covers the whole domain with equal-width keys and values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::bitvec::BitVector;
use crate::error::{RecoveryError, Result};

/// Immutable, complete truth table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct TruthTable {
    width: usize,
    values: Vec<BitVector>,
}

impl TruthTable {
    /// Widest table accepted (2^20 entries).
    pub const MAX_WIDTH: usize = 20;

    /// Build from `(key, value)` bit-string pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use simon_mask::TruthTable;
    ///
    /// let table = TruthTable::from_pairs([("0", "1"), ("1", "1")]).unwrap();
    /// assert_eq!(table.width(), 1);
    /// assert!(TruthTable::from_pairs([("0", "1")]).is_err());
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut width = None;
        let mut slots: Vec<Option<BitVector>> = Vec::new();

        for (k, v) in pairs {
            let (k, v) = (k.as_ref(), v.as_ref());
            let key: BitVector = k.parse()?;
            let value: BitVector = v.parse()?;

            let n = match width {
                Some(n) => n,
                None => {
                    Self::check_width(key.len())?;
                    slots = vec![None; 1usize << key.len()];
                    width = Some(key.len());
                    key.len()
                }
            };

            if key.len() != n {
                return Err(RecoveryError::invalid(format!(
                    "key {:?} has length {}, expected {}",
                    k,
                    key.len(),
                    n
                )));
            }
            if value.len() != n {
                return Err(RecoveryError::invalid(format!(
                    "value {:?} for key {:?} has length {}, expected {}",
                    v,
                    k,
                    value.len(),
                    n
                )));
            }

            let slot = &mut slots[key.value() as usize];
            if slot.is_some() {
                return Err(RecoveryError::invalid(format!("duplicate key {:?}", k)));
            }
            *slot = Some(value);
        }

        let width = width.ok_or_else(|| RecoveryError::invalid("truth table is empty"))?;
        let mut values = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(v) => values.push(v),
                None => {
                    return Err(RecoveryError::invalid(format!(
                        "missing key {}",
                        BitVector::from_value(width, index as u64)
                    )))
                }
            }
        }

        Ok(Self { width, values })
    }

    /// Build from any string-to-string map.
    pub fn from_map<'a, M>(map: M) -> Result<Self>
    where
        M: IntoIterator<Item = (&'a String, &'a String)>,
    {
        Self::from_pairs(map.into_iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Build from an untyped JSON value, which must be an object of bit strings.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(RecoveryError::invalid(format!(
                    "truth table must be a mapping from bit string to bit string, got {}",
                    json_kind(other)
                )))
            }
        };

        let mut pairs = Vec::with_capacity(object.len());
        for (k, v) in object {
            let v = v.as_str().ok_or_else(|| {
                RecoveryError::invalid(format!(
                    "value for key {:?} must be a bit string, got {}",
                    k,
                    json_kind(v)
                ))
            })?;
            pairs.push((k.as_str(), v));
        }
        Self::from_pairs(pairs)
    }

    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json_value(&value)
    }

    /// Tabulate `f` over the whole domain of the given width.
    pub fn from_fn<F>(width: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(BitVector) -> BitVector,
    {
        Self::check_width(width)?;
        let mut values = Vec::with_capacity(1usize << width);
        for key in BitVector::domain(width) {
            let value = f(key);
            if value.len() != width {
                return Err(RecoveryError::invalid(format!(
                    "value {} for key {} has length {}, expected {}",
                    value,
                    key,
                    value.len(),
                    width
                )));
            }
            values.push(value);
        }
        Ok(Self { width, values })
    }

    /// Load a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(&value)
    }

    /// Save the table as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn check_width(width: usize) -> Result<()> {
        if width == 0 {
            return Err(RecoveryError::invalid("bit strings must not be empty"));
        }
        if width > Self::MAX_WIDTH {
            return Err(RecoveryError::invalid(format!(
                "width {} exceeds the supported maximum of {}",
                width,
                Self::MAX_WIDTH
            )));
        }
        Ok(())
    }

    /// Key and value width `n`.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of entries (`2^n`).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: tables cover a non-empty domain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for `key`, or `None` when the key has the wrong width.
    #[inline]
    pub fn get(&self, key: BitVector) -> Option<BitVector> {
        if key.len() != self.width {
            return None;
        }
        self.values.get(key.value() as usize).copied()
    }

    /// Values in key order.
    #[inline]
    pub fn values(&self) -> &[BitVector] {
        &self.values
    }

    /// `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (BitVector, BitVector)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(i, &v)| (BitVector::from_value(self.width, i as u64), v))
    }
}

impl TryFrom<BTreeMap<String, String>> for TruthTable {
    type Error = RecoveryError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self> {
        Self::from_map(&map)
    }
}

impl From<TruthTable> for BTreeMap<String, String> {
    fn from(table: TruthTable) -> Self {
        table
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
