//! Column-oriented pull-request dataset
//!
//! Typed columns of equal length behind an ordered name map. Every analysis
//! function borrows a dataset immutably; row subsets come back as new
//! datasets via `select`. Construction enforces the length invariant, column
//! access returns typed errors instead of panicking.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AnalysisError, AnalysisResult};

/// Typed storage for a single column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ColumnData {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Str(Vec<String>),
}

impl ColumnData {
    /// Number of rows in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Bool(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dtype name used in error messages and fingerprints.
    pub fn dtype(&self) -> &'static str {
        match self {
            ColumnData::Bool(_) => "bool",
            ColumnData::Int(_) => "int",
            ColumnData::Float(_) => "float",
            ColumnData::Str(_) => "str",
        }
    }

    fn select(&self, mask: &[bool]) -> ColumnData {
        fn keep<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
            values
                .iter()
                .zip(mask)
                .filter(|(_, &key)| key)
                .map(|(v, _)| v.clone())
                .collect()
        }
        match self {
            ColumnData::Bool(v) => ColumnData::Bool(keep(v, mask)),
            ColumnData::Int(v) => ColumnData::Int(keep(v, mask)),
            ColumnData::Float(v) => ColumnData::Float(keep(v, mask)),
            ColumnData::Str(v) => ColumnData::Str(keep(v, mask)),
        }
    }
}

/// A single categorical cell value with a total order, usable as a
/// contingency-table label.
///
/// Float values order via `total_cmp` so columns containing NaN still sort
/// deterministically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Category {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Eq for Category {}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn rank(v: &Category) -> u8 {
            match v {
                Category::Bool(_) => 0,
                Category::Int(_) => 1,
                Category::Float(_) => 2,
                Category::Str(_) => 3,
            }
        }
        match (self, other) {
            (Category::Bool(a), Category::Bool(b)) => a.cmp(b),
            (Category::Int(a), Category::Int(b)) => a.cmp(b),
            (Category::Float(a), Category::Float(b)) => a.total_cmp(b),
            (Category::Str(a), Category::Str(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Bool(b) => write!(f, "{b}"),
            Category::Int(i) => write!(f, "{i}"),
            Category::Float(v) => write!(f, "{v}"),
            Category::Str(s) => write!(f, "{s}"),
        }
    }
}

/// An immutable table of pull requests: named typed columns of equal length.
///
/// Columns are keyed by name in sorted order, so iteration, serialization
/// and fingerprints are deterministic.
#[derive(Debug, Clone, Serialize)]
pub struct PrDataset {
    columns: BTreeMap<String, ColumnData>,
    rows: usize,
}

impl PrDataset {
    /// Create an empty dataset with no columns and no rows.
    pub fn new() -> Self {
        PrDataset {
            columns: BTreeMap::new(),
            rows: 0,
        }
    }

    /// Add a column. The first column fixes the row count; every later
    /// column must match it.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> AnalysisResult<()> {
        let name = name.into();
        if self.columns.is_empty() {
            self.rows = data.len();
        } else if data.len() != self.rows {
            return Err(AnalysisError::ColumnLengthMismatch {
                name,
                expected: self.rows,
                actual: data.len(),
            });
        }
        self.columns.insert(name, data);
        Ok(())
    }

    /// Builder-style `insert_column`.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        data: ColumnData,
    ) -> AnalysisResult<Self> {
        self.insert_column(name, data)?;
        Ok(self)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> AnalysisResult<&ColumnData> {
        self.columns
            .get(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Boolean column as a slice.
    pub fn bool_column(&self, name: &str) -> AnalysisResult<&[bool]> {
        match self.column(name)? {
            ColumnData::Bool(v) => Ok(v),
            other => Err(AnalysisError::ColumnType {
                name: name.to_string(),
                expected: "bool",
                actual: other.dtype(),
            }),
        }
    }

    /// Numeric column as owned `f64` values. Integer columns are promoted.
    pub fn numeric_column(&self, name: &str) -> AnalysisResult<Vec<f64>> {
        match self.column(name)? {
            ColumnData::Float(v) => Ok(v.clone()),
            ColumnData::Int(v) => Ok(v.iter().map(|&i| i as f64).collect()),
            other => Err(AnalysisError::ColumnType {
                name: name.to_string(),
                expected: "float",
                actual: other.dtype(),
            }),
        }
    }

    /// Column values as ordered categories, for cross-tabulation.
    pub fn category_column(&self, name: &str) -> AnalysisResult<Vec<Category>> {
        let values = match self.column(name)? {
            ColumnData::Bool(v) => v.iter().map(|&b| Category::Bool(b)).collect(),
            ColumnData::Int(v) => v.iter().map(|&i| Category::Int(i)).collect(),
            ColumnData::Float(v) => v.iter().map(|&x| Category::Float(x)).collect(),
            ColumnData::Str(v) => v.iter().map(|s| Category::Str(s.clone())).collect(),
        };
        Ok(values)
    }

    /// The `id` column. Required by the outlier filter to name excluded rows.
    pub fn ids(&self) -> AnalysisResult<&[i64]> {
        match self.column("id")? {
            ColumnData::Int(v) => Ok(v),
            other => Err(AnalysisError::ColumnType {
                name: "id".to_string(),
                expected: "int",
                actual: other.dtype(),
            }),
        }
    }

    /// Boolean-mask row selection. Returns a new dataset with the rows where
    /// the mask is true, in original order.
    pub fn select(&self, mask: &[bool]) -> AnalysisResult<PrDataset> {
        if mask.len() != self.rows {
            return Err(AnalysisError::MaskLength {
                expected: self.rows,
                actual: mask.len(),
            });
        }
        let kept = mask.iter().filter(|&&m| m).count();
        tracing::debug!(rows = self.rows, kept, "selecting row subset");
        let columns = self
            .columns
            .iter()
            .map(|(name, data)| (name.clone(), data.select(mask)))
            .collect();
        Ok(PrDataset {
            columns,
            rows: kept,
        })
    }

    /// SHA-256 over a canonical byte encoding of the dataset, hex-encoded.
    ///
    /// Two datasets with the same columns, dtypes and values (bit-for-bit
    /// for floats) produce the same fingerprint. Used to assert that
    /// reporting functions leave their input untouched.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.columns.len() as u64).to_le_bytes());
        hasher.update((self.rows as u64).to_le_bytes());
        for (name, data) in &self.columns {
            hasher.update((name.len() as u64).to_le_bytes());
            hasher.update(name.as_bytes());
            hasher.update(data.dtype().as_bytes());
            hasher.update((data.len() as u64).to_le_bytes());
            match data {
                ColumnData::Bool(v) => {
                    for &b in v {
                        hasher.update([u8::from(b)]);
                    }
                }
                ColumnData::Int(v) => {
                    for &i in v {
                        hasher.update(i.to_le_bytes());
                    }
                }
                ColumnData::Float(v) => {
                    for &x in v {
                        hasher.update(x.to_bits().to_le_bytes());
                    }
                }
                ColumnData::Str(v) => {
                    for s in v {
                        hasher.update((s.len() as u64).to_le_bytes());
                        hasher.update(s.as_bytes());
                    }
                }
            }
        }
        hex::encode(hasher.finalize())
    }
}

impl Default for PrDataset {
    fn default() -> Self {
        Self::new()
    }
}
