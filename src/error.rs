use thiserror::Error;

/// Errors that can occur during dataset access and statistical computations
#[derive(Error, Debug)]
pub enum AnalysisError {
    // Column access errors
    #[error("Column not found: '{0}'")]
    MissingColumn(String),

    #[error("Column '{name}' has type {actual}, expected {expected}")]
    ColumnType {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    // Dataset construction errors
    #[error("Column '{name}' has {actual} rows, dataset has {expected}")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Selection mask has {actual} entries, dataset has {expected} rows")]
    MaskLength { expected: usize, actual: usize },

    // Contingency-table errors
    #[error("Contingency table must be 2x2 for Fisher's exact test, got {rows}x{cols}")]
    NotTwoByTwo { rows: usize, cols: usize },

    #[error("Contingency table cannot be empty")]
    EmptyTable,

    #[error("Contingency table row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Expected frequency is zero at cell ({row}, {col})")]
    ZeroExpectedFrequency { row: usize, col: usize },

    // Filter errors
    #[error("Filter requires at least one column")]
    EmptyColumnList,

    #[error("Invalid percentage: {0} (must be in [0, 100])")]
    InvalidPercent(f64),

    // Numerical errors
    #[error("Numerical error: {0}")]
    Numeric(String),
}

/// Result type for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
