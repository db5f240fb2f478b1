//! Error types for the loan limits transform

use thiserror::Error;

/// Failures that abort a run. Record-level problems are not errors; those rows
/// are dropped and counted instead.
#[derive(Debug, Error)]
pub enum LimitsError {
    /// The sheet does not have the nine positional columns.
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    /// Input file extension is neither `.xlsx` nor `.csv`.
    #[error("unsupported input format: {0}")]
    UnsupportedInput(String),
    /// Workbook has no worksheet to read.
    #[error("no worksheet found in workbook")]
    MissingWorksheet,
    /// Every record was dropped, so no baseline exists.
    #[error("no valid county records; baseline is undefined")]
    NoValidRecords,
    /// A generated data file does not match the rendered grammar.
    #[error("malformed data file at line {line}: {reason}")]
    MalformedOutput { line: usize, reason: String },
    /// Spreadsheet backend error.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LimitsError>;
