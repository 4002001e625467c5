//! I/O error types for tempo-io.

use std::path::PathBuf;

use tempo_dtw::DtwError;

/// Errors from series file reading, validation and report writing.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the file extension is neither `.json` nor `.csv`.
    #[error("unsupported series format for {path}: expected a .json or .csv file")]
    UnsupportedFormat {
        /// Path to the input file.
        path: PathBuf,
    },

    /// Returned when a JSON file is malformed or does not have the expected shape.
    #[error("JSON parse error in {path} at line {line}, column {column}")]
    JsonParse {
        /// Path to the JSON file.
        path: PathBuf,
        /// One-based line of the error.
        line: usize,
        /// One-based column of the error.
        column: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a JSON series mixes scalar steps and vector steps.
    #[error("mixed scalar and vector steps in {path}: step {step} differs from step 0")]
    MixedSteps {
        /// Path to the JSON file.
        path: PathBuf,
        /// Index of the first step whose kind differs from step 0.
        step: usize,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the file holds no steps or no frames.
    #[error("no data in {path}")]
    Empty {
        /// Path to the input file.
        path: PathBuf,
    },

    /// Returned when a CSV data row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a CSV cell is NaN, Inf, or not a number.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index.
        col_index: usize,
        /// The raw cell text.
        raw: String,
    },

    /// Returned when parsed values do not form a valid time series.
    #[error("invalid series in {path}")]
    InvalidSeries {
        /// Path to the input file.
        path: PathBuf,
        /// Underlying validation error.
        source: DtwError,
    },

    /// Returned when the session name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid session name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidSessionName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a report cannot be serialized.
    #[error("cannot serialize report for {path}")]
    Serialize {
        /// Path the report was destined for.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a report file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl IoError {
    pub(crate) fn json(path: PathBuf, source: serde_json::Error) -> Self {
        Self::JsonParse {
            path,
            line: source.line(),
            column: source.column(),
            source,
        }
    }
}
