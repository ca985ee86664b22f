use thiserror::Error;

/// Everything that can go wrong between a file on disk and a usable
/// [`Dataset`](super::model::Dataset) / [`FilterDomain`](super::filter::FilterDomain).
#[derive(Debug, Error)]
pub enum DataError {
    /// The dataset holds no rows, so no filter dimension has a domain.
    #[error("dataset contains no rows")]
    EmptyDataset,

    #[error("missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// `row` is the 0-based data row (header excluded).
    #[error("row {row}, column '{column}': {message}")]
    Parse {
        row: usize,
        column: String,
        message: String,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl DataError {
    pub(crate) fn parse(row: usize, column: &str, message: impl Into<String>) -> Self {
        DataError::Parse {
            row,
            column: column.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
