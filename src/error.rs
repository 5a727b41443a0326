use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChartError>;

/// Everything that aborts a chart build. None of these are retried or
/// partially recovered; absent rows are not errors and never show up here.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("table has {available} body rows, extraction needs {requested}")]
    RowNotFound { requested: usize, available: usize },

    #[error("row {row} sums to {sum:.4}, expected 1.0 within 0.01")]
    MalformedDistribution { row: usize, sum: f64 },

    #[error("invalid proportions: {reason}")]
    InvalidProportions { reason: String },

    #[error("unsupported round count {0} (expected 2 or 3)")]
    UnsupportedRoundCount(usize),

    #[error("invalid table coordinate: row {row}, column {column}")]
    InvalidCoordinate { row: usize, column: usize },

    #[error("cell at row {row}, column {column} is not numeric: {value:?}")]
    InvalidCell {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),

    #[error("font error: {0}")]
    Font(String),
}

impl ChartError {
    pub(crate) fn proportions(reason: impl Into<String>) -> Self {
        Self::InvalidProportions {
            reason: reason.into(),
        }
    }
}
