use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body the analysis service attaches to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Returns the server message when `raw` is an error body with a
    /// non-blank `error` field.
    pub fn parse_message(raw: &[u8]) -> Option<String> {
        let body: ErrorBody = serde_json::from_slice(raw).ok()?;
        let message = body.error.trim();
        if message.is_empty() {
            None
        } else {
            Some(message.to_string())
        }
    }
}

/// A 2xx body that does not satisfy the shape the view renders from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResponseShapeError {
    #[error("response has no summary")]
    MissingSummary,
    #[error("series lengths differ: years={years} price={price} demand={demand}")]
    SeriesLengthMismatch {
        years: usize,
        price: usize,
        demand: usize,
    },
    #[error("series {field}[{index}] is not a number")]
    NonNumericSeriesValue { field: &'static str, index: usize },
    #[error("series years[{index}] is not a label")]
    InvalidYearLabel { index: usize },
    #[error("table row {row} has a different column set than the first row")]
    ColumnSetMismatch { row: usize },
    #[error("table row {row} has {actual} cells, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("table row {row} column '{column}' holds a nested value")]
    NestedCellValue { row: usize, column: String },
}
