use crate::error::ResponseShapeError;

/// A spreadsheet (or any other file) selected alongside the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryInput {
    pub text: String,
    pub attachment: Option<Attachment>,
}

impl QueryInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Whitespace-only text counts as empty.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

/// Aligned year/price/demand sequences. The constructor is the only way in,
/// so every `Series` has three sequences of the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    years: Vec<String>,
    price: Vec<f64>,
    demand: Vec<f64>,
}

impl Series {
    pub fn new(
        years: Vec<String>,
        price: Vec<f64>,
        demand: Vec<f64>,
    ) -> Result<Self, ResponseShapeError> {
        if price.len() != years.len() || demand.len() != years.len() {
            return Err(ResponseShapeError::SeriesLengthMismatch {
                years: years.len(),
                price: price.len(),
                demand: demand.len(),
            });
        }
        Ok(Self {
            years,
            price,
            demand,
        })
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn price(&self) -> &[f64] {
        &self.price
    }

    pub fn demand(&self) -> &[f64] {
        &self.demand
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

/// Rows are stored positionally against `columns`, in the column order of
/// the first record the server sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, ResponseShapeError> {
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(ResponseShapeError::RowWidthMismatch {
                row,
                expected: columns.len(),
                actual: cells.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    pub series: Option<Series>,
    pub table: Table,
}
