//! Pure projections from an [`AnalysisResult`] into what the view renders:
//! chart points, table cells and the CSV export. Nothing here caches or
//! mutates; every call recomputes from the result it is given.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::domain::{AnalysisResult, CellValue};
use tracing::debug;

use crate::error::ExportError;

pub const EXPORT_MIME_TYPE: &str = "text/csv";
const EXPORT_EXTENSION: &str = "csv";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub price: f64,
    pub demand: f64,
}

pub fn project_series(result: &AnalysisResult) -> Vec<ChartPoint> {
    let Some(series) = result.series.as_ref().filter(|s| !s.is_empty()) else {
        return Vec::new();
    };

    series
        .years()
        .iter()
        .zip(series.price())
        .zip(series.demand())
        .map(|((label, price), demand)| ChartPoint {
            label: label.clone(),
            price: *price,
            demand: *demand,
        })
        .collect()
}

/// Numbers render with exactly two decimals, everything else verbatim.
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => format!("{n:.2}"),
        CellValue::Text(text) => text.clone(),
    }
}

/// Column names are displayed with underscores as spaces.
pub fn column_heading(column: &str) -> String {
    column.replace('_', " ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub headings: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// `None` when there are no rows, in which case the table is hidden.
pub fn project_table(result: &AnalysisResult) -> Option<TableView> {
    let table = &result.table;
    if table.is_empty() {
        return None;
    }

    Some(TableView {
        headings: table.columns().iter().map(|c| column_heading(c)).collect(),
        rows: table
            .rows()
            .iter()
            .map(|row| row.iter().map(format_cell).collect())
            .collect(),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportQuoting {
    /// Quote only fields containing a delimiter, quote or line break.
    #[default]
    Necessary,
    /// Quote every text cell and every heading; number cells stay bare even
    /// when a text cell happens to look numeric.
    NonNumeric,
}

impl ExportQuoting {
    /// `NonNumeric` fields are quoted here by cell type, so the writer must
    /// leave them untouched.
    fn quote_style(self) -> csv::QuoteStyle {
        match self {
            Self::Necessary => csv::QuoteStyle::Necessary,
            Self::NonNumeric => csv::QuoteStyle::Never,
        }
    }

    fn heading(self, column: &str) -> String {
        match self {
            Self::Necessary => column.to_string(),
            Self::NonNumeric => quote_field(column),
        }
    }

    fn cell(self, value: &CellValue) -> String {
        match (self, value) {
            (Self::NonNumeric, CellValue::Text(text)) => quote_field(text),
            _ => format_cell(value),
        }
    }
}

fn quote_field(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

impl fmt::Display for ExportQuoting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Necessary => "necessary",
            Self::NonNumeric => "non_numeric",
        })
    }
}

impl FromStr for ExportQuoting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "necessary" => Ok(Self::Necessary),
            "non_numeric" => Ok(Self::NonNumeric),
            other => Err(format!(
                "unknown export quoting '{other}' (expected 'necessary' or 'non_numeric')"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub quoting: ExportQuoting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub filename: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn project_export(
    result: &AnalysisResult,
    query: &str,
) -> Result<Option<ExportDocument>, ExportError> {
    project_export_with(result, query, &ExportOptions::default())
}

/// Encodes the table as CSV. `Ok(None)` when there are no rows: exporting an
/// empty table is a no-op.
pub fn project_export_with(
    result: &AnalysisResult,
    query: &str,
    options: &ExportOptions,
) -> Result<Option<ExportDocument>, ExportError> {
    let table = &result.table;
    if table.is_empty() {
        debug!("export skipped: table has no rows");
        return Ok(None);
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(options.quoting.quote_style())
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let quoting = options.quoting;
    writer.write_record(table.columns().iter().map(|c| quoting.heading(c)))?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| quoting.cell(cell)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;

    Ok(Some(ExportDocument {
        filename: export_filename(query),
        mime_type: EXPORT_MIME_TYPE,
        bytes,
    }))
}

fn export_filename(query: &str) -> String {
    let stem: String = query
        .trim()
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{stem}_analysis.{EXPORT_EXTENSION}")
}

#[cfg(test)]
#[path = "tests/projector_tests.rs"]
mod tests;
