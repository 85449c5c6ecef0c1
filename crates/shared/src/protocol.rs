//! Wire shapes exchanged with the analysis service.
//!
//! The service answers with a loosely-typed JSON document; everything the
//! view renders goes through [`AnalysisResult::try_from`] first, so shape
//! violations are caught once, at the boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{AnalysisResult, CellValue, Series, Table},
    error::ResponseShapeError,
};

/// Multipart field carrying the uploaded spreadsheet.
pub const MULTIPART_FILE_FIELD: &str = "file";
/// Multipart field carrying the query text.
pub const MULTIPART_QUERY_FIELD: &str = "query";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequestBody {
    pub query: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub years: Vec<Value>,
    #[serde(default)]
    pub price: Vec<Value>,
    #[serde(default)]
    pub demand: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(
        default,
        rename = "chartData",
        skip_serializing_if = "Option::is_none"
    )]
    pub chart_data: Option<ChartData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<Map<String, Value>>>,
}

impl TryFrom<AnalyzeResponse> for AnalysisResult {
    type Error = ResponseShapeError;

    fn try_from(value: AnalyzeResponse) -> Result<Self, Self::Error> {
        let summary = value.summary.ok_or(ResponseShapeError::MissingSummary)?;
        let series = value.chart_data.map(series_from_wire).transpose()?;
        let table = match value.table {
            Some(records) => table_from_wire(records)?,
            None => Table::empty(),
        };

        Ok(Self {
            summary,
            series,
            table,
        })
    }
}

fn series_from_wire(chart: ChartData) -> Result<Series, ResponseShapeError> {
    let years = chart
        .years
        .into_iter()
        .enumerate()
        .map(|(index, year)| match year {
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(s),
            _ => Err(ResponseShapeError::InvalidYearLabel { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let price = numeric_sequence("price", chart.price)?;
    let demand = numeric_sequence("demand", chart.demand)?;
    Series::new(years, price, demand)
}

fn numeric_sequence(
    field: &'static str,
    values: Vec<Value>,
) -> Result<Vec<f64>, ResponseShapeError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            value
                .as_f64()
                .ok_or(ResponseShapeError::NonNumericSeriesValue { field, index })
        })
        .collect()
}

fn table_from_wire(records: Vec<Map<String, Value>>) -> Result<Table, ResponseShapeError> {
    let Some(first) = records.first() else {
        return Ok(Table::empty());
    };
    let columns: Vec<String> = first.keys().cloned().collect();

    let mut rows = Vec::with_capacity(records.len());
    for (row, mut record) in records.into_iter().enumerate() {
        if record.len() != columns.len() || !columns.iter().all(|c| record.contains_key(c)) {
            return Err(ResponseShapeError::ColumnSetMismatch { row });
        }
        let cells = columns
            .iter()
            .map(|column| {
                let value = record.remove(column).unwrap_or(Value::Null);
                cell_from_wire(row, column, value)
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }

    Table::new(columns, rows)
}

fn cell_from_wire(row: usize, column: &str, value: Value) -> Result<CellValue, ResponseShapeError> {
    match value {
        Value::Number(n) => Ok(n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string()))),
        Value::String(s) => Ok(CellValue::Text(s)),
        Value::Bool(b) => Ok(CellValue::Text(b.to_string())),
        Value::Null => Ok(CellValue::Text(String::new())),
        Value::Array(_) | Value::Object(_) => Err(ResponseShapeError::NestedCellValue {
            row,
            column: column.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
