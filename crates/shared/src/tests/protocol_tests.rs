use super::*;
use crate::error::ErrorBody;
use serde_json::json;

fn parse(value: Value) -> Result<AnalysisResult, ResponseShapeError> {
    let response: AnalyzeResponse = serde_json::from_value(value).expect("wire shape");
    AnalysisResult::try_from(response)
}

#[test]
fn converts_full_response() {
    let result = parse(json!({
        "summary": "Wakad is growing",
        "chartData": { "years": [2021, 2022], "price": [8000, 8500], "demand": [120, 140] },
        "table": [{ "area": "Wakad", "price": 8000.5 }]
    }))
    .expect("valid response");

    assert_eq!(result.summary, "Wakad is growing");
    let series = result.series.expect("series present");
    assert_eq!(series.years(), ["2021", "2022"]);
    assert_eq!(series.price(), [8000.0, 8500.0]);
    assert_eq!(series.demand(), [120.0, 140.0]);
    assert_eq!(result.table.columns(), ["area", "price"]);
    assert_eq!(
        result.table.rows(),
        [vec![
            CellValue::Text("Wakad".to_string()),
            CellValue::Number(8000.5)
        ]]
    );
}

#[test]
fn missing_chart_and_table_are_optional() {
    let result = parse(json!({ "summary": "nothing here" })).expect("summary only");
    assert!(result.series.is_none());
    assert!(result.table.is_empty());
}

#[test]
fn rejects_body_without_summary() {
    let err = parse(json!({ "error": "Unknown location" })).expect_err("no summary");
    assert_eq!(err, ResponseShapeError::MissingSummary);

    let err = parse(json!({ "table": [{ "area": "Wakad" }] })).expect_err("no summary");
    assert_eq!(err, ResponseShapeError::MissingSummary);
}

#[test]
fn string_year_labels_are_kept_verbatim() {
    let result = parse(json!({
        "summary": "",
        "chartData": { "years": ["FY21"], "price": [1.5], "demand": [2] }
    }))
    .expect("valid");
    assert_eq!(result.series.expect("series").years(), ["FY21"]);
}

#[test]
fn rejects_unequal_series_lengths() {
    let err = parse(json!({
        "summary": "",
        "chartData": { "years": [2021, 2022], "price": [1], "demand": [1, 2] }
    }))
    .expect_err("length mismatch");
    assert_eq!(
        err,
        ResponseShapeError::SeriesLengthMismatch {
            years: 2,
            price: 1,
            demand: 2
        }
    );
}

#[test]
fn rejects_non_numeric_series_values() {
    let err = parse(json!({
        "summary": "",
        "chartData": { "years": [2021], "price": ["high"], "demand": [1] }
    }))
    .expect_err("non numeric price");
    assert_eq!(
        err,
        ResponseShapeError::NonNumericSeriesValue {
            field: "price",
            index: 0
        }
    );
}

#[test]
fn rejects_rows_with_different_column_sets() {
    let err = parse(json!({
        "summary": "",
        "table": [{ "area": "Wakad", "price": 1 }, { "area": "Baner", "rate": 2 }]
    }))
    .expect_err("column mismatch");
    assert_eq!(err, ResponseShapeError::ColumnSetMismatch { row: 1 });
}

#[test]
fn later_rows_are_aligned_to_first_row_column_order() {
    let result = parse(json!({
        "summary": "",
        "table": [{ "area": "Wakad", "price": 1 }, { "price": 2, "area": "Baner" }]
    }))
    .expect("same key set, different order");
    assert_eq!(
        result.table.rows()[1],
        vec![CellValue::Text("Baner".to_string()), CellValue::Number(2.0)]
    );
}

#[test]
fn null_and_bool_cells_render_as_text() {
    let result = parse(json!({
        "summary": "",
        "table": [{ "note": null, "verified": true }]
    }))
    .expect("scalar cells");
    assert_eq!(
        result.table.rows()[0],
        vec![
            CellValue::Text(String::new()),
            CellValue::Text("true".to_string())
        ]
    );
}

#[test]
fn rejects_nested_cells() {
    let err = parse(json!({
        "summary": "",
        "table": [{ "area": ["Wakad"] }]
    }))
    .expect_err("nested cell");
    assert_eq!(
        err,
        ResponseShapeError::NestedCellValue {
            row: 0,
            column: "area".to_string()
        }
    );
}

#[test]
fn error_body_message_requires_non_blank_error() {
    assert_eq!(
        ErrorBody::parse_message(br#"{"error":"Unknown location"}"#).as_deref(),
        Some("Unknown location")
    );
    assert_eq!(ErrorBody::parse_message(br#"{"error":"  "}"#), None);
    assert_eq!(ErrorBody::parse_message(b"<html>500</html>"), None);
    assert_eq!(ErrorBody::parse_message(b""), None);
}
