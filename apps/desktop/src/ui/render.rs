//! Plain-text rendering of the view state.

use std::fmt::Write as _;

use client_core::{format_cell, project_series, project_table, RequestState, TableView};
use shared::domain::{AnalysisResult, Attachment, CellValue};

pub const LOADING_TEXT: &str = "Analyzing...";

pub fn render_state(state: &RequestState) -> String {
    match state {
        RequestState::Idle => String::new(),
        RequestState::Submitting => LOADING_TEXT.to_string(),
        RequestState::Failed(failure) => format!("Error: {}", failure.message()),
        RequestState::Succeeded { result, .. } => render_result(result),
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "{}", result.summary);

    let points = project_series(result);
    if !points.is_empty() {
        let chart = TableView {
            headings: vec!["year".into(), "price".into(), "demand".into()],
            rows: points
                .iter()
                .map(|p| {
                    vec![
                        p.label.clone(),
                        format_cell(&CellValue::Number(p.price)),
                        format_cell(&CellValue::Number(p.demand)),
                    ]
                })
                .collect(),
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "Price & Demand Trends");
        out.push_str(&render_grid(&chart));
    }

    if let Some(table) = project_table(result) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Detailed Data");
        out.push_str(&render_grid(&table));
    }

    out
}

pub fn render_attachment(attachment: Option<&Attachment>) -> String {
    match attachment {
        Some(attachment) => format!(
            "attached: {} ({} bytes)",
            attachment.filename,
            attachment.size_bytes()
        ),
        None => "no attachment".to_string(),
    }
}

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the headings.
pub fn render_grid(table: &TableView) -> String {
    let mut widths: Vec<usize> = table.headings.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &table.headings, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &table.rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
#[path = "../tests/render_tests.rs"]
mod tests;
