use super::*;

use client_core::{ClientError, Failure};
use shared::domain::{Series, Table};

fn wakad() -> AnalysisResult {
    AnalysisResult {
        summary: "Wakad prices rose steadily.".to_string(),
        series: Some(
            Series::new(
                vec!["2021".to_string(), "2022".to_string()],
                vec![8000.0, 8500.0],
                vec![120.0, 140.0],
            )
            .expect("series"),
        ),
        table: Table::new(
            vec!["final_location".to_string(), "price".to_string()],
            vec![vec![
                CellValue::Text("Wakad".to_string()),
                CellValue::Number(8000.5),
            ]],
        )
        .expect("table"),
    }
}

#[test]
fn grid_pads_columns_to_widest_cell() {
    let table = TableView {
        headings: vec!["area".into(), "price".into()],
        rows: vec![
            vec!["Wakad".into(), "8000.50".into()],
            vec!["Baner".into(), "12.00".into()],
        ],
    };

    assert_eq!(
        render_grid(&table),
        "area   price\n-----  -------\nWakad  8000.50\nBaner  12.00\n"
    );
}

#[test]
fn idle_renders_nothing_and_submitting_shows_loading() {
    assert_eq!(render_state(&RequestState::Idle), "");
    assert_eq!(render_state(&RequestState::Submitting), LOADING_TEXT);
}

#[test]
fn failure_renders_its_message() {
    let failure = Failure::from_client_error(&ClientError::Status {
        status: 400,
        server_message: Some("Unknown location".to_string()),
    });

    assert_eq!(
        render_state(&RequestState::Failed(failure)),
        "Error: Unknown location"
    );
}

#[test]
fn result_renders_summary_chart_and_table() {
    let rendered = render_state(&RequestState::Succeeded {
        query: "Wakad".to_string(),
        result: wakad(),
    });

    assert_eq!(
        rendered,
        "Summary\n\
         Wakad prices rose steadily.\n\
         \n\
         Price & Demand Trends\n\
         year  price    demand\n\
         ----  -------  ------\n\
         2021  8000.00  120.00\n\
         2022  8500.00  140.00\n\
         \n\
         Detailed Data\n\
         final location  price\n\
         --------------  -------\n\
         Wakad           8000.50\n"
    );
}

#[test]
fn empty_sections_are_hidden() {
    let result = AnalysisResult {
        summary: "Nothing tabulated.".to_string(),
        series: None,
        table: Table::empty(),
    };

    assert_eq!(render_result(&result), "Summary\nNothing tabulated.\n");
}

#[test]
fn attachment_line_reports_size() {
    let attachment = Attachment::new("sample.xlsx", vec![0; 42]);

    assert_eq!(
        render_attachment(Some(&attachment)),
        "attached: sample.xlsx (42 bytes)"
    );
    assert_eq!(render_attachment(None), "no attachment");
}
