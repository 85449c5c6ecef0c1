use super::*;

use std::time::Duration;

use async_trait::async_trait;
use client_core::{
    AnalyzeRequest, ClientError, PendingRequest, RequestOrchestrator, SubmitDecision,
};
use crossbeam_channel::bounded;
use shared::domain::{AnalysisResult, QueryInput, Table};

struct EchoClient;

#[async_trait]
impl AnalysisClient for EchoClient {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult, ClientError> {
        match request.query() {
            "Atlantis" => Err(ClientError::Status {
                status: 400,
                server_message: Some("Unknown location".to_string()),
            }),
            query => Ok(AnalysisResult {
                summary: format!("summary for {query}"),
                series: None,
                table: Table::empty(),
            }),
        }
    }
}

fn pending_for(orchestrator: &mut RequestOrchestrator, text: &str) -> PendingRequest {
    match orchestrator.begin_submit(&QueryInput::new(text)) {
        SubmitDecision::Dispatch(pending) => pending,
        other => panic!("expected dispatch, got {other:?}"),
    }
}

#[test]
fn worker_reports_completion_with_the_request_ticket() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = bounded(4);
    let worker = launch(Arc::new(EchoClient), cmd_rx, ui_tx);

    let mut orchestrator = RequestOrchestrator::new();
    let pending = pending_for(&mut orchestrator, "Wakad");
    let ticket = pending.ticket;
    cmd_tx.send(BackendCommand::Analyze(pending)).expect("send");

    match ui_rx.recv_timeout(Duration::from_secs(5)).expect("event") {
        UiEvent::AnalysisFinished {
            ticket: finished,
            outcome,
        } => {
            assert_eq!(finished, ticket);
            assert_eq!(outcome.expect("success").summary, "summary for Wakad");
        }
        UiEvent::Error(err) => panic!("unexpected error event: {}", err.message()),
    }

    cmd_tx.send(BackendCommand::Shutdown).expect("shutdown");
    worker.join().expect("worker exits cleanly");
}

#[test]
fn worker_forwards_client_failures() {
    let (cmd_tx, cmd_rx) = bounded(4);
    let (ui_tx, ui_rx) = bounded(4);
    let worker = launch(Arc::new(EchoClient), cmd_rx, ui_tx);

    let mut orchestrator = RequestOrchestrator::new();
    let pending = pending_for(&mut orchestrator, "Atlantis");
    cmd_tx.send(BackendCommand::Analyze(pending)).expect("send");

    match ui_rx.recv_timeout(Duration::from_secs(5)).expect("event") {
        UiEvent::AnalysisFinished { outcome, .. } => {
            let err = outcome.expect_err("client failure");
            assert_eq!(err.user_message(), "Unknown location");
        }
        UiEvent::Error(err) => panic!("unexpected error event: {}", err.message()),
    }

    drop(cmd_tx);
    worker.join().expect("worker exits when the queue closes");
}
