//! Runtime bridge between the view's command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::AnalysisClient;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread. Each analysis runs as its own task so
/// the worker keeps draining commands; completions come back as
/// [`UiEvent::AnalysisFinished`].
pub fn launch(
    client: Arc<dyn AnalysisClient>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };
        tracing::debug!("backend worker ready");

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                BackendCommand::Analyze(pending) => {
                    let client = Arc::clone(&client);
                    let ui_tx = ui_tx.clone();
                    tracing::info!(
                        ticket = pending.ticket.id(),
                        encoding = pending.request.encoding(),
                        "backend: analyze"
                    );
                    runtime.spawn(async move {
                        let outcome = client.analyze(pending.request).await;
                        if ui_tx
                            .send(UiEvent::AnalysisFinished {
                                ticket: pending.ticket,
                                outcome,
                            })
                            .is_err()
                        {
                            tracing::warn!(
                                ticket = pending.ticket.id(),
                                "view closed before analysis finished"
                            );
                        }
                    });
                }
                BackendCommand::Shutdown => break,
            }
        }

        tracing::debug!("backend worker stopping");
    })
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
