use std::path::PathBuf;

use client_core::{
    project_export_with, ClientError, ExportOptions, InputCollector, RequestOrchestrator,
    RequestState, SubmitDecision,
};
use crossbeam_channel::Sender;

use crate::{
    backend_bridge::commands::BackendCommand,
    config::Settings,
    controller::{
        events::{UiError, UiEvent},
        orchestration::dispatch_backend_command,
    },
    download::save_document,
    ui::render::{render_attachment, render_state},
};

pub const HELP_TEXT: &str = "\
Type a location to analyze it (e.g. Wakad).
  :file <path>    attach a spreadsheet to the next query
  :detach         drop the selected attachment
  :export [dir]   save the current table as CSV
  :clear          clear the current result or error
  :status         show the current state
  :help           show this help
  :quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Submit(String),
    Attach(PathBuf),
    Detach,
    Export(Option<PathBuf>),
    Clear,
    Status,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Lines starting with `:` are commands; anything else is a query.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Ok(Self::Submit(line.to_string()));
        };
        let (name, arg) = match command.trim().split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (command.trim(), None),
        };

        match (name, arg) {
            ("file", Some(path)) => Ok(Self::Attach(PathBuf::from(path))),
            ("file", None) => Err("usage: :file <path>".to_string()),
            ("detach", _) => Ok(Self::Detach),
            ("export", dir) => Ok(Self::Export(dir.map(PathBuf::from))),
            ("clear", _) => Ok(Self::Clear),
            ("status", _) => Ok(Self::Status),
            ("help" | "h" | "?", _) => Ok(Self::Help),
            ("quit" | "q" | "exit", _) => Ok(Self::Quit),
            (other, _) => Err(format!("unknown command ':{other}' (try :help)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    Continue,
    Quit,
}

/// The form-and-results view: input collector, request state machine and
/// the lines queued for display.
pub struct AnalysisView {
    input: InputCollector,
    orchestrator: RequestOrchestrator,
    export_options: ExportOptions,
    export_dir: PathBuf,
    cmd_tx: Sender<BackendCommand>,
    output: Vec<String>,
}

impl AnalysisView {
    pub fn new(settings: &Settings, cmd_tx: Sender<BackendCommand>) -> Self {
        Self {
            input: InputCollector::new(),
            orchestrator: RequestOrchestrator::new(),
            export_options: ExportOptions {
                quoting: settings.export_quoting,
            },
            export_dir: settings.export_dir.clone(),
            cmd_tx,
            output: Vec::new(),
        }
    }

    pub fn state(&self) -> &RequestState {
        self.orchestrator.state()
    }

    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    pub fn handle_line(&mut self, line: &str) -> ViewAction {
        match ConsoleCommand::parse(line) {
            Ok(command) => self.handle_command(command),
            Err(message) => {
                self.push_error(UiError::invalid_input(message));
                ViewAction::Continue
            }
        }
    }

    pub fn handle_command(&mut self, command: ConsoleCommand) -> ViewAction {
        match command {
            ConsoleCommand::Submit(text) => {
                self.input.set_text(text);
                self.submit();
            }
            ConsoleCommand::Attach(path) => match self.input.attach_file(&path) {
                Ok(attachment) => {
                    let line = render_attachment(Some(attachment));
                    self.output.push(line);
                }
                Err(err) => self.push_error(UiError::from_input_error(&err)),
            },
            ConsoleCommand::Detach => {
                self.input.detach();
                self.output.push(render_attachment(None));
            }
            ConsoleCommand::Export(dir) => self.export(dir),
            ConsoleCommand::Clear => {
                if !self.orchestrator.dismiss() {
                    self.output
                        .push("A request is in flight; it cannot be cleared.".to_string());
                }
            }
            ConsoleCommand::Status => {
                let line = format!(
                    "state: {} | query: {:?} | {}",
                    self.orchestrator.state().label(),
                    self.input.text(),
                    render_attachment(self.input.attachment())
                );
                self.output.push(line);
            }
            ConsoleCommand::Help => self.output.push(HELP_TEXT.to_string()),
            ConsoleCommand::Quit => return ViewAction::Quit,
        }
        ViewAction::Continue
    }

    fn submit(&mut self) {
        match self.orchestrator.begin_submit(&self.input.snapshot()) {
            SubmitDecision::Dispatch(pending) => {
                let ticket = pending.ticket;
                self.render();
                if let Err(reason) =
                    dispatch_backend_command(&self.cmd_tx, BackendCommand::Analyze(pending))
                {
                    tracing::error!("failed to dispatch analysis: {reason}");
                    if self
                        .orchestrator
                        .complete(ticket, Err(ClientError::Unavailable(reason)))
                    {
                        self.input.release_attachment();
                    }
                    self.render();
                }
            }
            SubmitDecision::Rejected(_) => self.render(),
            SubmitDecision::Ignored => self.output.push(
                "A request is already in flight; submit is disabled until it finishes."
                    .to_string(),
            ),
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::AnalysisFinished { ticket, outcome } => {
                if self.orchestrator.complete(ticket, outcome) {
                    self.input.release_attachment();
                    self.render();
                }
            }
            UiEvent::Error(err) => self.push_error(err),
        }
    }

    fn export(&mut self, dir: Option<PathBuf>) {
        let RequestState::Succeeded { query, result } = self.orchestrator.state() else {
            self.output.push("Nothing to export yet.".to_string());
            return;
        };

        let document = match project_export_with(result, query, &self.export_options) {
            Ok(Some(document)) => document,
            Ok(None) => {
                self.output
                    .push("Nothing to export: the table is empty.".to_string());
                return;
            }
            Err(err) => {
                self.push_error(UiError::from_export_error(&err));
                return;
            }
        };

        let dir = dir.unwrap_or_else(|| self.export_dir.clone());
        match save_document(&dir, &document) {
            Ok(path) => self.output.push(format!(
                "Exported {} ({} bytes) to {}",
                document.filename,
                document.bytes.len(),
                path.display()
            )),
            Err(err) => {
                self.push_error(UiError::from_save_error(&err))
            }
        }
    }

    fn render(&mut self) {
        let rendered = render_state(self.orchestrator.state());
        if !rendered.is_empty() {
            self.output.push(rendered);
        }
    }

    fn push_error(&mut self, err: UiError) {
        tracing::debug!(context = ?err.context(), category = ?err.category(), "view error");
        self.output.push(format!("[{}] {}", err.label(), err.message()));
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
