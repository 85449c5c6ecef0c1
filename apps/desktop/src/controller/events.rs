//! Backend-to-view events and error modeling for the console view.

use client_core::{ClientError, ExportError, InputError, RequestTicket};
use shared::domain::AnalysisResult;

pub enum UiEvent {
    AnalysisFinished {
        ticket: RequestTicket,
        outcome: Result<AnalysisResult, ClientError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Io,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Attach,
    Export,
    Input,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(
        category: UiErrorCategory,
        context: UiErrorContext,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    /// A console line that did not parse as a command.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(UiErrorCategory::Validation, UiErrorContext::Input, message)
    }

    pub fn from_input_error(err: &InputError) -> Self {
        let category = match err {
            InputError::Read { .. } => UiErrorCategory::Io,
            InputError::MissingFileName { .. } => UiErrorCategory::Validation,
        };
        Self::new(category, UiErrorContext::Attach, err.to_string())
    }

    pub fn from_export_error(err: &ExportError) -> Self {
        let category = match err {
            ExportError::Csv(inner) if inner.is_io_error() => UiErrorCategory::Io,
            ExportError::Flush(_) => UiErrorCategory::Io,
            ExportError::Csv(_) => UiErrorCategory::Unknown,
        };
        Self::new(category, UiErrorContext::Export, err.to_string())
    }

    /// Failures saving the export document; I/O when any cause in the chain
    /// is an `io::Error`.
    pub fn from_save_error(err: &anyhow::Error) -> Self {
        let category = if err.chain().any(|cause| cause.is::<std::io::Error>()) {
            UiErrorCategory::Io
        } else {
            UiErrorCategory::Unknown
        };
        Self::new(category, UiErrorContext::Export, format!("{err:#}"))
    }

    /// Classifies free-form text (worker startup reports) by keyword.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("no such file")
            || message_lower.contains("permission denied")
            || message_lower.contains("failed to read")
            || message_lower.contains("failed to write")
            || message_lower.contains("failed to create")
        {
            UiErrorCategory::Io
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self::new(category, context, message)
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn label(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Transport => "transport",
            UiErrorCategory::Io => "io",
            UiErrorCategory::Validation => "input",
            UiErrorCategory::Unknown => "error",
        }
    }
}

#[cfg(test)]
#[path = "../tests/events_tests.rs"]
mod tests;
