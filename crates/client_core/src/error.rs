use std::path::PathBuf;

use shared::error::ResponseShapeError;
use thiserror::Error;

/// Shown whenever a failure carries no server-supplied message.
pub const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("analysis service returned status {status}{}", message_suffix(.server_message))]
    Status {
        status: u16,
        server_message: Option<String>,
    },
    #[error("analysis service returned an unreadable body: {0}")]
    Decode(String),
    #[error("analysis response has an invalid shape: {0}")]
    Shape(#[from] ResponseShapeError),
    #[error("attachment '{filename}' could not be encoded: {reason}")]
    Attachment { filename: String, reason: String },
    #[error("analysis worker unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    /// The `error` string the service put in a non-2xx body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                server_message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        self.server_message()
            .unwrap_or(FALLBACK_ERROR_MESSAGE)
            .to_string()
    }
}

fn message_suffix(server_message: &Option<String>) -> String {
    server_message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read attachment '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("attachment path '{}' has no file name", path.display())]
    MissingFileName { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode export row: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush export buffer: {0}")]
    Flush(String),
}
