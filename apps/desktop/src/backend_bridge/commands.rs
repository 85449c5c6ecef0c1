//! Backend commands queued from the view to the backend worker.

use client_core::PendingRequest;

pub enum BackendCommand {
    Analyze(PendingRequest),
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Analyze(_) => "analyze",
            Self::Shutdown => "shutdown",
        }
    }
}
