//! Request state machine for the analysis view.
//!
//! `Idle -> Submitting -> {Succeeded | Failed} -> Idle`, re-entrant from any
//! terminal state. At most one request is in flight; submits issued while
//! `Submitting` are ignored.

use shared::domain::{AnalysisResult, QueryInput};
use tracing::{debug, info, warn};

use crate::{error::ClientError, AnalysisClient, AnalyzeRequest};

/// Shown when the user submits without a query.
pub const VALIDATION_MESSAGE: &str = "A query area must be provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Caught locally; never reached the network.
    Validation,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    kind: FailureKind,
    message: String,
}

impl Failure {
    pub fn validation() -> Self {
        Self {
            kind: FailureKind::Validation,
            message: VALIDATION_MESSAGE.to_string(),
        }
    }

    pub fn from_client_error(err: &ClientError) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: err.user_message(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        query: String,
        result: AnalysisResult,
    },
    Failed(Failure),
}

impl RequestState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub ticket: RequestTicket,
    pub request: AnalyzeRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitDecision {
    /// The machine is now `Submitting`; the caller must send `request` and
    /// report back through [`RequestOrchestrator::complete`].
    Dispatch(PendingRequest),
    Rejected(Failure),
    /// A request is already in flight.
    Ignored,
}

#[derive(Debug, Clone)]
struct InFlight {
    ticket: RequestTicket,
    query: String,
}

#[derive(Debug, Default)]
pub struct RequestOrchestrator {
    state: RequestState,
    in_flight: Option<InFlight>,
    issued: u64,
}

impl RequestOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// The submit trigger is disabled while a request is in flight.
    pub fn can_submit(&self) -> bool {
        !self.state.is_submitting()
    }

    pub fn begin_submit(&mut self, input: &QueryInput) -> SubmitDecision {
        if self.state.is_submitting() {
            debug!("submit ignored: request already in flight");
            return SubmitDecision::Ignored;
        }

        if !input.has_text() {
            let failure = Failure::validation();
            self.state = RequestState::Failed(failure.clone());
            return SubmitDecision::Rejected(failure);
        }

        self.issued += 1;
        let ticket = RequestTicket(self.issued);
        let request = AnalyzeRequest::for_input(input);
        self.in_flight = Some(InFlight {
            ticket,
            query: request.query().to_string(),
        });
        // Prior result and error go away before anything touches the network.
        self.state = RequestState::Submitting;
        debug!(
            ticket = ticket.id(),
            encoding = request.encoding(),
            "request submitted"
        );

        SubmitDecision::Dispatch(PendingRequest { ticket, request })
    }

    /// Applies the outcome of the in-flight request. Returns `false` when
    /// `ticket` is not the request currently in flight.
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<AnalysisResult, ClientError>,
    ) -> bool {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket == ticket => in_flight,
            other => {
                self.in_flight = other;
                warn!(ticket = ticket.id(), "dropping completion for unknown request");
                return false;
            }
        };

        self.state = match outcome {
            Ok(result) => {
                info!(ticket = ticket.id(), "analysis succeeded");
                RequestState::Succeeded {
                    query: in_flight.query,
                    result,
                }
            }
            Err(err) => {
                warn!(ticket = ticket.id(), "analysis failed: {err}");
                RequestState::Failed(Failure::from_client_error(&err))
            }
        };
        true
    }

    /// Runs one full submission against `client`.
    pub async fn submit<C>(&mut self, client: &C, input: &QueryInput) -> &RequestState
    where
        C: AnalysisClient + ?Sized,
    {
        if let SubmitDecision::Dispatch(pending) = self.begin_submit(input) {
            let outcome = client.analyze(pending.request).await;
            self.complete(pending.ticket, outcome);
        }
        &self.state
    }

    /// Returns a terminal state to `Idle`. Has no effect while submitting.
    pub fn dismiss(&mut self) -> bool {
        if self.state.is_submitting() {
            return false;
        }
        self.state = RequestState::Idle;
        true
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
