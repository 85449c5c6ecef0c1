use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use shared::{
    domain::{AnalysisResult, Attachment, QueryInput},
    error::ErrorBody,
    protocol::{AnalyzeRequestBody, AnalyzeResponse, MULTIPART_FILE_FIELD, MULTIPART_QUERY_FIELD},
};
use tracing::{debug, info, warn};

pub mod error;
mod input;
mod orchestrator;
pub mod projector;

pub use error::{ClientError, ExportError, InputError, FALLBACK_ERROR_MESSAGE};
pub use input::InputCollector;
pub use orchestrator::{
    Failure, FailureKind, PendingRequest, RequestOrchestrator, RequestState, RequestTicket,
    SubmitDecision, VALIDATION_MESSAGE,
};
pub use projector::{
    format_cell, project_export, project_export_with, project_series, project_table, ChartPoint,
    ExportDocument, ExportOptions, ExportQuoting, TableView,
};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/api/analyze/";

/// How a submission travels to the service. The orchestrator picks the
/// variant from attachment presence; [`HttpAnalysisClient`] builds the body.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeRequest {
    Json {
        query: String,
    },
    Multipart {
        query: String,
        attachment: Attachment,
    },
}

impl AnalyzeRequest {
    pub fn for_input(input: &QueryInput) -> Self {
        let query = input.text.trim().to_string();
        match &input.attachment {
            Some(attachment) => Self::Multipart {
                query,
                attachment: attachment.clone(),
            },
            None => Self::Json { query },
        }
    }

    pub fn query(&self) -> &str {
        match self {
            Self::Json { query } | Self::Multipart { query, .. } => query,
        }
    }

    pub fn encoding(&self) -> &'static str {
        match self {
            Self::Json { .. } => "json",
            Self::Multipart { .. } => "multipart",
        }
    }
}

#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult, ClientError>;
}

pub struct HttpAnalysisClient {
    http: Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_http_client(Client::new(), endpoint)
    }

    pub fn with_http_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, request: AnalyzeRequest) -> Result<RequestBuilder, ClientError> {
        let builder = self.http.post(&self.endpoint);
        match request {
            AnalyzeRequest::Json { query } => Ok(builder.json(&AnalyzeRequestBody { query })),
            AnalyzeRequest::Multipart { query, attachment } => {
                let Attachment {
                    filename,
                    mime_type,
                    bytes,
                } = attachment;
                let mut part = Part::bytes(bytes).file_name(filename.clone());
                if let Some(mime_type) = mime_type {
                    part = part
                        .mime_str(&mime_type)
                        .map_err(|err| ClientError::Attachment {
                            filename,
                            reason: err.to_string(),
                        })?;
                }
                let form = Form::new()
                    .part(MULTIPART_FILE_FIELD, part)
                    .text(MULTIPART_QUERY_FIELD, query);
                Ok(builder.multipart(form))
            }
        }
    }

    fn transport_error(&self, source: reqwest::Error) -> ClientError {
        ClientError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisResult, ClientError> {
        debug!(
            endpoint = %self.endpoint,
            encoding = request.encoding(),
            query_len = request.query().len(),
            "posting analysis request"
        );
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(err))?;

        if !status.is_success() {
            let server_message = ErrorBody::parse_message(&body);
            warn!(
                status = status.as_u16(),
                server_message = server_message.as_deref().unwrap_or("<none>"),
                "analysis request rejected"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                server_message,
            });
        }

        let wire: AnalyzeResponse =
            serde_json::from_slice(&body).map_err(|err| ClientError::Decode(err.to_string()))?;
        let result = AnalysisResult::try_from(wire).inspect_err(|err| {
            warn!("analysis response failed shape validation: {err}");
        })?;

        info!(
            series_points = result.series.as_ref().map_or(0, |s| s.len()),
            table_rows = result.table.rows().len(),
            "analysis response received"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
