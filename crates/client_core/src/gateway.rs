//! The single channel to the remote administration service.

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ExecuteRequest, ExecuteResponse};
use thiserror::Error;
use url::Url;

/// Network or HTTP-level failure reaching the collaborator. Rendered with
/// the legacy `Error: ` prefix so free-form terminal output keeps its
/// historical shape.
#[derive(Debug, Clone, Error)]
#[error("Error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Sole channel to the remote service: submit one command (or a
/// newline-separated script) and receive the execution transcript.
///
/// Stateless between invocations. No retries, no client-side validation of
/// command length or quoting; whatever the caller renders is submitted
/// verbatim and any backend complaint comes back through the transcript.
#[async_trait]
pub trait CommandGateway: Send + Sync {
    async fn execute(&self, command: &str) -> Result<String, TransportError>;
}

/// Transcript-or-error-text form of [`CommandGateway::execute`]: transport
/// failures collapse into an `Error: ...` line, matching what the terminal
/// view displays for any other backend failure.
pub async fn execute_lossy(gateway: &dyn CommandGateway, command: &str) -> String {
    match gateway.execute(command).await {
        Ok(transcript) => transcript,
        Err(err) => err.to_string(),
    }
}

/// reqwest-backed gateway talking to `POST {base}/execute`.
pub struct HttpCommandGateway {
    http: Client,
    execute_url: Url,
}

impl HttpCommandGateway {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base = Url::parse(base_url)
            .map_err(|err| TransportError::new(format!("invalid backend url '{base_url}': {err}")))?;
        let execute_url = base
            .join("execute")
            .map_err(|err| TransportError::new(format!("invalid backend url '{base_url}': {err}")))?;
        Ok(Self {
            http: Client::new(),
            execute_url,
        })
    }
}

#[async_trait]
impl CommandGateway for HttpCommandGateway {
    async fn execute(&self, command: &str) -> Result<String, TransportError> {
        let response: ExecuteResponse = self
            .http
            .post(self.execute_url.clone())
            .json(&ExecuteRequest {
                comandos: command.to_string(),
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.salida)
    }
}

/// Placeholder gateway for wiring a client before a backend is configured.
pub struct MissingCommandGateway;

#[async_trait]
impl CommandGateway for MissingCommandGateway {
    async fn execute(&self, _command: &str) -> Result<String, TransportError> {
        Err(TransportError::new("no backend configured"))
    }
}
