use thiserror::Error;

/// Client-side error taxonomy. Nothing here is fatal: every variant renders
/// to a displayable line for the operator.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP-level failure reaching the collaborator.
    #[error("Error: {0}")]
    Transport(String),

    /// Required input missing; caught locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// Login rejected by the collaborator; diagnostic is the raw transcript.
    #[error("{transcript}")]
    Auth { transcript: String },

    /// Structured data was expected but the transcript could not be
    /// interpreted as such.
    #[error("unexpected payload for `{command}`: {detail}")]
    UnexpectedPayload { command: String, detail: String },

    /// Local script file does not carry the expected extension.
    #[error("Error: Por favor, carga un archivo .smia válido")]
    UnsupportedFile,

    /// Local script file could not be read.
    #[error("Error: {0}")]
    ScriptRead(String),
}

impl ClientError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth { .. })
    }

    /// The operator-facing line for this error.
    pub fn display_line(&self) -> String {
        self.to_string()
    }
}
