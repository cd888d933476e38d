use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Rejected locally before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// A send is already in flight for this session
    #[error("A message is already being sent")]
    SendInFlight,

    /// No response received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; `message` is the best human-readable text the body offered
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}

impl From<validator::ValidationErrors> for ChatError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ChatError::Validation(crate::validation::describe(&errors))
    }
}
