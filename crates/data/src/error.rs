use thiserror::Error;

/// Failure talking to the remote backend.
///
/// Transient and permanent failures are not distinguished: callers report the
/// message and let the user retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("could not read backend response: {0}")]
    Decode(String),

    #[error("record not found")]
    NotFound,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RemoteError {
    /// Best available message for a toast.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Network(_) => "Could not reach the server. Check the connection and try again.".to_string(),
            RemoteError::Api { message, .. } if !message.is_empty() => message.clone(),
            RemoteError::Api { status, .. } => format!("The server rejected the request ({status})."),
            RemoteError::Decode(_) => "The server sent an unexpected response.".to_string(),
            RemoteError::NotFound => "The record no longer exists.".to_string(),
            RemoteError::InvalidRequest(msg) => msg.clone(),
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(value: serde_json::Error) -> Self {
        RemoteError::Decode(value.to_string())
    }
}
