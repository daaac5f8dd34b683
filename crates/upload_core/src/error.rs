use thiserror::Error;

/// Shown when an action needs a file and none is selected.
pub const NO_FILE_MESSAGE: &str = "Select an image first";
/// Fallback for a failed status without a usable `message`.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";
/// Fallback for every failure that carries no message of its own.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";

/// Everything that can go wrong between picking a file and rendering a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// An action that needs a file was invoked without one.
    #[error("{}", NO_FILE_MESSAGE)]
    NoFileSelected,
    /// The HTTP call itself failed (connect, DNS, broken body).
    #[error("{0}")]
    Network(String),
    /// The endpoint answered with a non-success status.
    #[error("{}", .message.as_deref().unwrap_or(SERVER_ERROR_MESSAGE))]
    Server {
        status: u16,
        message: Option<String>,
        /// Extra `error` field some servers send alongside a failure.
        detail: Option<String>,
    },
    /// A success status whose body could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The request was abandoned without producing a result.
    #[error("{}", REQUEST_FAILED_MESSAGE)]
    Interrupted,
    /// The submission was superseded by a newer file selection.
    #[error("submission superseded")]
    Cancelled,
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl UploadError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    /// The text shown in the widget's error area.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(msg) if !msg.trim().is_empty() => msg.clone(),
            Self::Network(_) | Self::MalformedResponse(_) | Self::Interrupted | Self::Cancelled => {
                REQUEST_FAILED_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}
