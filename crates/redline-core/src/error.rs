use thiserror::Error;

/// Errors surfaced by review backends.
///
/// Every variant renders as a single human-readable line; that line is what
/// the reviewer sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    /// The backend answered with a failure. `message` is the server-supplied
    /// detail when one was present, otherwise the operation's fallback text.
    #[error("{message}")]
    Backend { message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Another review action is still in progress")]
    Busy,
}

impl ReviewError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
