//! Typed error hierarchy for the Trellis client.
//!
//! Two enums cover the two layers:
//! - `ClientError`: every failed call to the board API, whatever the cause
//! - `SessionError`: session-store transitions that were refused

use thiserror::Error;

/// The single structured failure raised by the resource client and proxy.
///
/// Backend error bodies, malformed responses and transport failures are all
/// coerced into this shape. `status` is `None` when the backend was never
/// reached.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("{message}")]
    RequestFailed { message: String, status: Option<u16> },
}

impl ClientError {
    pub fn request_failed(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::RequestFailed {
            message: message.into(),
            status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::RequestFailed { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
        }
    }

    /// True when the backend answered with 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed {
            message: err.to_string(),
            status: err.status().map(|s| s.as_u16()),
        }
    }
}

/// Errors from the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Already signed in; log out first")]
    AlreadyAuthenticated,

    #[error("Session has already been started")]
    AlreadyStarted,

    #[error("Session has been torn down")]
    TornDown,

    #[error(transparent)]
    Request(#[from] ClientError),
}
