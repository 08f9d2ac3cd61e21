//! Error taxonomy for a single fetch invocation

use serde::Serialize;

/// Everything that can turn an invocation into a rejected outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The action identifier is not in the dispatch table. No request was sent.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The server answered outside of [200, 300).
    #[error("HTTP {status} {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// The request never completed (connect, DNS, TLS, body read, timeout).
    #[error("transport error: {message}")]
    Transport {
        status: u16,
        status_text: String,
        message: String,
    },

    /// The caller cancelled the in-flight request.
    #[error("request cancelled")]
    Cancelled,
}

/// The payload handed to the caller when an invocation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescriptor {
    pub status: u16,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FetchError {
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        let status = err.status();
        FetchError::Transport {
            status: status.map(|s| s.as_u16()).unwrap_or(0),
            status_text: status
                .and_then(|s| s.canonical_reason())
                .unwrap_or_default()
                .to_string(),
            message: err.to_string(),
        }
    }

    /// Status/status text as the transport reported them. Unknown actions and
    /// cancellations never reached the transport, so they report `0` / `""`.
    pub fn descriptor(&self) -> ErrorDescriptor {
        match self {
            FetchError::HttpStatus {
                status,
                status_text,
            }
            | FetchError::Transport {
                status,
                status_text,
                ..
            } => ErrorDescriptor {
                status: *status,
                status_text: status_text.clone(),
                error: None,
            },
            FetchError::UnknownAction(_) => ErrorDescriptor {
                status: 0,
                status_text: String::new(),
                error: Some(self.to_string()),
            },
            FetchError::Cancelled => ErrorDescriptor {
                status: 0,
                status_text: String::new(),
                error: None,
            },
        }
    }

    pub fn is_unknown_action(&self) -> bool {
        matches!(self, FetchError::UnknownAction(_))
    }
}
