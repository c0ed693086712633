//! Failure taxonomy for remote reasoning calls.
//!
//! Every transport or model failure is classified into one of these buckets
//! at the client boundary. Callers above that boundary never inspect raw
//! error text; they see the taxonomy, the retry flag, and the user-facing
//! message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified outcome of a failed solve or render call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveFailure {
    /// User-initiated abort. Never retried, never shown as an error.
    #[error("operation cancelled")]
    Cancelled,

    /// Quota/429-class failure. Retried up to the retry budget.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// 503/overloaded-class failure. Same retry treatment as RateLimited.
    #[error("model overloaded: {0}")]
    Overloaded(String),

    /// 401/403/credential-class failure. Surfaced immediately.
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// Content-filter block. Surfaced immediately.
    #[error("blocked by safety filter: {0}")]
    SafetyBlocked(String),

    /// Connectivity-class failure. Surfaced immediately.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The model violated the response contract (unparseable JSON or a
    /// payload missing required fields after fence stripping).
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// Fallback bucket carrying the raw message.
    #[error("{0}")]
    Unknown(String),
}

impl SolveFailure {
    /// Whether the retry policy may re-attempt after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::Overloaded(_))
    }

    /// Whether this is the silent user-abort outcome.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The human-readable message shown in the error overlay.
    ///
    /// Returns `None` for [`SolveFailure::Cancelled`], which is never
    /// surfaced as an error.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Cancelled => None,
            Self::RateLimited(_) => {
                Some("AI synthesis limit reached. Please try again shortly.".to_string())
            }
            Self::Overloaded(_) => Some(
                "The reasoning engine is overloaded right now. Please try again shortly."
                    .to_string(),
            ),
            Self::AuthFailure(_) => Some(
                "The configured API credential was rejected. Update your key and retry."
                    .to_string(),
            ),
            Self::SafetyBlocked(_) => Some(
                "The request was blocked by the content filter. Please rephrase your input."
                    .to_string(),
            ),
            Self::NetworkFailure(_) => {
                Some("Could not reach the reasoning service. Check your connection.".to_string())
            }
            Self::MalformedResponse(_) => Some(
                "The reasoning engine returned an unreadable result. Please try again."
                    .to_string(),
            ),
            Self::Unknown(message) => Some(message.clone()),
        }
    }
}
