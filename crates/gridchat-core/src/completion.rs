//! The external completion collaborator seam.
//!
//! The core never talks to a provider directly; it hands a
//! [`CompletionRequest`] to whatever [`CompletionClient`] the embedding layer
//! supplies and gets back assistant text or a [`CompletionError`]. There is no
//! cancellation path: once a request is in flight, callers observe only
//! success or failure.

use std::fmt;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::core::column::Message;

/// Effective request snapshot for a single completion call.
///
/// Generation parameters the selected model does not accept are `None` rather
/// than sent with a neutral value. The api key is carried for the transport
/// layer but is excluded from `Debug` output and serialization.
#[derive(Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    pub history: Vec<Message>,
}

impl fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("system_prompt", &self.system_prompt)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("top_p", &self.top_p)
            .field("frequency_penalty", &self.frequency_penalty)
            .field("presence_penalty", &self.presence_penalty)
            .field("history", &self.history)
            .finish()
    }
}

/// Categories of completion failure surfaced to the caller.
///
/// Every variant returns the owning column to `Idle`; none is retried
/// automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionError {
    /// Invalid or missing credentials.
    Unauthorized,
    /// The provider rejected the request due to rate limiting.
    RateLimited,
    /// The requested model is unknown to or disabled at the provider.
    ModelUnavailable,
    /// Connection or request timeout.
    Timeout,
    /// Any other provider failure.
    Unknown,
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Unauthorized => write!(f, "invalid or missing credentials"),
            CompletionError::RateLimited => write!(f, "rate limited by the provider"),
            CompletionError::ModelUnavailable => write!(f, "model unavailable at the provider"),
            CompletionError::Timeout => write!(f, "request timed out"),
            CompletionError::Unknown => write!(f, "unknown provider error"),
        }
    }
}

impl std::error::Error for CompletionError {}

/// Result type for completion calls.
pub type CompletionResult<T> = std::result::Result<T, CompletionError>;

/// An opaque async completion collaborator.
///
/// Object-safe so embedding layers can hold a `dyn CompletionClient` and swap
/// transports without touching the core.
pub trait CompletionClient: Send + Sync {
    /// Exchanges a request for the assistant's reply text.
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, CompletionResult<String>>;
}
