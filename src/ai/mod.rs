//! Upstream chat-completion integration
//!
//! Every call resolves to a [`ModelResponse`]: HTTP, timeout, network and
//! response-shape failures are captured as values so callers never have to
//! handle an upstream error path.

pub mod groq;
pub mod mime;
pub mod mock;

pub use groq::GroqClient;
pub use mock::MockChatClient;

use crate::models::ImagePayload;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// One outbound model call.
#[derive(Debug, Clone, Copy)]
pub struct ModelQuery<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    /// Absent for text-only calls.
    pub image: Option<&'a ImagePayload>,
}

impl<'a> ModelQuery<'a> {
    pub fn vision(model: &'a str, prompt: &'a str, image: &'a ImagePayload) -> Self {
        Self {
            model,
            prompt,
            image: Some(image),
        }
    }

    pub fn text(model: &'a str, prompt: &'a str) -> Self {
        Self {
            model,
            prompt,
            image: None,
        }
    }
}

/// Fixed per-call parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallOptions {
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl CallOptions {
    /// Analyzer and exercise calls.
    pub const VISION: CallOptions = CallOptions {
        max_tokens: 1000,
        temperature: Some(0.7),
        timeout: Duration::from_secs(60),
    };

    /// Text-only extraction call; cooler and shorter for structured output.
    pub const RECOMMENDATION: CallOptions = CallOptions {
        max_tokens: 800,
        temperature: Some(0.3),
        timeout: Duration::from_secs(45),
    };

    /// Connectivity check.
    pub const PING: CallOptions = CallOptions {
        max_tokens: 50,
        temperature: None,
        timeout: Duration::from_secs(30),
    };
}

/// Why an upstream call produced no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// Non-200 status, with the response body verbatim.
    Status { code: u16, body: String },
    Timeout,
    Network(String),
    /// 200 response without a `choices[0].message.content` string.
    UnexpectedFormat,
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallFailure::Status { code, body } => write!(f, "API Error {}: {}", code, body),
            CallFailure::Timeout => f.write_str("Request timeout - API took too long to respond"),
            CallFailure::Network(detail) => write!(f, "Network error: {}", detail),
            CallFailure::UnexpectedFormat => f.write_str("Unexpected API response format"),
        }
    }
}

/// Prefix marking a text field as a failure description.
pub const FAILURE_MARKER: &str = "❌";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelResponse {
    Content(String),
    Failed(CallFailure),
}

impl ModelResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ModelResponse::Content(_))
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            ModelResponse::Content(text) => Some(text),
            ModelResponse::Failed(_) => None,
        }
    }

    /// Content, or the failure rendered as `❌ <description>`.
    pub fn into_text(self) -> String {
        match self {
            ModelResponse::Content(text) => text,
            ModelResponse::Failed(failure) => format!("{} {}", FAILURE_MARKER, failure),
        }
    }
}

#[async_trait]
pub trait ChatService: Send + Sync {
    async fn complete(&self, query: ModelQuery<'_>, options: &CallOptions) -> ModelResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_text_is_marked() {
        let text = ModelResponse::Failed(CallFailure::Status {
            code: 503,
            body: "overloaded".to_string(),
        })
        .into_text();
        assert_eq!(text, "❌ API Error 503: overloaded");
    }

    #[test]
    fn test_timeout_text_is_distinguishable() {
        let text = ModelResponse::Failed(CallFailure::Timeout).into_text();
        assert!(text.starts_with(FAILURE_MARKER));
        assert!(text.contains("timeout"));
    }

    #[test]
    fn test_content_passes_through() {
        let response = ModelResponse::Content("all clear".to_string());
        assert!(response.is_success());
        assert_eq!(response.content(), Some("all clear"));
        assert_eq!(response.into_text(), "all clear");
    }

    #[test]
    fn test_call_options_constants() {
        assert_eq!(CallOptions::VISION.timeout, Duration::from_secs(60));
        assert_eq!(CallOptions::RECOMMENDATION.timeout, Duration::from_secs(45));
        assert!(CallOptions::RECOMMENDATION.max_tokens < CallOptions::VISION.max_tokens);
        assert!(CallOptions::RECOMMENDATION.temperature < CallOptions::VISION.temperature);
    }
}
