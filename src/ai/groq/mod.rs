pub mod client;
pub mod types;

pub use client::GroqClient;

pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[cfg(test)]
pub(crate) mod test_support {
    pub use super::CHAT_COMPLETIONS_PATH;
    use wiremock::matchers::{method, path};
    use wiremock::MockBuilder;

    pub fn post(endpoint: &str) -> MockBuilder {
        wiremock::Mock::given(method("POST")).and(path(endpoint))
    }

    /// A well-formed chat completion body carrying `content`.
    pub fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }
}
