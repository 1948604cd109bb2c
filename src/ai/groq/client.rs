use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatMessageContent, MessagePart,
};
use super::CHAT_COMPLETIONS_PATH;
use crate::ai::{CallFailure, CallOptions, ChatService, ModelQuery, ModelResponse};
use crate::models::DEFAULT_BASE_URL;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Chat-completion client for Groq's OpenAI-compatible endpoint.
///
/// Holds no per-request state, so one instance (and its connection pool) is
/// shared by every request the server handles.
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(query: &ModelQuery<'_>, options: &CallOptions) -> ChatCompletionRequest {
        let content = match query.image {
            Some(image) => ChatMessageContent::Parts(vec![
                MessagePart::text(query.prompt),
                MessagePart::image_url(image.data_url()),
            ]),
            None => ChatMessageContent::Text(query.prompt.to_string()),
        };

        ChatCompletionRequest {
            model: query.model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(content),
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }

    async fn send(
        &self,
        model: &str,
        request: &ChatCompletionRequest,
        timeout: Duration,
    ) -> ModelResponse {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);

        let response = match self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Self::transport_failure(model, e),
        };

        let status = response.status();
        tracing::info!("{} responded with status {}", model, status);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Self::transport_failure(model, e),
        };

        if status != StatusCode::OK {
            tracing::error!("API error from {} (status {}): {}", model, status, body);
            return ModelResponse::Failed(CallFailure::Status {
                code: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<ChatCompletionResponse>(&body)
            .ok()
            .and_then(ChatCompletionResponse::first_text)
        {
            Some(text) => {
                tracing::info!("{} responded successfully", model);
                ModelResponse::Content(text)
            }
            None => {
                tracing::error!("Unexpected API response format from {}: {}", model, body);
                ModelResponse::Failed(CallFailure::UnexpectedFormat)
            }
        }
    }

    fn transport_failure(model: &str, e: reqwest::Error) -> ModelResponse {
        if e.is_timeout() {
            tracing::error!("Timeout calling {}", model);
            ModelResponse::Failed(CallFailure::Timeout)
        } else {
            tracing::error!("Request error calling {}: {}", model, e);
            ModelResponse::Failed(CallFailure::Network(e.to_string()))
        }
    }
}

#[async_trait]
impl ChatService for GroqClient {
    async fn complete(&self, query: ModelQuery<'_>, options: &CallOptions) -> ModelResponse {
        tracing::info!("Calling {}...", query.model);
        let request = Self::build_request(&query, options);
        self.send(query.model, &request, options.timeout).await
    }
}
