use super::{CallOptions, ChatService, ModelQuery, ModelResponse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A call observed by [`MockChatClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub had_image: bool,
    pub options: CallOptions,
}

/// Scripted [`ChatService`] keyed by model identifier.
///
/// Models without a scripted response answer with `mock response from <model>`.
pub struct MockChatClient {
    responses: Arc<Mutex<HashMap<String, ModelResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, model: &str, response: ModelResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(model.to_string(), response);
        self
    }

    pub fn with_content(self, model: &str, content: &str) -> Self {
        self.with_response(model, ModelResponse::Content(content.to_string()))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn complete(&self, query: ModelQuery<'_>, options: &CallOptions) -> ModelResponse {
        self.calls.lock().unwrap().push(RecordedCall {
            model: query.model.to_string(),
            prompt: query.prompt.to_string(),
            had_image: query.image.is_some(),
            options: *options,
        });

        self.responses
            .lock()
            .unwrap()
            .get(query.model)
            .cloned()
            .unwrap_or_else(|| {
                ModelResponse::Content(format!("mock response from {}", query.model))
            })
    }
}
