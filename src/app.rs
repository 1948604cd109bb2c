//! Request orchestration: two vision calls, recommendation extraction, links.

use crate::ai::{CallOptions, ChatService, GroqClient, ModelQuery};
use crate::links::build_buy_links;
use crate::models::{AdvisoryReply, Config, ImagePayload, ModelSet};
use crate::{prompts, recommend, Result};
use std::sync::Arc;
use tracing::info;

/// Turns one image + query into an [`AdvisoryReply`].
///
/// Cheap to clone; holds only the shared chat service and model identifiers.
#[derive(Clone)]
pub struct Advisor {
    chat: Arc<dyn ChatService>,
    models: ModelSet,
}

impl Advisor {
    /// Build an advisor from a concrete chat service.
    ///
    /// This is primarily useful for tests and local harnesses that need to
    /// inject mocks.
    pub fn with_service(chat: Arc<dyn ChatService>, models: ModelSet) -> Self {
        Self { chat, models }
    }

    /// Construct an advisor backed by [`GroqClient`].
    ///
    /// Fails with [`crate::Error::Config`] when the credential is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key()?;
        let client = GroqClient::new(api_key.to_string()).with_base_url(&config.groq_base_url);
        info!(
            "Models: analyzer={}, exercise={}, recommendation={}",
            config.models.analyzer, config.models.exercise, config.models.recommendation
        );
        Ok(Self::with_service(Arc::new(client), config.models.clone()))
    }

    pub fn models(&self) -> &ModelSet {
        &self.models
    }

    pub fn chat(&self) -> &dyn ChatService {
        self.chat.as_ref()
    }

    /// Run the full flow. Upstream failures never escape: vision failures are
    /// inlined as text and extraction failures become empty lists.
    ///
    /// The two vision calls run one after the other.
    pub async fn advise(&self, image: &ImagePayload, query: &str) -> AdvisoryReply {
        info!("Starting analysis (analyzer)...");
        let analysis = self
            .chat
            .complete(
                ModelQuery::vision(&self.models.analyzer, query, image),
                &CallOptions::VISION,
            )
            .await
            .into_text();

        info!("Starting exercises (yoga & exercise)...");
        let exercises = self
            .chat
            .complete(
                ModelQuery::vision(&self.models.exercise, prompts::EXERCISE, image),
                &CallOptions::VISION,
            )
            .await
            .into_text();
        info!("Analysis complete");

        let recommendations = recommend::recommend(
            self.chat.as_ref(),
            &self.models.recommendation,
            &analysis,
            &exercises,
        )
        .await;
        let buy_links = build_buy_links(&recommendations.medicines);

        info!(
            "Recommendations: {} medicines, {} home remedies, {} buy links",
            recommendations.medicines.len(),
            recommendations.home_remedies.len(),
            buy_links.len()
        );

        AdvisoryReply {
            llama_scout: analysis,
            llama_maverick: exercises,
            medicines: recommendations.medicines,
            home_remedies: recommendations.home_remedies,
            buy_links,
        }
    }
}
