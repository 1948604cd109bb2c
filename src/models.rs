//! Data models and structures
//!
//! Defines the request-scoped values passed between the orchestration stages
//! and the process-wide configuration loaded once at startup.

use crate::ai::mime::{detect_image_mime, ImageMime};
use crate::{Error, Result};
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An uploaded image, base64-encoded and ready to embed in a data URI.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    mime: ImageMime,
    encoded: String,
    size: usize,
}

impl ImagePayload {
    /// Encode `bytes`, inferring the MIME type from `filename`.
    ///
    /// Returns [`Error::InvalidInput`] for a zero-length payload.
    pub fn new(bytes: &[u8], filename: &str) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidInput("Empty image file".to_string()));
        }

        Ok(Self {
            mime: detect_image_mime(filename),
            encoded: base64::engine::general_purpose::STANDARD.encode(bytes),
            size: bytes.len(),
        })
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// Size of the original (pre-encoding) image in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.encoded)
    }
}

/// Structured output of the extraction stage.
///
/// Entries are kept as the model produced them; a list containing
/// non-strings passes through untouched and is filtered later by
/// [`crate::links::build_buy_links`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationPayload {
    pub medicines: Vec<Value>,
    pub home_remedies: Vec<Value>,
}

impl RecommendationPayload {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty() && self.home_remedies.is_empty()
    }
}

/// Retailer search links for one medicine name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyLink {
    pub name: String,
    #[serde(rename = "1mg")]
    pub one_mg: String,
    pub pharmeasy: String,
    pub netmeds: String,
}

/// The reply returned for one image + query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryReply {
    /// Analyzer model output, or an inline failure message.
    pub llama_scout: String,
    /// Exercise/yoga model output, or an inline failure message.
    pub llama_maverick: String,
    pub medicines: Vec<Value>,
    pub home_remedies: Vec<Value>,
    pub buy_links: Vec<BuyLink>,
}

// Configuration
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai";
pub const DEFAULT_ANALYZER_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_EXERCISE_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";
pub const DEFAULT_RECOMMENDATION_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8007";

/// Model identifiers used by the three orchestration calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSet {
    pub analyzer: String,
    pub exercise: String,
    pub recommendation: String,
}

impl Default for ModelSet {
    fn default() -> Self {
        Self {
            analyzer: DEFAULT_ANALYZER_MODEL.to_string(),
            exercise: DEFAULT_EXERCISE_MODEL.to_string(),
            recommendation: DEFAULT_RECOMMENDATION_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream credential. Absence is reported per request, not at startup.
    pub groq_api_key: Option<String>,
    pub groq_base_url: String,
    pub models: ModelSet,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let groq_base_url = get("GROQ_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !groq_base_url.starts_with("http://") && !groq_base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "GROQ_BASE_URL must be an http(s) URL, got {:?}",
                groq_base_url
            )));
        }

        Ok(Self {
            groq_api_key: get("GROQ_API_KEY"),
            groq_base_url,
            models: ModelSet {
                analyzer: get("ANALYZER_MODEL")
                    .unwrap_or_else(|| DEFAULT_ANALYZER_MODEL.to_string()),
                exercise: get("EXERCISE_MODEL")
                    .unwrap_or_else(|| DEFAULT_EXERCISE_MODEL.to_string()),
                recommendation: get("RECOMMENDATION_MODEL")
                    .unwrap_or_else(|| DEFAULT_RECOMMENDATION_MODEL.to_string()),
            },
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        })
    }

    /// The credential, or a configuration error naming the missing variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.groq_api_key.as_deref().ok_or_else(|| {
            Error::Config("GROQ_API_KEY is missing. Add it to your .env file.".to_string())
        })
    }
}
