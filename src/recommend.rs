//! Medicine and home-remedy extraction
//!
//! A text-only model call reduces the two vision outputs into a small JSON
//! object. The model is not trusted to emit pure JSON, so its reply goes
//! through a staged pipeline:
//!
//! 1. [`find_candidate`]: greedy first `{` to last `}`
//! 2. [`parse_candidate`]: JSON parse
//! 3. [`validate_shape`]: must be a JSON object
//! 4. [`coerce`]: normalize `medicines` and `home_remedies` into lists
//!
//! Any stage failing yields [`RecommendationPayload::empty`].

use crate::ai::{CallOptions, ChatService, ModelQuery, ModelResponse};
use crate::models::RecommendationPayload;
use crate::prompts;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

/// Characters of each vision output forwarded to the extraction prompt.
pub const ANALYSIS_PREFIX_CHARS: usize = 2000;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("static regex is valid"));

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON object in model output")]
    NoCandidate,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

pub fn find_candidate(text: &str) -> Result<&str, ExtractError> {
    JSON_OBJECT
        .find(text)
        .map(|m| m.as_str())
        .ok_or(ExtractError::NoCandidate)
}

pub fn parse_candidate(candidate: &str) -> Result<Value, ExtractError> {
    Ok(serde_json::from_str(candidate)?)
}

pub fn validate_shape(value: Value) -> Result<Map<String, Value>, ExtractError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ExtractError::NotAnObject(json_type_name(&other))),
    }
}

/// Normalize the two fields. Never fails: unusable fields become empty lists.
pub fn coerce(mut object: Map<String, Value>) -> RecommendationPayload {
    let medicines = match object.remove("medicines") {
        Some(Value::String(s)) => split_medicines(&s),
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    let home_remedies = match object.remove("home_remedies") {
        Some(Value::String(s)) => split_remedies(&s),
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    RecommendationPayload {
        medicines,
        home_remedies,
    }
}

/// `"A, B"` → `["A", "B"]`; an empty string yields no entries.
fn split_medicines(s: &str) -> Vec<Value> {
    if s.is_empty() {
        return Vec::new();
    }
    s.split(',')
        .map(|piece| Value::String(piece.trim().to_string()))
        .collect()
}

/// One remedy per non-blank line.
fn split_remedies(s: &str) -> Vec<Value> {
    s.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Value::String(line.to_string()))
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Run the full pipeline over raw model text.
pub fn extract(text: &str) -> Result<RecommendationPayload, ExtractError> {
    let candidate = find_candidate(text)?;
    let value = parse_candidate(candidate)?;
    let object = validate_shape(value)?;
    Ok(coerce(object))
}

/// [`extract`], degrading to the empty payload with a warning.
pub fn parse_recommendations(text: &str) -> RecommendationPayload {
    extract(text).unwrap_or_else(|e| {
        tracing::warn!("Recommendations parse error: {}", e);
        RecommendationPayload::empty()
    })
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Build the extraction prompt from the two vision outputs.
pub fn build_prompt(analysis: &str, exercises: &str) -> String {
    prompts::render(
        prompts::RECOMMENDATION,
        &[
            ("analysis", truncate_chars(analysis, ANALYSIS_PREFIX_CHARS)),
            ("exercises", truncate_chars(exercises, ANALYSIS_PREFIX_CHARS)),
        ],
    )
}

/// Ask `model` for recommendations. Never fails; see module docs.
pub async fn recommend(
    chat: &dyn ChatService,
    model: &str,
    analysis: &str,
    exercises: &str,
) -> RecommendationPayload {
    let prompt = build_prompt(analysis, exercises);

    match chat
        .complete(ModelQuery::text(model, &prompt), &CallOptions::RECOMMENDATION)
        .await
    {
        ModelResponse::Content(text) => parse_recommendations(&text),
        ModelResponse::Failed(failure) => {
            tracing::warn!("Recommendation call failed, returning empty lists: {}", failure);
            RecommendationPayload::empty()
        }
    }
}
