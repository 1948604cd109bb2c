//! HTTP surface: `GET /` status and `POST /upload_and_query`.

use crate::app::Advisor;
use crate::models::{AdvisoryReply, Config, ImagePayload};
use crate::Error;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Uploads larger than axum's 2 MB default are common for phone photos.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    /// `None` when the upstream credential is missing; every query then fails with 500.
    advisor: Option<Arc<Advisor>>,
}

impl AppState {
    pub fn new(advisor: Option<Advisor>) -> Self {
        Self {
            advisor: advisor.map(Arc::new),
        }
    }

    /// Build state from config, tolerating a missing credential.
    pub fn from_config(config: &Config) -> Self {
        match Advisor::from_config(config) {
            Ok(advisor) => Self::new(Some(advisor)),
            Err(e) => {
                error!("{}", e);
                Self::new(None)
            }
        }
    }
}

/// Error returned to HTTP callers as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unprocessable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Unprocessable(detail) => (StatusCode::UNPROCESSABLE_ENTITY, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::InvalidInput(detail) => ApiError::BadRequest(detail),
            Error::Config(detail) => ApiError::Internal(detail),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/upload_and_query", post(upload_and_query))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: &Config) -> crate::Result<()> {
    let app = router(AppState::from_config(config));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn root() -> impl IntoResponse {
    Json(json!({ "status": "AI-DOCTOR API is running", "version": "1.0" }))
}

struct UploadForm {
    image: Vec<u8>,
    filename: String,
    query: String,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut query: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Unprocessable(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::Unprocessable(format!("Failed to read image: {}", e))
                })?;
                image = Some((bytes.to_vec(), filename));
            }
            "query" => {
                let text = field.text().await.map_err(|e| {
                    ApiError::Unprocessable(format!("Failed to read query: {}", e))
                })?;
                query = Some(text);
            }
            _ => {
                tracing::trace!("Ignoring unknown multipart field: {}", name);
            }
        }
    }

    let (image, filename) =
        image.ok_or_else(|| ApiError::Unprocessable("Missing form field: image".to_string()))?;
    let query =
        query.ok_or_else(|| ApiError::Unprocessable("Missing form field: query".to_string()))?;

    Ok(UploadForm {
        image,
        filename,
        query,
    })
}

async fn upload_and_query(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AdvisoryReply>, ApiError> {
    let advisor = state.advisor.as_ref().ok_or_else(|| {
        ApiError::Internal("GROQ_API_KEY is missing. Add it to your .env file.".to_string())
    })?;

    let form = read_form(multipart).await?;
    info!("Received query: {}", form.query);
    info!("Received image: {} ({} bytes)", form.filename, form.image.len());

    let image = ImagePayload::new(&form.image, &form.filename)?;
    info!("Image type: {}", image.mime());

    Ok(Json(advisor.advise(&image, &form.query).await))
}
