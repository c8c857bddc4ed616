use std::{path::PathBuf, sync::Arc};

use axum::{
    Form, Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::Html,
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    analysis::{AnalysisRecord, analyze},
    batch::{BatchReport, run_batch},
    config::AppConfig,
    error::ServiceError,
    imaging::decode_bytes_blocking,
    model::{ModelMetadata, ModelRegistry},
    prompts::{SAT_MATH_ANALYZER_PROMPT, SIMILAR_QUESTION_PROMPT},
};

const INDEX_HTML: &str = include_str!("ui/index.html");

/// Identifier used when an upload arrives without a file name.
const DEFAULT_UPLOAD_NAME: &str = "web_upload.png";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<ModelRegistry>,
    pub latest_batch: Arc<RwLock<Option<BatchReport>>>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub folder_path: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SimilarQuestionsResponse {
    pub filename: String,
    pub generated_questions: String,
}

struct Upload {
    filename: String,
    bytes: Vec<u8>,
    prompt: Option<String>,
}

pub fn build_router(config: Arc<AppConfig>, registry: Arc<ModelRegistry>) -> Router {
    let body_limit = config.max_upload_bytes;
    let state = AppState {
        latest_batch: Arc::new(RwLock::new(None)),
        registry,
        config,
    };

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/metadata", get(metadata))
        .route("/analyze", post(analyze_single))
        .route("/analyze/batch", post(analyze_batch))
        .route("/analyze/batch/latest", get(latest_batch))
        .route("/generate/similar", post(generate_similar))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

async fn metadata(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.registry.metadata().clone())
}

async fn analyze_single(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisRecord>, ServiceError> {
    let upload = read_upload(multipart).await?;
    let image = decode_bytes_blocking(upload.bytes, state.config.image_size).await?;
    let prompt = upload.prompt.as_deref().unwrap_or(SAT_MATH_ANALYZER_PROMPT);

    let extracted = analyze(&state.registry, &image, &upload.filename, prompt).await?;
    let record = AnalysisRecord::try_from(extracted)?;
    Ok(Json(record))
}

async fn analyze_batch(
    State(state): State<AppState>,
    Form(request): Form<BatchRequest>,
) -> Result<Json<BatchReport>, ServiceError> {
    let folder = PathBuf::from(request.folder_path.trim());
    let prompt = non_empty(request.prompt).unwrap_or_else(|| SAT_MATH_ANALYZER_PROMPT.to_string());

    let report = run_batch(&state.registry, &state.config, &folder, &prompt).await?;
    state.latest_batch.write().replace(report.clone());

    Ok(Json(report))
}

async fn latest_batch(State(state): State<AppState>) -> Result<Json<BatchReport>, ServiceError> {
    state
        .latest_batch
        .read()
        .clone()
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound("no batch has been run yet".into()))
}

async fn generate_similar(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SimilarQuestionsResponse>, ServiceError> {
    let upload = read_upload(multipart).await?;
    let image = decode_bytes_blocking(upload.bytes, state.config.image_size).await?;

    info!(filename = %upload.filename, "generating similar questions");
    let generated_questions = state
        .registry
        .generate(&image, SIMILAR_QUESTION_PROMPT)
        .await?;

    Ok(Json(SimilarQuestionsResponse {
        filename: upload.filename,
        generated_questions,
    }))
}

/// Collect the `file` part and an optional `prompt` part.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, ServiceError> {
    let mut file = None;
    let mut prompt = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .unwrap_or(DEFAULT_UPLOAD_NAME)
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServiceError::BadRequest(e.to_string()))?;
                file = Some((filename, bytes.to_vec()));
            }
            "prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServiceError::BadRequest(e.to_string()))?;
                prompt = non_empty(Some(text));
            }
            _ => {}
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| ServiceError::BadRequest("missing multipart field 'file'".into()))?;
    if bytes.is_empty() {
        return Err(ServiceError::BadRequest("uploaded file is empty".into()));
    }

    Ok(Upload {
        filename,
        bytes,
        prompt,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
