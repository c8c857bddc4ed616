use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// The model reply could not be turned into a record.
///
/// Both variants keep the untouched model output so callers can show or log
/// what the model actually said.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    NoJsonFound { raw: String },
    #[error("malformed JSON in model output: {message}")]
    MalformedJson { message: String, raw: String },
}

impl ExtractionError {
    pub fn raw(&self) -> &str {
        match self {
            ExtractionError::NoJsonFound { raw } | ExtractionError::MalformedJson { raw, .. } => {
                raw
            }
        }
    }
}

/// An extracted record does not satisfy the analysis schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record does not match the analysis schema: {0}")]
pub struct SchemaError(pub String);

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("cannot reach model server at {0}")]
    Connection(String),
    #[error("model request timed out after {0}s")]
    Timeout(u64),
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected model response: {0}")]
    Response(String),
    #[error("model client setup failed: {0}")]
    Setup(String),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("cannot decode image: {0}")]
    Decode(String),
    #[error("cannot encode image: {0}")]
    Encode(String),
    #[error("image worker failed: {0}")]
    Worker(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything that can go wrong while analyzing a single image.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("batch io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot serialize batch report: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Batch(#[from] BatchError),
}

impl From<AnalysisError> for ServiceError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Image(e) => ServiceError::Image(e),
            AnalysisError::Model(e) => ServiceError::Model(e),
            AnalysisError::Extraction(e) => ServiceError::Extraction(e),
        }
    }
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Extraction(_) | ServiceError::Schema(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::Image(ImageError::Decode(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Image(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Model(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Batch(BatchError::DirectoryNotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Batch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ServiceError::Extraction(err) => serde_json::json!({
                "error": self.to_string(),
                "raw": err.raw(),
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
            }),
        };

        (status, axum::Json(body)).into_response()
    }
}
