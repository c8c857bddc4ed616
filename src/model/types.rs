use serde::{Deserialize, Serialize};

use crate::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub max_new_tokens: usize,
    pub temperature: f64,
}

impl GenerationOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_new_tokens: config.max_new_tokens,
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub endpoint: String,
    pub image_size: u32,
    pub max_new_tokens: usize,
    pub temperature: f64,
}

impl ModelMetadata {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model_id: config.model_id.clone(),
            endpoint: config.model_endpoint.clone(),
            image_size: config.image_size,
            max_new_tokens: config.max_new_tokens,
            temperature: config.temperature,
        }
    }
}

/// Wire types for the Ollama `/api/chat` endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatOptions {
    pub temperature: f64,
    pub num_predict: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    #[serde(default)]
    pub content: String,
}
