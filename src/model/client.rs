use async_trait::async_trait;
use tracing::{Instrument, info_span};

use crate::{
    config::AppConfig,
    error::ModelError,
    imaging::PreparedImage,
    model::types::{ChatMessage, ChatOptions, ChatRequest, ChatResponse, GenerationOptions},
    prompts::SYSTEM_PROMPT,
};

/// A multimodal model that answers a text prompt about one image.
///
/// Implementations are not required to tolerate concurrent calls;
/// [`ModelRegistry`](crate::model::ModelRegistry) serializes access.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(&self, image: &PreparedImage, prompt: &str) -> Result<String, ModelError>;
}

/// Vision model served by an Ollama-compatible HTTP server.
pub struct OllamaVisionModel {
    base_url: String,
    model_id: String,
    options: GenerationOptions,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl OllamaVisionModel {
    pub fn new(config: &AppConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(config.model_timeout)
            .build()
            .map_err(|e| ModelError::Setup(e.to_string()))?;

        Ok(Self {
            base_url: config.model_endpoint.trim_end_matches('/').to_string(),
            model_id: config.model_id.clone(),
            options: GenerationOptions::from_config(config),
            timeout_secs: config.model_timeout.as_secs(),
            client,
        })
    }

    fn map_send_error(&self, err: reqwest::Error) -> ModelError {
        if err.is_connect() {
            ModelError::Connection(self.base_url.clone())
        } else if err.is_timeout() {
            ModelError::Timeout(self.timeout_secs)
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl VisionModel for OllamaVisionModel {
    async fn generate(&self, image: &PreparedImage, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatRequest {
            model: &self.model_id,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                    images: None,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                    images: Some(vec![image.to_base64()]),
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: self.options.temperature,
                num_predict: self.options.max_new_tokens,
            },
        };

        let span = info_span!("model_generate", model = %self.model_id);
        async {
            let response = self
                .client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ModelError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let parsed: ChatResponse = response
                .json()
                .await
                .map_err(|e| ModelError::Response(e.to_string()))?;

            Ok(parsed.message.content)
        }
        .instrument(span)
        .await
    }
}
