use tokio::sync::Mutex;

use crate::{
    config::AppConfig,
    error::ModelError,
    imaging::PreparedImage,
    model::{ModelMetadata, VisionModel, client::OllamaVisionModel},
};

/// Owns the single model handle shared by the HTTP layer and batch runs.
///
/// Calls go through a mutex so the underlying model never sees two
/// generations at once.
pub struct ModelRegistry {
    model: Mutex<Box<dyn VisionModel>>,
    metadata: ModelMetadata,
}

impl ModelRegistry {
    pub fn initialize(config: &AppConfig) -> Result<Self, ModelError> {
        let model = OllamaVisionModel::new(config)?;
        Ok(Self::with_model(
            Box::new(model),
            ModelMetadata::from_config(config),
        ))
    }

    pub fn with_model(model: Box<dyn VisionModel>, metadata: ModelMetadata) -> Self {
        Self {
            model: Mutex::new(model),
            metadata,
        }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    pub async fn generate(
        &self,
        image: &PreparedImage,
        prompt: &str,
    ) -> Result<String, ModelError> {
        let model = self.model.lock().await;
        model.generate(image, prompt).await
    }
}
