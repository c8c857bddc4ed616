#![allow(dead_code)]

use std::{collections::VecDeque, io::Cursor, path::Path, sync::Arc};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use parking_lot::Mutex;

use sat_math_service::{
    AppConfig, ModelError, ModelRegistry, VisionModel, imaging::PreparedImage,
    model::ModelMetadata,
};

/// Replays canned replies in call order and records the prompts it saw.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

#[async_trait]
impl VisionModel for ScriptedModel {
    async fn generate(&self, _image: &PreparedImage, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Response("script exhausted".into())))
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        image_size: 16,
        ..AppConfig::default()
    }
}

pub fn registry_with(model: ScriptedModel) -> Arc<ModelRegistry> {
    let config = test_config();
    Arc::new(ModelRegistry::with_model(
        Box::new(model),
        ModelMetadata::from_config(&config),
    ))
}

pub fn reply(topic: &str) -> Result<String, ModelError> {
    Ok(format!(
        "Here is my analysis:\n{{\"answer\": \"B\", \"topic\": [\"{topic}\"], \"sub_topic\": \"Linear equations\", \"difficulty\": \"medium\", \"question_type\": \"multiple_choice\"}}\nGood luck!"
    ))
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

pub fn write_png(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), png_bytes()).unwrap();
}
