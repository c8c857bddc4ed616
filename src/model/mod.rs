mod client;
mod registry;
mod types;

pub use client::{OllamaVisionModel, VisionModel};
pub use registry::ModelRegistry;
pub use types::{GenerationOptions, ModelMetadata};
