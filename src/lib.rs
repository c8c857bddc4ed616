pub mod analysis;
pub mod batch;
pub mod config;
pub mod error;
pub mod imaging;
pub mod model;
pub mod prompts;
pub mod server;

pub use analysis::{AnalysisRecord, ExtractedRecord, analyze, extract};
pub use batch::{BatchMetadata, BatchReport, run_batch};
pub use config::AppConfig;
pub use error::{AnalysisError, BatchError, ExtractionError, ModelError, ServiceError};
pub use model::{ModelRegistry, VisionModel};
pub use server::build_router;
