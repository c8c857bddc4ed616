use tracing::debug;

use crate::{
    analysis::{ExtractedRecord, extract},
    error::AnalysisError,
    imaging::PreparedImage,
    model::ModelRegistry,
};

/// Run the model once on `image` and extract a record from its reply.
///
/// Model errors and extraction failures are returned unchanged; nothing is
/// retried.
pub async fn analyze(
    registry: &ModelRegistry,
    image: &PreparedImage,
    source_id: &str,
    prompt: &str,
) -> Result<ExtractedRecord, AnalysisError> {
    let raw = registry.generate(image, prompt).await?;
    debug!(source_id, reply_len = raw.len(), "model reply received");
    Ok(extract(&raw, source_id)?)
}
