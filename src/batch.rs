use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    analysis::{ExtractedRecord, analyze},
    config::AppConfig,
    error::{AnalysisError, BatchError},
    imaging::{decode_path_blocking, is_supported_image},
    model::ModelRegistry,
};

pub const REPORT_FILE_NAME: &str = "batch_report.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub folder: String,
    pub total_files: usize,
    pub successful: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub metadata: BatchMetadata,
    pub summary: BTreeMap<String, usize>,
    pub data: Vec<ExtractedRecord>,
}

impl BatchReport {
    pub fn new(folder: &Path, total_files: usize, data: Vec<ExtractedRecord>) -> Self {
        let summary = tally_topics(&data);
        BatchReport {
            metadata: BatchMetadata {
                folder: folder.display().to_string(),
                total_files,
                successful: data.len(),
            },
            summary,
            data,
        }
    }

    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(out)
    }
}

/// Analyze every image directly inside `folder` and write
/// `batch_report.json` next to them.
///
/// Only a folder that cannot be listed fails the call. Per-image failures
/// are logged and skipped but still count towards `total_files`.
pub async fn run_batch(
    registry: &ModelRegistry,
    config: &AppConfig,
    folder: &Path,
    prompt: &str,
) -> Result<BatchReport, BatchError> {
    let images = list_images(folder)?;
    info!(folder = %folder.display(), count = images.len(), "starting batch");

    let mut data = Vec::with_capacity(images.len());
    for path in &images {
        match process_file(registry, config, path, prompt).await {
            Ok(record) => data.push(record),
            Err(err) => warn!(file = %file_name(path), error = %err, "skipping image"),
        }
    }

    let report = BatchReport::new(folder, images.len(), data);
    let written = write_report(folder, &report)?;

    info!(
        total = report.metadata.total_files,
        successful = report.metadata.successful,
        report = %written.display(),
        "batch complete"
    );

    Ok(report)
}

/// Supported images directly inside `folder`, sorted by file name.
pub fn list_images(folder: &Path) -> Result<Vec<PathBuf>, BatchError> {
    if !folder.is_dir() {
        return Err(BatchError::DirectoryNotFound(folder.display().to_string()));
    }
    let entries = fs::read_dir(folder)
        .map_err(|e| BatchError::DirectoryNotFound(format!("{}: {e}", folder.display())))?;

    Ok(collect_images(
        folder,
        entries.map(|entry| entry.map(|entry| entry.path())),
    ))
}

fn collect_images<I>(folder: &Path, entries: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut images = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                warn!(folder = %folder.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if path.is_file() && is_supported_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    images
}

/// Count each listed topic once per occurrence across `records`.
pub fn tally_topics(records: &[ExtractedRecord]) -> BTreeMap<String, usize> {
    let mut summary = BTreeMap::new();
    for record in records {
        for topic in record.topic_labels() {
            *summary.entry(topic).or_insert(0) += 1;
        }
    }
    summary
}

pub fn write_report(folder: &Path, report: &BatchReport) -> Result<PathBuf, BatchError> {
    let path = folder.join(REPORT_FILE_NAME);
    fs::write(&path, report.to_pretty_json()?)?;
    Ok(path)
}

async fn process_file(
    registry: &ModelRegistry,
    config: &AppConfig,
    path: &Path,
    prompt: &str,
) -> Result<ExtractedRecord, AnalysisError> {
    let image = decode_path_blocking(path, config.image_size).await?;
    analyze(registry, &image, &file_name(path), prompt).await
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
