use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ExtractionError;

/// Fields that hold a list of values. Any scalar from the model is wrapped
/// into a one-element list.
pub const MULTI_VALUED_FIELDS: &[&str] = &["topic", "sub_topic"];

/// Field overwritten with the identifier of the analyzed image.
pub const IMAGE_PATH_FIELD: &str = "image_path";

/// Topic counted for records that carry no `topic` field.
pub const UNKNOWN_TOPIC: &str = "Unknown";

/// A record as the model produced it, after normalization but before schema
/// validation. Unknown fields are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedRecord(Map<String, Value>);

impl ExtractedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn image_path(&self) -> Option<&str> {
        self.0.get(IMAGE_PATH_FIELD).and_then(Value::as_str)
    }

    /// Topic labels used for batch tallies, trimmed. Non-string entries are
    /// counted by their JSON text.
    pub fn topic_labels(&self) -> Vec<String> {
        match self.0.get("topic") {
            None => vec![UNKNOWN_TOPIC.to_string()],
            Some(Value::Array(items)) => items.iter().map(label_of).collect(),
            Some(other) => vec![label_of(other)],
        }
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ExtractedRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Parse `raw` into a record and tag it with `source_id`.
pub fn extract(raw: &str, source_id: &str) -> Result<ExtractedRecord, ExtractionError> {
    let span = locate_json(raw).ok_or_else(|| ExtractionError::NoJsonFound {
        raw: raw.to_string(),
    })?;

    let mut fields: Map<String, Value> =
        serde_json::from_str(span).map_err(|e| ExtractionError::MalformedJson {
            message: e.to_string(),
            raw: raw.to_string(),
        })?;

    normalize_multi_valued(&mut fields);
    fields.insert(
        IMAGE_PATH_FIELD.to_string(),
        Value::String(source_id.to_string()),
    );

    Ok(ExtractedRecord(fields))
}

/// First `{` through last `}`, inclusive.
fn locate_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if start < end {
        Some(&raw[start..=end])
    } else {
        None
    }
}

fn normalize_multi_valued(fields: &mut Map<String, Value>) {
    for field in MULTI_VALUED_FIELDS {
        if let Some(value) = fields.get_mut(*field) {
            if !value.is_array() && !value.is_null() {
                let scalar = value.take();
                *value = Value::Array(vec![scalar]);
            }
        }
    }
}
