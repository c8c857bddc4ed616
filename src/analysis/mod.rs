mod extractor;
mod pipeline;
mod record;

pub use extractor::{
    ExtractedRecord, IMAGE_PATH_FIELD, MULTI_VALUED_FIELDS, UNKNOWN_TOPIC, extract,
};
pub use pipeline::analyze;
pub use record::{AnalysisRecord, Difficulty, QuestionType};
