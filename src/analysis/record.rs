use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{analysis::ExtractedRecord, error::SchemaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    FreeResponse,
}

/// A validated analysis of one question image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub answer: String,
    pub topic: Vec<String>,
    pub sub_topic: Vec<String>,
    pub difficulty: Difficulty,
    pub question_type: QuestionType,
    pub image_path: String,
}

impl TryFrom<ExtractedRecord> for AnalysisRecord {
    type Error = SchemaError;

    fn try_from(record: ExtractedRecord) -> Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(record.into_inner()))
            .map_err(|e| SchemaError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::extract;

    #[test]
    fn complete_record_validates() {
        let raw = r#"{"answer": "12", "topic": "Algebra", "sub_topic": ["Systems"], "difficulty": "hard", "question_type": "free_response", "confidence": 0.9}"#;
        let record = AnalysisRecord::try_from(extract(raw, "q.png").unwrap()).unwrap();

        assert_eq!(record.answer, "12");
        assert_eq!(record.topic, vec!["Algebra"]);
        assert_eq!(record.sub_topic, vec!["Systems"]);
        assert_eq!(record.difficulty, Difficulty::Hard);
        assert_eq!(record.question_type, QuestionType::FreeResponse);
        assert_eq!(record.image_path, "q.png");
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        let raw = r#"{"answer": "A", "topic": [], "sub_topic": [], "difficulty": "extreme", "question_type": "multiple_choice"}"#;
        let err = AnalysisRecord::try_from(extract(raw, "q.png").unwrap()).unwrap_err();
        assert!(err.0.contains("extreme"));
    }

    #[test]
    fn missing_answer_is_rejected() {
        let raw = r#"{"topic": ["Algebra"], "sub_topic": [], "difficulty": "easy", "question_type": "multiple_choice"}"#;
        assert!(AnalysisRecord::try_from(extract(raw, "q.png").unwrap()).is_err());
    }

    #[test]
    fn numeric_topics_are_rejected() {
        let raw = r#"{"answer": "A", "topic": [1, 2], "sub_topic": [], "difficulty": "easy", "question_type": "multiple_choice"}"#;
        assert!(AnalysisRecord::try_from(extract(raw, "q.png").unwrap()).is_err());
    }
}
