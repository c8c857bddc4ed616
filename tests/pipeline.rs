mod common;

use serde_json::json;

use sat_math_service::{
    AnalysisError, ExtractionError, ModelError, analyze, imaging::decode_bytes,
};

use common::{ScriptedModel, png_bytes, registry_with, reply};

#[tokio::test]
async fn analyze_extracts_and_tags_record() {
    let model = ScriptedModel::new(vec![reply("Algebra")]);
    let prompts = model.prompts();
    let registry = registry_with(model);
    let image = decode_bytes(&png_bytes(), 16).unwrap();

    let record = analyze(&registry, &image, "q7.png", "classify this")
        .await
        .unwrap();

    assert_eq!(record.get("topic"), Some(&json!(["Algebra"])));
    assert_eq!(record.get("sub_topic"), Some(&json!(["Linear equations"])));
    assert_eq!(record.image_path(), Some("q7.png"));
    assert_eq!(prompts.lock().as_slice(), ["classify this".to_string()]);
}

#[tokio::test]
async fn analyze_surfaces_extraction_failures() {
    let registry = registry_with(ScriptedModel::new(vec![Ok(
        "I could not read the question.".into()
    )]));
    let image = decode_bytes(&png_bytes(), 16).unwrap();

    let err = analyze(&registry, &image, "q.png", "p").await.unwrap_err();
    match err {
        AnalysisError::Extraction(ExtractionError::NoJsonFound { raw }) => {
            assert_eq!(raw, "I could not read the question.");
        }
        other => panic!("expected NoJsonFound, got {other:?}"),
    }
}

#[tokio::test]
async fn analyze_propagates_model_errors_without_retry() {
    let model = ScriptedModel::new(vec![
        Err(ModelError::Status {
            status: 500,
            body: "out of memory".into(),
        }),
        reply("Algebra"),
    ]);
    let prompts = model.prompts();
    let registry = registry_with(model);
    let image = decode_bytes(&png_bytes(), 16).unwrap();

    let err = analyze(&registry, &image, "q.png", "p").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Model(ModelError::Status { status: 500, .. })));
    assert_eq!(prompts.lock().len(), 1);
}
