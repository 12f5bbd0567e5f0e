use std::sync::Arc;

use arbiter::callbacks::RecordingCallback;
use arbiter::core::{ArbiterError, ConversationTurn, IdealCategory, ProviderErrorKind, RunEvent};
use arbiter::models::{FakeBackend, ProviderResponse, ScriptedChatModel};
use arbiter::{
    EngineConfig, EvaluateIdealRequest, EvaluateQagRequest, EvaluateRubricRequest,
    EvaluationEngine, ENV_API_KEY,
};
use serde_json::json;

fn rubric_request() -> EvaluateRubricRequest {
    EvaluateRubricRequest {
        message_history: vec![ConversationTurn::user("What are your hours?")],
        company_data: [("hours".to_string(), "9am-5pm".to_string())].into(),
        agent_answer: "We are open 24/7.".to_string(),
        model: None,
    }
}

fn rubric_reply() -> String {
    json!({"metrics": [
        {"metric": "Faithfulness", "score": 5, "reason": "Says 24/7; company data says 9am-5pm."},
        {"metric": "Completeness", "score": 70, "reason": "Answers the question."},
        {"metric": "Conciseness", "score": 95, "reason": "One sentence."},
        {"metric": "Relevance", "score": 90, "reason": "About opening hours."},
        {"metric": "Tone & Politeness", "score": 80, "reason": "Neutral."},
    ]})
    .to_string()
}

fn engine_with(model: &ScriptedChatModel) -> EvaluationEngine {
    EvaluationEngine::builder()
        .config(EngineConfig::new("sk-test").unwrap())
        .chat_model(Arc::new(model.clone()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn missing_credential_fails_at_startup() {
    let model = ScriptedChatModel::from_replies([rubric_reply()]);
    let result = EvaluationEngine::builder()
        .chat_model(Arc::new(model.clone()))
        .build();

    let err = result.err().unwrap();
    assert!(matches!(err, ArbiterError::Config(_)));
    assert!(err.to_string().contains(ENV_API_KEY));
    assert_eq!(model.call_count(), 0);

    let from_lookup = EngineConfig::from_lookup(|_| None);
    assert!(matches!(from_lookup, Err(ArbiterError::Config(_))));
}

#[tokio::test]
async fn rubric_returns_five_metrics_as_json() {
    let model = ScriptedChatModel::from_replies([rubric_reply()]);
    let engine = engine_with(&model);

    let response = engine.evaluate_response_rubric(rubric_request()).await.unwrap();
    let body = serde_json::to_value(&response).unwrap();

    let metrics = body["metrics"].as_array().unwrap();
    assert_eq!(metrics.len(), 5);
    assert_eq!(metrics[0]["metric"], "Faithfulness");
    assert!(metrics[0]["score"].as_u64().unwrap() < 20);
    assert_eq!(metrics[4]["metric"], "Tone & Politeness");
    assert_eq!(model.requests()[0].model.as_deref(), Some("gpt-4o-mini"));
}

#[tokio::test]
async fn quota_failure_is_an_error_body_not_an_err() {
    let model = ScriptedChatModel::failing(ArbiterError::provider(
        ProviderErrorKind::QuotaExceeded,
        "insufficient_quota",
    ));
    let engine = engine_with(&model);

    let response = engine.evaluate_response_rubric(rubric_request()).await.unwrap();
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"error": ProviderErrorKind::QuotaExceeded.user_message()})
    );
}

#[tokio::test]
async fn ideal_answer_word_for_word_is_fully_equivalent() {
    let model = ScriptedChatModel::from_replies([
        r#"{"choice": "fully-equivalent", "reason": "Identical to the ideal answer."}"#,
    ]);
    let engine = engine_with(&model);
    let answer = "Refunds are available within 30 days with a receipt.";

    let response = engine
        .evaluate_response_ideal(EvaluateIdealRequest {
            message_history: vec![ConversationTurn::user("Can I get a refund?")],
            agent_answer: answer.to_string(),
            ideal_answer: answer.to_string(),
            model: Some("gpt-4o".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(response.success().unwrap().choice, IdealCategory::FullyEquivalent);
    assert_eq!(model.requests()[0].model.as_deref(), Some("gpt-4o"));
}

#[tokio::test]
async fn qag_with_eight_questions_is_an_error_body() {
    let questions: Vec<_> = (0..8)
        .map(|i| json!({"question": format!("Q{i}?"), "accuracy": 50, "completeness": 50, "relevance": 50, "reasoning": "ok"}))
        .collect();
    let model = ScriptedChatModel::from_replies([json!({ "questions": questions }).to_string()]);
    let engine = engine_with(&model);

    let response = engine
        .evaluate_response_qag(EvaluateQagRequest {
            message_history: vec![ConversationTurn::user("Do you ship to Canada?")],
            company_data: Default::default(),
            agent_answer: "Yes.".to_string(),
            model: None,
        })
        .await
        .unwrap();

    let body = serde_json::to_value(&response).unwrap();
    assert!(body["error"].as_str().unwrap().contains("questions"));
    assert!(body.get("questions").is_none());
}

#[tokio::test]
async fn empty_history_is_rejected() {
    let model = ScriptedChatModel::from_replies([rubric_reply()]);
    let engine = engine_with(&model);
    let mut request = rubric_request();
    request.message_history.clear();

    let err = engine.evaluate_response_rubric(request).await.unwrap_err();
    assert!(matches!(err, ArbiterError::InvalidRequest(_)));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn callbacks_observe_the_run() {
    let model = ScriptedChatModel::from_replies([rubric_reply()]);
    let recorder = RecordingCallback::new();
    let engine = EvaluationEngine::builder()
        .config(EngineConfig::new("sk-test").unwrap())
        .chat_model(Arc::new(model))
        .callbacks(Arc::new(recorder.clone()))
        .build()
        .unwrap();

    engine.evaluate_response_rubric(rubric_request()).await.unwrap();

    let events = recorder.events().await;
    assert!(matches!(events.first(), Some(RunEvent::EvaluationStarted { strategy, .. }) if strategy == "rubric"));
    assert!(matches!(events.last(), Some(RunEvent::EvaluationSucceeded { .. })));
}

#[tokio::test]
async fn openai_path_sends_a_deterministic_schema_request() {
    let backend = Arc::new(FakeBackend::new());
    backend.push_response(ProviderResponse {
        status: 200,
        body: json!({
            "choices": [{"message": {"role": "assistant", "content": rubric_reply()}}],
            "usage": {"prompt_tokens": 700, "completion_tokens": 200, "total_tokens": 900}
        }),
    });
    let engine = EvaluationEngine::builder()
        .config(
            EngineConfig::new("sk-test")
                .unwrap()
                .with_base_url("http://judge.local/v1")
                .with_default_model("gpt-4o-mini"),
        )
        .backend(backend.clone())
        .build()
        .unwrap();

    let response = engine.evaluate_response_rubric(rubric_request()).await.unwrap();
    assert!(response.is_success());

    let sent = &backend.requests()[0];
    assert_eq!(sent.url, "http://judge.local/v1/chat/completions");
    assert_eq!(sent.body["model"], "gpt-4o-mini");
    assert_eq!(sent.body["temperature"], 0.0);
    assert_eq!(sent.body["max_tokens"], 4000);
    assert_eq!(sent.body["response_format"]["type"], "json_schema");
    assert_eq!(sent.body["messages"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn openai_region_rejection_is_an_error_body() {
    let backend = Arc::new(FakeBackend::new());
    backend.push_response(ProviderResponse {
        status: 403,
        body: json!({"error": {
            "message": "Country, region, or territory not supported",
            "code": "unsupported_country_region_territory"
        }}),
    });
    let engine = EvaluationEngine::builder()
        .config(EngineConfig::new("sk-test").unwrap())
        .backend(backend)
        .build()
        .unwrap();

    let response = engine.evaluate_response_rubric(rubric_request()).await.unwrap();
    assert_eq!(
        response.error().unwrap().error,
        ProviderErrorKind::RegionUnsupported.user_message()
    );
}
