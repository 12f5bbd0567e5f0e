use arbiter_core::{ChatModel, ChatRequest, Message, ProviderErrorKind};
use arbiter_models::{FakeBackend, ProviderBackend, ProviderRequest, ProviderResponse, ScriptedChatModel};
use serde_json::json;

#[tokio::test]
async fn replays_in_order_and_records_requests() {
    let model = ScriptedChatModel::from_replies(["first", "second"]);
    let a = model
        .chat(ChatRequest::new(vec![Message::human("one")]).with_model("judge-a"))
        .await
        .unwrap();
    let b = model
        .chat(ChatRequest::new(vec![Message::human("two")]))
        .await
        .unwrap();

    assert_eq!(a.message.content(), "first");
    assert_eq!(b.message.content(), "second");
    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].model.as_deref(), Some("judge-a"));
    assert_eq!(requests[1].messages[0].content(), "two");
}

#[tokio::test]
async fn exhausted_script_is_an_unknown_provider_error() {
    let model = ScriptedChatModel::from_replies(Vec::<String>::new());
    let err = model
        .chat(ChatRequest::new(vec![Message::human("hi")]))
        .await
        .unwrap_err();
    assert_eq!(err.provider_kind(), Some(ProviderErrorKind::Unknown));
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn fake_backend_records_and_replays() {
    let backend = FakeBackend::new();
    backend.push_response(ProviderResponse {
        status: 200,
        body: json!({"ok": true}),
    });

    let response = backend
        .send(ProviderRequest {
            url: "http://localhost/v1/chat/completions".to_string(),
            headers: vec![],
            body: json!({"model": "m"}),
        })
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(backend.requests()[0].body["model"], "m");

    let err = backend
        .send(ProviderRequest {
            url: "http://localhost".to_string(),
            headers: vec![],
            body: json!({}),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("FakeBackend exhausted"));
}
