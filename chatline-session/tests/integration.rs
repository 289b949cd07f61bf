//! Integration tests for chatline-session.

use std::future::Future;
use std::sync::Mutex;

use chatline_session::{ConversationStore, send, send_streaming};
use chatline_sse::{Preview, event_stream};
use chatline_types::{
    ChatMessage, ChatRequest, ChatResponse, Provider, ProviderError, Role, StoreError,
    StreamHandle, StreamIssue, TurnError,
};

/// A mock provider that replays scripted SSE lines and records requests.
struct MockProvider {
    lines: Vec<Result<String, String>>,
    fail_with_status: Option<u16>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    fn streaming(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| Ok(l.to_string())).collect(),
            fail_with_status: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            lines: Vec::new(),
            fail_with_status: Some(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn recorded(&self) -> Vec<ChatRequest> {
        self.requests.lock().expect("test lock poisoned").clone()
    }

    fn record(&self, request: ChatRequest) -> Result<(), ProviderError> {
        self.requests.lock().expect("test lock poisoned").push(request);
        match self.fail_with_status {
            Some(status) => Err(ProviderError::ServiceUnavailable(format!("HTTP {status}"))),
            None => Ok(()),
        }
    }
}

impl Provider for MockProvider {
    fn complete(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ProviderError>> + Send {
        let result = self.record(request).map(|()| ChatResponse {
            id: Some("mock".into()),
            model: None,
            message: ChatMessage::assistant("non-streamed reply"),
        });
        async move { result }
    }

    fn complete_stream(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<StreamHandle, ProviderError>> + Send {
        let lines = self.lines.clone();
        let result = self.record(request).map(|()| StreamHandle {
            receiver: Box::pin(event_stream(futures::stream::iter(lines))),
        });
        async move { result }
    }
}

const HELLO: [&str; 6] = [
    r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#,
    r#"data: {"choices":[{"delta":{"content":"lo"}}]}"#,
    "data: not-json",
    r#"data: {"choices":[{"delta":{"reasoning_content":"thinking"}}]}"#,
    "data: [DONE]",
    r#"data: {"choices":[{"delta":{"content":"ignored"}}]}"#,
];

#[tokio::test]
async fn streamed_turn_appends_both_messages() {
    let provider = MockProvider::streaming(&HELLO);
    let mut store = ConversationStore::new();
    let id = store.create();
    let mut renders: Vec<String> = Vec::new();
    let preview = Preview::new().cursor("|").reasoning_delimiters(" [", "]");

    let outcome = send_streaming(
        &provider,
        &mut store,
        &id,
        "Say hello",
        &preview,
        &mut |t: &str| renders.push(t.into()),
    )
    .await
    .unwrap();

    assert_eq!(outcome.message.content, "Hello");
    assert_eq!(outcome.message.reasoning.as_deref(), Some("thinking"));
    assert!(!outcome.terminated_early);
    assert!(outcome.interrupted.is_none());
    assert!(matches!(
        outcome.issues.as_slice(),
        [StreamIssue::MalformedEvent { .. }]
    ));

    assert_eq!(renders, vec!["Hel|", "Hello|", "Hello [thinking]|", "Hello [thinking]"]);

    let conversation = store.get(&id).unwrap();
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.messages[0], ChatMessage::user("Say hello"));
    assert_eq!(conversation.messages[1], outcome.message);
    assert_eq!(conversation.title(), "Say hello...");
}

#[tokio::test]
async fn request_carries_full_history() {
    let provider = MockProvider::streaming(&HELLO);
    let mut store = ConversationStore::new();
    let id = store.create();
    let mut ignore = |_: &str| {};

    send_streaming(&provider, &mut store, &id, "first", &Preview::new(), &mut ignore)
        .await
        .unwrap();
    send_streaming(&provider, &mut store, &id, "second", &Preview::new(), &mut ignore)
        .await
        .unwrap();

    let requests = provider.recorded();
    assert_eq!(requests.len(), 2);
    let roles: Vec<Role> = requests[1].messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
    assert_eq!(requests[1].messages[2].content, "second");
    assert_eq!(store.get(&id).unwrap().messages.len(), 4);
}

#[tokio::test]
async fn provider_failure_keeps_only_user_message() {
    let provider = MockProvider::failing(503);
    let mut store = ConversationStore::new();
    let id = store.create();
    let mut renders: Vec<String> = Vec::new();

    let err = send_streaming(
        &provider,
        &mut store,
        &id,
        "hello?",
        &Preview::new(),
        &mut |t: &str| renders.push(t.into()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TurnError::Provider(ProviderError::ServiceUnavailable(_))));
    assert!(renders.is_empty());
    let messages = &store.get(&id).unwrap().messages;
    assert_eq!(messages.as_slice(), &[ChatMessage::user("hello?")]);
}

#[tokio::test]
async fn unknown_conversation_never_calls_provider() {
    let provider = MockProvider::streaming(&HELLO);
    let mut store = ConversationStore::new();

    let err = send_streaming(
        &provider,
        &mut store,
        "chat_missing",
        "hi",
        &Preview::new(),
        &mut |_: &str| {},
    )
    .await
    .unwrap_err();

    assert!(matches!(err, TurnError::Store(StoreError::NotFound(_))));
    assert!(provider.recorded().is_empty());
}

#[tokio::test]
async fn interrupted_stream_keeps_partial_reply() {
    let provider = MockProvider {
        lines: vec![
            Ok(r#"data: {"choices":[{"delta":{"content":"Partial"}}]}"#.into()),
            Err("connection reset by peer".into()),
        ],
        fail_with_status: None,
        requests: Mutex::new(Vec::new()),
    };
    let mut store = ConversationStore::new();
    let id = store.create();

    let outcome = send_streaming(&provider, &mut store, &id, "go", &Preview::new(), &mut |_: &str| {})
        .await
        .unwrap();

    assert!(outcome.terminated_early);
    assert!(outcome.interrupted.as_deref().is_some_and(|m| m.contains("connection reset")));
    assert_eq!(outcome.message.content, "Partial");
    assert_eq!(store.get(&id).unwrap().messages.len(), 2);
}

#[tokio::test]
async fn stream_without_sentinel_is_flagged() {
    let provider = MockProvider::streaming(&[r#"data: {"choices":[{"delta":{"content":"so far"}}]}"#]);
    let mut store = ConversationStore::new();
    let id = store.create();

    let outcome = send_streaming(&provider, &mut store, &id, "go", &Preview::new(), &mut |_: &str| {})
        .await
        .unwrap();

    assert!(outcome.terminated_early);
    assert!(outcome.interrupted.is_none());
    assert_eq!(outcome.message.content, "so far");
}

#[tokio::test]
async fn non_streamed_turn_appends_reply() {
    let provider = MockProvider::streaming(&[]);
    let mut store = ConversationStore::new();
    let id = store.create();

    let reply = send(&provider, &mut store, &id, "ping").await.unwrap();

    assert_eq!(reply.content, "non-streamed reply");
    let messages = &store.get(&id).unwrap().messages;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1], reply);
}

#[tokio::test]
async fn stores_are_independent() {
    let provider = MockProvider::streaming(&HELLO);
    let mut first = ConversationStore::new();
    let mut second = ConversationStore::new();
    let a = first.create();
    let b = second.create();

    send(&provider, &mut first, &a, "only in first").await.unwrap();

    assert_eq!(first.get(&a).unwrap().messages.len(), 2);
    assert!(second.get(&b).unwrap().messages.is_empty());
}
