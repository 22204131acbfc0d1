//! Tests for retry-on-throttle behavior.

use herald_rate_limit::{
    RateLimitedCaller, RecordingSleeper, RemoteApi, UpstreamError, UpstreamErrorKind,
    classify_remote_error, ensure_session,
};
use herald_error::AuthErrorKind;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// Replays scripted outcomes and records every call it receives.
#[derive(Default)]
struct ScriptedApi {
    outcomes: Mutex<VecDeque<Result<Value, UpstreamError>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedApi {
    fn new(outcomes: Vec<Result<Value, UpstreamError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().clone()
    }
}

#[async_trait::async_trait]
impl RemoteApi for ScriptedApi {
    async fn call(&self, method: &str, params: &Value) -> Result<Value, UpstreamError> {
        self.calls.lock().push((method.to_string(), params.clone()));
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::new(UpstreamErrorKind::Remote("script exhausted".into()))))
    }
}

fn caller_for(api: &Arc<ScriptedApi>, sleeper: &Arc<RecordingSleeper>) -> RateLimitedCaller {
    RateLimitedCaller::with_sleeper(api.clone(), sleeper.clone())
}

#[tokio::test]
async fn test_throttles_are_waited_out_and_retried() {
    let api = Arc::new(ScriptedApi::new(vec![
        Err(classify_remote_error("FLOOD_WAIT_3")),
        Err(classify_remote_error("FLOOD_WAIT_1")),
        Err(classify_remote_error("FLOOD_WAIT_7")),
        Ok(json!({ "ok": true })),
    ]));
    let sleeper = Arc::new(RecordingSleeper::new());
    let caller = caller_for(&api, &sleeper);

    let params = json!({ "username": "news" });
    let result = caller.call("contacts.resolveUsername", &params).await.unwrap();

    assert_eq!(result, json!({ "ok": true }));
    assert_eq!(
        sleeper.requested(),
        vec![
            Duration::from_secs(3),
            Duration::from_secs(1),
            Duration::from_secs(7)
        ]
    );

    let calls = api.calls();
    assert_eq!(calls.len(), 4);
    assert!(
        calls
            .iter()
            .all(|(method, sent)| method == "contacts.resolveUsername" && sent == &params)
    );
}

#[tokio::test]
async fn test_many_throttles_never_surface() {
    let mut outcomes: Vec<_> = (0..50)
        .map(|_| Err(classify_remote_error("FLOOD_WAIT_2")))
        .collect();
    outcomes.push(Ok(json!(42)));
    let api = Arc::new(ScriptedApi::new(outcomes));
    let sleeper = Arc::new(RecordingSleeper::new());

    let result = caller_for(&api, &sleeper).call("messages.getHistory", &json!({})).await;

    assert_eq!(result.unwrap(), json!(42));
    assert_eq!(sleeper.total(), Duration::from_secs(100));
}

#[tokio::test]
async fn test_other_errors_propagate_without_waiting() {
    let api = Arc::new(ScriptedApi::new(vec![
        Err(classify_remote_error("CHANNEL_PRIVATE")),
        Ok(json!({})),
    ]));
    let sleeper = Arc::new(RecordingSleeper::new());

    let err = caller_for(&api, &sleeper)
        .call("messages.getHistory", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, UpstreamErrorKind::Remote("CHANNEL_PRIVATE".into()));
    assert!(sleeper.requested().is_empty());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_error_after_throttle_is_returned() {
    let api = Arc::new(ScriptedApi::new(vec![
        Err(classify_remote_error("FLOOD_WAIT_5")),
        Err(UpstreamError::new(UpstreamErrorKind::Transport("reset".into()))),
    ]));
    let sleeper = Arc::new(RecordingSleeper::new());

    let err = caller_for(&api, &sleeper)
        .call("messages.getHistory", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err.kind, UpstreamErrorKind::Transport("reset".into()));
    assert_eq!(sleeper.requested(), vec![Duration::from_secs(5)]);
}

#[tokio::test]
async fn test_ensure_session_accepts_signed_in_user() {
    let api = Arc::new(ScriptedApi::new(vec![Ok(json!({ "users": [{ "id": 1 }] }))]));
    let sleeper = Arc::new(RecordingSleeper::new());

    ensure_session(&caller_for(&api, &sleeper)).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls[0].0, "users.getFullUser");
    assert_eq!(calls[0].1, json!({ "id": { "_": "inputUserSelf" } }));
}

#[tokio::test]
async fn test_ensure_session_reports_missing_session() {
    let api = Arc::new(ScriptedApi::new(vec![Err(classify_remote_error(
        "AUTH_KEY_UNREGISTERED",
    ))]));
    let sleeper = Arc::new(RecordingSleeper::new());
    let err = ensure_session(&caller_for(&api, &sleeper)).await.unwrap_err();
    assert!(matches!(err.kind, AuthErrorKind::SessionUnavailable(ref msg) if msg.contains("AUTH_KEY_UNREGISTERED")));

    let api = Arc::new(ScriptedApi::new(vec![Ok(Value::Null)]));
    let err = ensure_session(&caller_for(&api, &sleeper)).await.unwrap_err();
    assert_eq!(err.kind, AuthErrorKind::NotSignedIn);
}
