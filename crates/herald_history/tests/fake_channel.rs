//! In-memory stand-in for the remote messaging API.

#![allow(dead_code)]

use herald_error::{UpstreamError, UpstreamErrorKind};
use herald_rate_limit::{RemoteApi, classify_remote_error};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};

pub const CHANNEL_ID: i64 = 777;

/// Page with one message per `(text, sender_id)`; users 1 and 2 are listed.
pub fn page(messages: &[(&str, i64)]) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, (text, sender))| {
            json!({
                "message": text,
                "date": 1_700_000_000 + i as i64,
                "from_id": { "user_id": sender },
            })
        })
        .collect();
    json!({
        "count": 1000,
        "messages": messages,
        "users": [
            { "id": 1, "username": "alice", "first_name": "Alice", "last_name": "Archer" },
            { "id": 2, "username": null, "first_name": "Bob", "last_name": "Baker" },
        ],
    })
}

pub struct FakeChannel {
    username: String,
    mismatched_chat: bool,
    pages: HashMap<u64, Value>,
    failures: HashMap<u64, String>,
    throttle_once: Mutex<HashMap<u64, u64>>,
    resolves: Mutex<usize>,
    history: Mutex<Vec<(u64, Value)>>,
    throttled: Mutex<HashSet<u64>>,
}

impl FakeChannel {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            mismatched_chat: false,
            pages: HashMap::new(),
            failures: HashMap::new(),
            throttle_once: Mutex::new(HashMap::new()),
            resolves: Mutex::new(0),
            history: Mutex::new(Vec::new()),
            throttled: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_page(mut self, offset: u64, page: Value) -> Self {
        self.pages.insert(offset, page);
        self
    }

    pub fn with_failure(mut self, offset: u64, message: &str) -> Self {
        self.failures.insert(offset, message.to_string());
        self
    }

    pub fn with_throttle_once(self, offset: u64, wait_secs: u64) -> Self {
        self.throttle_once.lock().insert(offset, wait_secs);
        self
    }

    pub fn with_mismatched_chat(mut self) -> Self {
        self.mismatched_chat = true;
        self
    }

    pub fn history_offsets(&self) -> Vec<u64> {
        self.history.lock().iter().map(|(offset, _)| *offset).collect()
    }

    pub fn history_peers(&self) -> Vec<Value> {
        self.history.lock().iter().map(|(_, peer)| peer.clone()).collect()
    }

    pub fn resolve_count(&self) -> usize {
        *self.resolves.lock()
    }

    fn resolve(&self, params: &Value) -> Result<Value, UpstreamError> {
        *self.resolves.lock() += 1;
        if params["username"] != json!(self.username) {
            return Err(classify_remote_error("USERNAME_NOT_OCCUPIED"));
        }
        let chat_id = if self.mismatched_chat { CHANNEL_ID + 1 } else { CHANNEL_ID };
        Ok(json!({
            "peer": { "_": "peerChannel", "channel_id": CHANNEL_ID },
            "chats": [{ "id": chat_id, "access_hash": "9001", "title": "News" }],
            "users": [],
        }))
    }

    fn history(&self, params: &Value) -> Result<Value, UpstreamError> {
        let offset = params["add_offset"].as_u64().unwrap_or_default();
        self.history.lock().push((offset, params["peer"].clone()));

        if let Some(wait_secs) = self.throttle_once.lock().remove(&offset) {
            self.throttled.lock().insert(offset);
            return Err(classify_remote_error(format!("FLOOD_WAIT_{}", wait_secs)));
        }
        if let Some(message) = self.failures.get(&offset) {
            return Err(classify_remote_error(message.clone()));
        }
        Ok(self
            .pages
            .get(&offset)
            .cloned()
            .unwrap_or_else(|| json!({ "count": 0, "messages": [], "users": [] })))
    }
}

#[async_trait::async_trait]
impl RemoteApi for FakeChannel {
    async fn call(&self, method: &str, params: &Value) -> Result<Value, UpstreamError> {
        match method {
            "contacts.resolveUsername" => self.resolve(params),
            "messages.getHistory" => self.history(params),
            other => Err(UpstreamError::new(UpstreamErrorKind::Remote(format!(
                "unexpected method {}",
                other
            )))),
        }
    }
}
