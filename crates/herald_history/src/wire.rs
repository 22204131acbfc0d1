//! Shapes of the remote API results consumed by the paginator.

use herald_core::MessageRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Result of `contacts.resolveUsername`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolvedPeer {
    /// The peer the username points at
    pub peer: PeerId,
    /// Chats referenced by the result
    #[serde(default)]
    pub chats: Vec<WireChat>,
}

/// Peer identifier inside a resolve result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PeerId {
    /// Channel id, absent when the username belongs to a user
    #[serde(default)]
    pub channel_id: Option<i64>,
}

/// A chat entry of a resolve result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireChat {
    /// Chat id
    pub id: i64,
    /// Access credential; passed back verbatim
    #[serde(default)]
    pub access_hash: JsonValue,
}

impl ResolvedPeer {
    /// Input peer for the resolved channel, if the result contains it.
    pub fn input_peer(&self) -> Option<InputPeer> {
        let channel_id = self.peer.channel_id?;
        self.chats
            .iter()
            .find(|chat| chat.id == channel_id)
            .map(|chat| InputPeer::channel(chat.id, chat.access_hash.clone()))
    }
}

/// Channel address passed to history calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputPeer {
    #[serde(rename = "_")]
    kind: &'static str,
    channel_id: i64,
    access_hash: JsonValue,
}

impl InputPeer {
    /// `inputPeerChannel` for `channel_id`.
    pub fn channel(channel_id: i64, access_hash: JsonValue) -> Self {
        Self {
            kind: "inputPeerChannel",
            channel_id,
            access_hash,
        }
    }

    /// Channel id.
    pub fn channel_id(&self) -> i64 {
        self.channel_id
    }
}

/// Result of `messages.getHistory`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPage {
    /// Total messages in the channel, when reported
    #[serde(default)]
    pub count: Option<u64>,
    /// Messages of this page, newest first
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    /// Users referenced by this page's messages
    #[serde(default)]
    pub users: Vec<WireUser>,
}

/// A message as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireMessage {
    /// Text; empty for media-only and service messages
    #[serde(default)]
    pub message: String,
    /// Unix timestamp in seconds
    #[serde(default)]
    pub date: i64,
    /// Sender, absent for posts signed by the channel itself
    #[serde(default)]
    pub from_id: Option<FromId>,
}

/// Sender reference of a message.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FromId {
    /// Sending user id
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl WireMessage {
    /// Id of the sending user, if the sender is a user.
    pub fn sender_id(&self) -> Option<i64> {
        self.from_id.as_ref().and_then(|from| from.user_id)
    }
}

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireUser {
    /// User id
    pub id: i64,
    /// Public username
    #[serde(default)]
    pub username: Option<String>,
    /// First name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Last name
    #[serde(default)]
    pub last_name: Option<String>,
}

impl HistoryPage {
    /// Records for messages that have text and a sender listed in this page.
    pub fn records(&self) -> Vec<MessageRecord> {
        self.messages
            .iter()
            .filter(|message| !message.message.is_empty())
            .filter_map(|message| {
                let sender_id = message.sender_id()?;
                let user = self.users.iter().find(|user| user.id == sender_id)?;
                MessageRecord::from_epoch_seconds(
                    message.message.clone(),
                    user.username.clone(),
                    user.first_name.clone().unwrap_or_default(),
                    user.last_name.clone().unwrap_or_default(),
                    message.date,
                )
            })
            .collect()
    }
}
