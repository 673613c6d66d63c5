//! Support message threads.
//!
//! Each end user owns exactly one thread, keyed by their user id.
//! Assistants answer into the same thread; `sender` records which side
//! wrote a row and `sender_id` records the actual author account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Which side of the conversation authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SenderKind {
    User,
    Assistant,
}

impl SenderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderKind::User => "user",
            SenderKind::Assistant => "assistant",
        }
    }
}

impl From<&str> for SenderKind {
    fn from(s: &str) -> Self {
        match s {
            "assistant" => SenderKind::Assistant,
            _ => SenderKind::User,
        }
    }
}

/// One message in a user's thread. Messages are immutable once sent;
/// only the read flag changes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    /// Thread key: the end user this conversation belongs to.
    pub user_id: Uuid,
    pub sender: SenderKind,
    pub sender_id: Uuid,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// One row of the assistant inbox: a thread with its latest activity
/// and how many user messages still await an answer.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ThreadSummary {
    pub user_id: Uuid,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
}
