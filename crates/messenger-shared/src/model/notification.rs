use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ChatId, MessageId, NotificationId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationBody {
    Text(String),
    /// Points at a message inside a chat.
    Message { chat: ChatId, message: MessageId },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user: UserId,
    pub body: NotificationBody,
    pub timestamp: DateTime<Utc>,
    is_seen: bool,
}

impl Notification {
    pub fn text(id: NotificationId, user: UserId, text: impl Into<String>) -> Self {
        Self::new(id, user, NotificationBody::Text(text.into()))
    }

    pub fn for_message(id: NotificationId, user: UserId, chat: ChatId, message: MessageId) -> Self {
        Self::new(id, user, NotificationBody::Message { chat, message })
    }

    fn new(id: NotificationId, user: UserId, body: NotificationBody) -> Self {
        Self {
            id,
            user,
            body,
            timestamp: Utc::now(),
            is_seen: false,
        }
    }

    pub fn is_seen(&self) -> bool {
        self.is_seen
    }

    /// Unseen -> Seen. One way.
    pub fn mark_as_seen(&mut self) {
        self.is_seen = true;
    }
}
