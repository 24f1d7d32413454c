use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InvalidMessage, Result};
use crate::model::Attachment;
use crate::types::{MessageId, UserId};

/// What a message carries besides its text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Text,
    Media(Attachment),
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Position-derived id, unique within the owning chat only.
    pub id: MessageId,
    /// `None` when the sender could not be resolved.
    pub sender: Option<UserId>,
    /// Set for direct chats, absent in a group context.
    pub recipient: Option<UserId>,
    pub content: String,
    /// `None` for messages restored from a record, which carries no time.
    pub timestamp: Option<DateTime<Utc>>,
    pub kind: MessageKind,
    is_read: bool,
}

impl Message {
    /// Create a new unread text message stamped with the current time.
    pub fn new(id: MessageId, sender: UserId, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(InvalidMessage::EmptyContent.into());
        }

        Ok(Self {
            id,
            sender: Some(sender),
            recipient: None,
            content,
            timestamp: Some(Utc::now()),
            kind: MessageKind::Text,
            is_read: false,
        })
    }

    /// Create a new unread message carrying an attachment.
    pub fn media(
        id: MessageId,
        sender: UserId,
        content: impl Into<String>,
        attachment: Attachment,
    ) -> Result<Self> {
        let mut message = Self::new(id, sender, content)?;
        message.kind = MessageKind::Media(attachment);
        Ok(message)
    }

    /// Rebuild a message from stored fields. Stored content is trusted as-is.
    pub fn restore(id: MessageId, sender: Option<UserId>, content: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            recipient: None,
            content: content.into(),
            timestamp: None,
            kind: MessageKind::Text,
            is_read: false,
        }
    }

    pub fn with_recipient(mut self, recipient: Option<UserId>) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// Unread -> Read. There is no way back.
    pub fn mark_as_read(&mut self) {
        self.is_read = true;
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match &self.kind {
            MessageKind::Media(attachment) => Some(attachment),
            MessageKind::Text => None,
        }
    }
}
