use thiserror::Error;

use crate::types::{ChatId, MessageId, UserId};

/// Every failure raised by an entity operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MessengerError {
    #[error("User not found: {0}")]
    UserNotFound(#[from] UserNotFound),

    #[error("Invalid message: {0}")]
    InvalidMessage(#[from] InvalidMessage),

    #[error("User {user} is already a member of chat {chat}")]
    AlreadyMember { user: UserId, chat: ChatId },

    #[error("Chat {0} is not a group chat")]
    NotAGroupChat(ChatId),

    #[error("Message {message} does not exist in chat {chat}")]
    MessageNotFound { chat: ChatId, message: MessageId },

    #[error("Unknown user status: {0:?}")]
    UnknownStatus(String),
}

/// An expected membership is missing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserNotFound {
    /// The user tried to act in a chat it never joined.
    #[error("user {user} is not a member of chat {chat}")]
    NotAMember { user: UserId, chat: ChatId },

    /// A group participant removal targeted a user that is not there.
    #[error("user {user} is not a participant of chat {chat}")]
    NotAParticipant { user: UserId, chat: ChatId },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidMessage {
    #[error("message content is empty")]
    EmptyContent,

    #[error("attachment rejected: {0}")]
    InvalidAttachment(String),
}

impl MessengerError {
    pub fn is_user_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    pub fn is_invalid_message(&self) -> bool {
        matches!(self, Self::InvalidMessage(_))
    }
}

/// Convenience alias used by the model.
pub type Result<T> = std::result::Result<T, MessengerError>;
