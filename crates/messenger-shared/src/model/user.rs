use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MessengerError, Result, UserNotFound};
use crate::model::{Attachment, Chat, Message};
use crate::types::{ChatId, MessageId, UserId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Online,
    #[default]
    Offline,
    Away,
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Away => "away",
        })
    }
}

impl FromStr for UserStatus {
    type Err = MessengerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "away" => Ok(Self::Away),
            _ => Err(MessengerError::UnknownStatus(s.to_string())),
        }
    }
}

/// A known user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
    contacts: Vec<UserId>,
    /// Chats this user is a member of, in join order.
    pub(crate) chats: Vec<ChatId>,
    logged_in: bool,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            status: UserStatus::default(),
            contacts: Vec::new(),
            chats: Vec::new(),
            logged_in: false,
        }
    }

    /// Seed the membership list from a stored record. Duplicates are dropped.
    pub fn with_chats(mut self, chats: impl IntoIterator<Item = ChatId>) -> Self {
        for chat in chats {
            if !self.chats.contains(&chat) {
                self.chats.push(chat);
            }
        }
        self
    }

    pub fn chats(&self) -> &[ChatId] {
        &self.chats
    }

    pub fn contacts(&self) -> &[UserId] {
        &self.contacts
    }

    pub fn is_member_of(&self, chat: ChatId) -> bool {
        self.chats.contains(&chat)
    }

    /// Join `chat`, recording the membership on both sides.
    pub fn join_chat(&mut self, chat: &mut Chat) -> Result<()> {
        if self.is_member_of(chat.id) {
            return Err(MessengerError::AlreadyMember {
                user: self.id,
                chat: chat.id,
            });
        }

        self.chats.push(chat.id);
        if !chat.participants.contains(&self.id) {
            chat.participants.push(self.id);
        }
        Ok(())
    }

    /// Append a text message to `chat` and return its id.
    pub fn send_message(&self, chat: &mut Chat, content: &str) -> Result<MessageId> {
        self.ensure_member(chat)?;
        let message = Message::new(chat.next_message_id(), self.id, content)?
            .with_recipient(chat.counterpart_of(self.id));
        Ok(chat.push(message))
    }

    /// Append a message carrying `attachment` to `chat` and return its id.
    pub fn send_media_message(
        &self,
        chat: &mut Chat,
        content: &str,
        attachment: Attachment,
    ) -> Result<MessageId> {
        self.ensure_member(chat)?;
        let message = Message::media(chat.next_message_id(), self.id, content, attachment)?
            .with_recipient(chat.counterpart_of(self.id));
        Ok(chat.push(message))
    }

    /// No-op if `contact` is already known.
    pub fn add_contact(&mut self, contact: UserId) {
        if !self.contacts.contains(&contact) {
            self.contacts.push(contact);
        }
    }

    pub fn change_status(&mut self, status: UserStatus) {
        self.status = status;
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn log_in(&mut self) {
        self.logged_in = true;
        self.status = UserStatus::Online;
    }

    pub fn log_out(&mut self) {
        self.logged_in = false;
        self.status = UserStatus::Offline;
    }

    fn ensure_member(&self, chat: &Chat) -> Result<()> {
        if self.is_member_of(chat.id) {
            Ok(())
        } else {
            Err(UserNotFound::NotAMember {
                user: self.id,
                chat: chat.id,
            }
            .into())
        }
    }
}
