//! Backend-neutral projections of stored entities.
//!
//! Both backends hand out exactly these shapes, so a record read from the
//! JSON file compares equal to the same record read from the XML file.

use serde::{Deserialize, Serialize};

use messenger_shared::model::{Chat, Message, User};
use messenger_shared::{ChatId, MessageId, UserId};

/// Stored fields of a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    /// Ids of the chats the user belongs to.
    #[serde(default)]
    pub chats: Vec<ChatId>,
}

/// Stored fields of a chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRecord {
    pub chat_id: ChatId,
    /// Present only for group chats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageRecord>,
}

/// Stored fields of a message. The sender is a raw id; turning it back into
/// a user is up to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRecord {
    pub message_id: MessageId,
    #[serde(default)]
    pub sender_id: Option<UserId>,
    #[serde(default)]
    pub content: String,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            chats: user.chats().to_vec(),
        }
    }
}

impl From<&Message> for MessageRecord {
    fn from(message: &Message) -> Self {
        Self {
            message_id: message.id,
            sender_id: message.sender,
            content: message.content.clone(),
        }
    }
}

impl From<&Chat> for ChatRecord {
    fn from(chat: &Chat) -> Self {
        Self {
            chat_id: chat.id,
            group_name: chat.group_name().map(str::to_string),
            messages: chat.messages().iter().map(MessageRecord::from).collect(),
        }
    }
}

impl UserRecord {
    /// Rebuild a user entity. Status, contacts and login state are not stored
    /// and start from their defaults.
    pub fn into_user(self) -> User {
        User::new(self.user_id, self.username, self.email).with_chats(self.chats)
    }
}

impl ChatRecord {
    /// Rebuild a chat entity without participants; those come from the
    /// users' side of the membership.
    pub fn into_chat(self) -> Chat {
        let messages = self
            .messages
            .into_iter()
            .map(|m| Message::restore(m.message_id, m.sender_id, m.content))
            .collect();
        Chat::restore(self.chat_id, self.group_name, messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_projection_round_trip() {
        let user = User::new(UserId(1), "alice", "a@example.com")
            .with_chats([ChatId(3), ChatId(4)]);
        let record = UserRecord::from(&user);
        assert_eq!(record.chats, vec![ChatId(3), ChatId(4)]);

        let back = record.clone().into_user();
        assert_eq!(UserRecord::from(&back), record);
    }

    #[test]
    fn test_chat_projection_keeps_messages_in_order() {
        let mut alice = User::new(UserId(1), "alice", "a@example.com");
        let mut chat = Chat::group(ChatId(2), "team");
        chat.add_participant(&mut alice).unwrap();
        alice.send_message(&mut chat, "one").unwrap();
        alice.send_message(&mut chat, "two").unwrap();

        let record = ChatRecord::from(&chat);
        assert_eq!(record.group_name.as_deref(), Some("team"));
        let contents: Vec<_> = record.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["one", "two"]);
        assert_eq!(record.messages[1].message_id, MessageId(2));
        assert_eq!(record.messages[1].sender_id, Some(UserId(1)));

        let restored = record.into_chat();
        assert_eq!(restored.messages().len(), 2);
        assert!(restored.participants().is_empty());
        assert_eq!(restored.group_name(), Some("team"));
    }

    #[test]
    fn test_missing_fields_default() {
        let record: UserRecord = serde_json::from_str(r#"{"user_id": 5}"#).unwrap();
        assert_eq!(record.username, "");
        assert!(record.chats.is_empty());

        let message: MessageRecord =
            serde_json::from_str(r#"{"message_id": 1, "sender_id": null, "content": "x"}"#)
                .unwrap();
        assert_eq!(message.sender_id, None);
    }
}
