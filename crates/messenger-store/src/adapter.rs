//! The contract both storage backends implement.

use std::path::Path;

use messenger_shared::model::{Chat, User};
use messenger_shared::{ChatId, UserId};

use crate::error::Result;
use crate::records::{ChatRecord, UserRecord};

/// A persistence backend holding users and chats.
///
/// Reads report a missing id as `Ok(None)`. Updates target the first record
/// with a matching id; when there is none the update is dropped without an
/// error and `Ok(false)` is returned. That leniency is long-standing
/// behaviour that callers may rely on. Every update that does apply rewrites
/// the whole backing file before returning.
pub trait StoreAdapter {
    /// Look up a user by id.
    fn get_user(&self, user_id: UserId) -> Result<Option<UserRecord>>;

    /// Look up a chat by id. Message senders come back as raw ids.
    fn get_chat(&self, chat_id: ChatId) -> Result<Option<ChatRecord>>;

    /// Overwrite username, email and chat list of the stored user.
    fn update_user(&mut self, user: &User) -> Result<bool>;

    /// Replace the stored message list (and group name) of the chat.
    fn update_chat(&mut self, chat: &Chat) -> Result<bool>;

    /// Write the entire store to disk.
    fn save(&self) -> Result<()>;

    /// Ids of every stored user, in file order.
    fn user_ids(&self) -> Result<Vec<UserId>>;

    /// Ids of every stored chat, in file order.
    fn chat_ids(&self) -> Result<Vec<ChatId>>;

    /// Backing file.
    fn path(&self) -> &Path;
}
