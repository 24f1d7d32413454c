//! In-memory registry of loaded entities.
//!
//! A [`Directory`] turns records from any [`StoreAdapter`] into live
//! [`User`] and [`Chat`] entities, relinks chat participants from the users'
//! membership lists, and pushes mutated entities back through the adapter.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use thiserror::Error;

use messenger_shared::model::{Chat, Message, User};
use messenger_shared::{ChatId, MessageId, MessengerError, UserId};

use crate::adapter::StoreAdapter;
use crate::error::{RecordKind, StoreError};

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] MessengerError),

    /// The entity was never loaded into this directory.
    #[error("{kind} {id} is not loaded")]
    NotLoaded { kind: RecordKind, id: u64 },
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Debug, Default)]
pub struct Directory {
    users: BTreeMap<UserId, User>,
    chats: BTreeMap<ChatId, Chat>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load one user, replacing any loaded copy. Loaded chats are relinked
    /// to the stored membership list, so chats the record no longer names
    /// lose the user as a participant.
    pub fn load_user(&mut self, store: &dyn StoreAdapter, id: UserId) -> Result<&User> {
        let record = store.get_user(id)?.ok_or(StoreError::RecordNotFound {
            kind: RecordKind::User,
            id: id.get(),
        })?;
        let user = record.into_user();

        for chat in self.chats.values_mut() {
            chat.sync_member(&user);
        }

        tracing::debug!(user_id = %id, chats = user.chats().len(), "user loaded");
        Ok(replace(&mut self.users, id, user))
    }

    /// Load one chat, replacing any loaded copy. Participants are taken from
    /// the users already loaded.
    pub fn load_chat(&mut self, store: &dyn StoreAdapter, id: ChatId) -> Result<&Chat> {
        let record = store.get_chat(id)?.ok_or(StoreError::RecordNotFound {
            kind: RecordKind::Chat,
            id: id.get(),
        })?;
        let mut chat = record.into_chat();

        for user in self.users.values() {
            chat.sync_member(user);
        }

        tracing::debug!(
            chat_id = %id,
            messages = chat.messages().len(),
            participants = chat.participants().len(),
            "chat loaded"
        );
        Ok(replace(&mut self.chats, id, chat))
    }

    /// Load a user and every chat it belongs to. Chats the store does not
    /// hold are skipped with a warning.
    pub fn load_user_with_chats(&mut self, store: &dyn StoreAdapter, id: UserId) -> Result<&User> {
        let chats = self.load_user(store, id)?.chats().to_vec();
        for chat_id in chats {
            match self.load_chat(store, chat_id) {
                Ok(_) => {}
                Err(DirectoryError::Store(StoreError::RecordNotFound { .. })) => {
                    tracing::warn!(user_id = %id, %chat_id, "user refers to a chat that is not stored");
                }
                Err(e) => return Err(e),
            }
        }
        self.user(id)
    }

    /// Load every user, then every chat.
    pub fn load_all(store: &dyn StoreAdapter) -> Result<Self> {
        let mut directory = Self::new();
        for id in store.user_ids()? {
            directory.load_user(store, id)?;
        }
        for id in store.chat_ids()? {
            directory.load_chat(store, id)?;
        }
        tracing::info!(
            users = directory.users.len(),
            chats = directory.chats.len(),
            path = %store.path().display(),
            "directory loaded"
        );
        Ok(directory)
    }

    // ------------------------------------------------------------------
    // Persisting
    // ------------------------------------------------------------------

    /// Returns `false` when the store holds no record for the user.
    pub fn persist_user(&self, store: &mut dyn StoreAdapter, id: UserId) -> Result<bool> {
        Ok(store.update_user(self.user(id)?)?)
    }

    /// Returns `false` when the store holds no record for the chat.
    pub fn persist_chat(&self, store: &mut dyn StoreAdapter, id: ChatId) -> Result<bool> {
        Ok(store.update_chat(self.chat(id)?)?)
    }

    /// Push every loaded entity back. Returns how many updates applied.
    pub fn persist_all(&self, store: &mut dyn StoreAdapter) -> Result<usize> {
        let mut applied = 0;
        for user in self.users.values() {
            applied += usize::from(store.update_user(user)?);
        }
        for chat in self.chats.values() {
            applied += usize::from(store.update_chat(chat)?);
        }
        Ok(applied)
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    pub fn user(&self, id: UserId) -> Result<&User> {
        self.users.get(&id).ok_or(DirectoryError::NotLoaded {
            kind: RecordKind::User,
            id: id.get(),
        })
    }

    pub fn user_mut(&mut self, id: UserId) -> Result<&mut User> {
        self.users.get_mut(&id).ok_or(DirectoryError::NotLoaded {
            kind: RecordKind::User,
            id: id.get(),
        })
    }

    pub fn chat(&self, id: ChatId) -> Result<&Chat> {
        self.chats.get(&id).ok_or(DirectoryError::NotLoaded {
            kind: RecordKind::Chat,
            id: id.get(),
        })
    }

    pub fn chat_mut(&mut self, id: ChatId) -> Result<&mut Chat> {
        self.chats.get_mut(&id).ok_or(DirectoryError::NotLoaded {
            kind: RecordKind::Chat,
            id: id.get(),
        })
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn chats(&self) -> impl Iterator<Item = &Chat> {
        self.chats.values()
    }

    /// Resolve a message's raw sender id. `None` if unresolved or not loaded.
    pub fn sender_of(&self, message: &Message) -> Option<&User> {
        message.sender.and_then(|id| self.users.get(&id))
    }

    // ------------------------------------------------------------------
    // Membership and messaging
    // ------------------------------------------------------------------

    fn pair_mut(&mut self, user: UserId, chat: ChatId) -> Result<(&mut User, &mut Chat)> {
        let user = self.users.get_mut(&user).ok_or(DirectoryError::NotLoaded {
            kind: RecordKind::User,
            id: user.get(),
        })?;
        let chat = self.chats.get_mut(&chat).ok_or(DirectoryError::NotLoaded {
            kind: RecordKind::Chat,
            id: chat.get(),
        })?;
        Ok((user, chat))
    }

    pub fn join_chat(&mut self, user: UserId, chat: ChatId) -> Result<()> {
        let (user, chat) = self.pair_mut(user, chat)?;
        user.join_chat(chat)?;
        Ok(())
    }

    pub fn send_message(&mut self, user: UserId, chat: ChatId, content: &str) -> Result<MessageId> {
        let (user, chat) = self.pair_mut(user, chat)?;
        Ok(user.send_message(chat, content)?)
    }

    pub fn add_participant(&mut self, chat: ChatId, user: UserId) -> Result<()> {
        let (user, chat) = self.pair_mut(user, chat)?;
        chat.add_participant(user)?;
        Ok(())
    }

    pub fn remove_participant(&mut self, chat: ChatId, user: UserId) -> Result<()> {
        let (user, chat) = self.pair_mut(user, chat)?;
        chat.remove_participant(user)?;
        Ok(())
    }
}

fn replace<K: Ord, V>(map: &mut BTreeMap<K, V>, key: K, value: V) -> &V {
    match map.entry(key) {
        Entry::Occupied(mut slot) => {
            slot.insert(value);
            slot.into_mut()
        }
        Entry::Vacant(slot) => slot.insert(value),
    }
}
