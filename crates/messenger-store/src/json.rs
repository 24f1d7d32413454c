//! Structured-document backend.
//!
//! The whole file is parsed into one [`serde_json::Value`] when the store is
//! opened and serialized again in full on every write. Keys the record types
//! do not know about are carried through untouched.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use messenger_shared::model::{Chat, User};
use messenger_shared::{ChatId, UserId};

use crate::adapter::StoreAdapter;
use crate::error::{Result, StoreError};
use crate::persist::write_atomically;
use crate::records::{ChatRecord, MessageRecord, UserRecord};

const USERS: &str = "users";
const CHATS: &str = "chats";
const USER_ID: &str = "user_id";
const CHAT_ID: &str = "chat_id";

pub struct JsonStore {
    path: PathBuf,
    document: Value,
}

impl JsonStore {
    /// Open an existing store. The file handle is released before returning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let reader = BufReader::new(File::open(&path)?);
        let document: Value = serde_json::from_reader(reader)?;

        if !document.is_object() {
            return Err(StoreError::Malformed(format!(
                "{}: top level is not an object",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "opened json store");
        Ok(Self { path, document })
    }

    /// Create an empty store at `path`, replacing whatever is there.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            document: json!({ "users": [], "chats": [] }),
        };
        store.save()?;
        Ok(store)
    }

    fn section(&self, key: &str) -> &[Value] {
        self.document
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First entry of `key` whose `id_key` equals `id`.
    fn find(&self, key: &str, id_key: &str, id: u64) -> Option<&Value> {
        self.section(key).iter().find(|v| has_id(v, id_key, id))
    }

    fn find_mut(&mut self, key: &str, id_key: &str, id: u64) -> Option<&mut Map<String, Value>> {
        self.document
            .get_mut(key)
            .and_then(Value::as_array_mut)?
            .iter_mut()
            .find(|v| has_id(v, id_key, id))
            .and_then(Value::as_object_mut)
    }

    fn ids(&self, key: &str, id_key: &str) -> Result<Vec<u64>> {
        self.section(key)
            .iter()
            .map(|entry| {
                entry.get(id_key).and_then(Value::as_u64).ok_or_else(|| {
                    StoreError::Malformed(format!("{key} entry without a numeric {id_key}"))
                })
            })
            .collect()
    }
}

fn has_id(entry: &Value, id_key: &str, id: u64) -> bool {
    entry.get(id_key).and_then(Value::as_u64) == Some(id)
}

impl StoreAdapter for JsonStore {
    fn get_user(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let Some(entry) = self.find(USERS, USER_ID, user_id.get()) else {
            tracing::debug!(%user_id, "user not in json store");
            return Ok(None);
        };
        record(entry).map(Some)
    }

    fn get_chat(&self, chat_id: ChatId) -> Result<Option<ChatRecord>> {
        let Some(entry) = self.find(CHATS, CHAT_ID, chat_id.get()) else {
            tracing::debug!(%chat_id, "chat not in json store");
            return Ok(None);
        };
        record(entry).map(Some)
    }

    fn update_user(&mut self, user: &User) -> Result<bool> {
        let Some(entry) = self.find_mut(USERS, USER_ID, user.id.get()) else {
            tracing::debug!(user_id = %user.id, "update skipped, user not stored");
            return Ok(false);
        };

        entry.insert("username".into(), json!(user.username));
        entry.insert("email".into(), json!(user.email));
        entry.insert("chats".into(), json!(user.chats()));

        self.save()?;
        Ok(true)
    }

    fn update_chat(&mut self, chat: &Chat) -> Result<bool> {
        let Some(entry) = self.find_mut(CHATS, CHAT_ID, chat.id.get()) else {
            tracing::debug!(chat_id = %chat.id, "update skipped, chat not stored");
            return Ok(false);
        };

        let messages: Vec<MessageRecord> = chat.messages().iter().map(MessageRecord::from).collect();
        entry.insert("messages".into(), serde_json::to_value(messages)?);
        match chat.group_name() {
            Some(name) => {
                entry.insert("group_name".into(), json!(name));
            }
            None => {
                entry.remove("group_name");
            }
        }

        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        write_atomically(&self.path, |w| {
            serde_json::to_writer_pretty(&mut *w, &self.document)?;
            Ok(())
        })
    }

    fn user_ids(&self) -> Result<Vec<UserId>> {
        Ok(self.ids(USERS, USER_ID)?.into_iter().map(UserId).collect())
    }

    fn chat_ids(&self) -> Result<Vec<ChatId>> {
        Ok(self.ids(CHATS, CHAT_ID)?.into_iter().map(ChatId).collect())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn record<T: DeserializeOwned>(entry: &Value) -> Result<T> {
    Ok(serde_json::from_value(entry.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(dir: &Path) -> PathBuf {
        let path = dir.join("store.json");
        std::fs::write(
            &path,
            r#"{
              "users": [
                {"user_id": 1, "username": "alice", "email": "alice@example.com", "chats": [1], "theme": "dark"},
                {"user_id": 1, "username": "alice-dup", "email": "dup@example.com", "chats": []}
              ],
              "chats": [
                {"chat_id": 1, "messages": [{"message_id": 1, "sender_id": 1, "content": "hi"}]}
              ]
            }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_duplicate_ids_only_touch_first_match() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(fixture(dir.path())).unwrap();

        let mut user = store.get_user(UserId(1)).unwrap().unwrap().into_user();
        assert_eq!(user.username, "alice");
        user.username = "alice2".into();
        assert!(store.update_user(&user).unwrap());

        let reopened = JsonStore::open(store.path()).unwrap();
        let users = reopened.section(USERS);
        assert_eq!(users[0]["username"], "alice2");
        assert_eq!(users[1]["username"], "alice-dup");
    }

    #[test]
    fn test_unknown_keys_survive_updates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(fixture(dir.path())).unwrap();
        let user = store.get_user(UserId(1)).unwrap().unwrap().into_user();
        store.update_user(&user).unwrap();

        let reopened = JsonStore::open(store.path()).unwrap();
        assert_eq!(reopened.section(USERS)[0]["theme"], "dark");
    }

    #[test]
    fn test_top_level_must_be_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(JsonStore::open(&path), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_malformed_record_is_an_error_not_absence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"users": [{"user_id": 4, "chats": "nope"}]}"#).unwrap();
        let store = JsonStore::open(&path).unwrap();
        assert!(matches!(store.get_user(UserId(4)), Err(StoreError::Json(_))));
        assert!(store.get_user(UserId(5)).unwrap().is_none());
        assert!(store.chat_ids().unwrap().is_empty());
    }

    #[test]
    fn test_create_writes_empty_sections() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::create(dir.path().join("new.json")).unwrap();
        let reopened = JsonStore::open(store.path()).unwrap();
        assert!(reopened.user_ids().unwrap().is_empty());
        assert!(reopened.chat_ids().unwrap().is_empty());
    }
}
