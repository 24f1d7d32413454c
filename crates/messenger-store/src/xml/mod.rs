//! Markup-tree backend.
//!
//! The file is parsed once into an [`Element`] tree. Records live at
//! `users/user[@id]` and `chats/chat[@id]` under the root; updates rebuild the
//! affected children in place and then write the whole tree back out.

pub mod element;
pub mod path;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path as FsPath, PathBuf};
use std::str::FromStr;

use messenger_shared::model::{Chat, User};
use messenger_shared::{ChatId, MessageId, UserId};

use crate::adapter::StoreAdapter;
use crate::error::{Result, StoreError};
use crate::persist::write_atomically;
use crate::records::{ChatRecord, MessageRecord, UserRecord};

pub use element::{Element, Node};
pub use path::Path;

const ROOT: &str = "data";

pub struct XmlStore {
    path: PathBuf,
    root: Element,
}

impl XmlStore {
    /// Open an existing store. The file handle is released before returning.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = Element::parse(BufReader::new(File::open(&path)?))?;

        tracing::info!(path = %path.display(), root = %root.name, "opened xml store");
        Ok(Self { path, root })
    }

    /// Create an empty store at `path`, replacing whatever is there.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            root: Element::new(ROOT)
                .with_child(Element::new("users"))
                .with_child(Element::new("chats")),
        };
        store.save()?;
        Ok(store)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    fn ids<T: FromStr>(&self, section: &str, item: &str) -> Result<Vec<T>> {
        let Some(section_el) = self.root.child(section) else {
            return Ok(Vec::new());
        };
        section_el
            .children_named(item)
            .map(|el| {
                let raw = el.attr("id").unwrap_or_default();
                parse_id(raw, || format!("<{item}> with id {raw:?}"))
            })
            .collect()
    }
}

fn user_path(id: UserId) -> Path {
    Path::keyed("users", "user", "id", id)
}

fn chat_path(id: ChatId) -> Path {
    Path::keyed("chats", "chat", "id", id)
}

fn parse_id<T: FromStr>(raw: &str, context: impl FnOnce() -> String) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| StoreError::Malformed(format!("{}: not a numeric id", context())))
}

fn user_record(id: UserId, el: &Element) -> Result<UserRecord> {
    let chats = match el.child("chats") {
        Some(chats) => chats
            .children_named("chat")
            .map(|c| {
                let text = c.text();
                parse_id(&text, || format!("user {id} chat entry {text:?}"))
            })
            .collect::<Result<Vec<ChatId>>>()?,
        None => Vec::new(),
    };

    Ok(UserRecord {
        user_id: id,
        username: el.child_text("username").unwrap_or_default(),
        email: el.child_text("email").unwrap_or_default(),
        chats,
    })
}

fn message_record(chat: ChatId, el: &Element) -> Result<MessageRecord> {
    let raw_id = el.attr("id").unwrap_or_default();
    let message_id: MessageId = parse_id(raw_id, || format!("chat {chat} message id {raw_id:?}"))?;

    let sender_text = el.child_text("sender_id").unwrap_or_default();
    let sender_id = if sender_text.trim().is_empty() {
        None
    } else {
        Some(parse_id(&sender_text, || {
            format!("chat {chat} message {message_id} sender {sender_text:?}")
        })?)
    };

    Ok(MessageRecord {
        message_id,
        sender_id,
        content: el.child_text("content").unwrap_or_default(),
    })
}

fn chat_record(id: ChatId, el: &Element) -> Result<ChatRecord> {
    let messages = match el.child("messages") {
        Some(messages) => messages
            .children_named("message")
            .map(|m| message_record(id, m))
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(ChatRecord {
        chat_id: id,
        group_name: el.child_text("group_name"),
        messages,
    })
}

fn message_element(record: &MessageRecord) -> Element {
    let sender = record
        .sender_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    Element::new("message")
        .with_attr("id", record.message_id.to_string())
        .with_child(Element::new("sender_id").with_text(sender))
        .with_child(Element::new("content").with_text(record.content.as_str()))
}

impl StoreAdapter for XmlStore {
    fn get_user(&self, user_id: UserId) -> Result<Option<UserRecord>> {
        let path = user_path(user_id);
        match self.root.find(&path) {
            Some(el) => user_record(user_id, el).map(Some),
            None => {
                tracing::debug!(%user_id, %path, "user not in xml store");
                Ok(None)
            }
        }
    }

    fn get_chat(&self, chat_id: ChatId) -> Result<Option<ChatRecord>> {
        let path = chat_path(chat_id);
        match self.root.find(&path) {
            Some(el) => chat_record(chat_id, el).map(Some),
            None => {
                tracing::debug!(%chat_id, %path, "chat not in xml store");
                Ok(None)
            }
        }
    }

    fn update_user(&mut self, user: &User) -> Result<bool> {
        let Some(el) = self.root.find_mut(&user_path(user.id)) else {
            tracing::debug!(user_id = %user.id, "update skipped, user not stored");
            return Ok(false);
        };

        el.ensure_child("username").set_text(user.username.as_str());
        el.ensure_child("email").set_text(user.email.as_str());
        let chats = el.ensure_child("chats");
        chats.clear_children();
        for chat in user.chats() {
            chats.push(Element::new("chat").with_text(chat.to_string()));
        }

        self.save()?;
        Ok(true)
    }

    fn update_chat(&mut self, chat: &Chat) -> Result<bool> {
        let Some(el) = self.root.find_mut(&chat_path(chat.id)) else {
            tracing::debug!(chat_id = %chat.id, "update skipped, chat not stored");
            return Ok(false);
        };

        match chat.group_name() {
            Some(name) => el.ensure_child("group_name").set_text(name),
            None => el.remove_children_named("group_name"),
        }

        let messages = el.ensure_child("messages");
        messages.clear_children();
        for message in chat.messages() {
            messages.push(message_element(&MessageRecord::from(message)));
        }

        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        write_atomically(&self.path, |w| self.root.write_document(w))
    }

    fn user_ids(&self) -> Result<Vec<UserId>> {
        self.ids("users", "user")
    }

    fn chat_ids(&self) -> Result<Vec<ChatId>> {
        self.ids("chats", "chat")
    }

    fn path(&self) -> &FsPath {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(xml: &str) -> (tempfile::TempDir, XmlStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.xml");
        std::fs::write(&path, xml).unwrap();
        let store = XmlStore::open(&path).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_children_read_as_empty() {
        let (_dir, store) = open(
            r#"<data>
                 <users><user id="3"/></users>
                 <chats><chat id="4"><messages><message id="1"><content>hey</content></message></messages></chat></chats>
               </data>"#,
        );

        let user = store.get_user(UserId(3)).unwrap().unwrap();
        assert_eq!(user.username, "");
        assert_eq!(user.email, "");
        assert!(user.chats.is_empty());

        let chat = store.get_chat(ChatId(4)).unwrap().unwrap();
        assert_eq!(chat.group_name, None);
        assert_eq!(chat.messages[0].sender_id, None);
        assert_eq!(chat.messages[0].content, "hey");
    }

    #[test]
    fn test_bad_chat_id_is_malformed() {
        let (_dir, store) = open(
            r#"<data><users><user id="1"><chats><chat>one</chat></chats></user></users></data>"#,
        );
        assert!(matches!(
            store.get_user(UserId(1)),
            Err(StoreError::Malformed(_))
        ));
        assert!(store.get_user(UserId(2)).unwrap().is_none());
        assert!(store.chat_ids().unwrap().is_empty());
    }

    #[test]
    fn test_update_rebuilds_children_and_keeps_other_elements() {
        let (_dir, mut store) = open(
            r#"<data>
                 <users><user id="1"><username>alice</username><avatar>a.png</avatar><chats><chat>1</chat><chat>2</chat></chats></user></users>
               </data>"#,
        );

        let user = User::new(UserId(1), "alice2", "alice@example.com").with_chats([ChatId(2)]);
        assert!(store.update_user(&user).unwrap());

        let reopened = XmlStore::open(store.path()).unwrap();
        let record = reopened.get_user(UserId(1)).unwrap().unwrap();
        assert_eq!(record.username, "alice2");
        assert_eq!(record.email, "alice@example.com");
        assert_eq!(record.chats, vec![ChatId(2)]);

        let el = reopened.root().find(&user_path(UserId(1))).unwrap();
        assert_eq!(el.child_text("avatar").as_deref(), Some("a.png"));
    }

    #[test]
    fn test_padded_ids_are_addressable() {
        let (_dir, mut store) = open(
            r#"<data>
                 <users>
                   <user id=" 1"><username>alice</username><chats><chat>02</chat></chats></user>
                   <user id="01"><username>shadow</username></user>
                 </users>
                 <chats><chat id="02"><group_name>team</group_name></chat></chats>
               </data>"#,
        );

        assert_eq!(store.user_ids().unwrap(), vec![UserId(1), UserId(1)]);
        let record = store.get_user(UserId(1)).unwrap().unwrap();
        assert_eq!(record.username, "alice");
        assert_eq!(record.chats, vec![ChatId(2)]);

        let directory = crate::directory::Directory::load_all(&store).unwrap();
        assert_eq!(
            directory.chat(ChatId(2)).unwrap().participants(),
            &[UserId(1)]
        );

        let user = User::new(UserId(1), "alice2", "a@example.com");
        assert!(store.update_user(&user).unwrap());
        let reopened = XmlStore::open(store.path()).unwrap();
        assert_eq!(reopened.get_user(UserId(1)).unwrap().unwrap().username, "alice2");
        let shadow = reopened.root().child("users").unwrap().elements().nth(1).unwrap();
        assert_eq!(shadow.child_text("username").as_deref(), Some("shadow"));
    }

    #[test]
    fn test_create_writes_empty_sections() {
        let dir = tempfile::tempdir().unwrap();
        let store = XmlStore::create(dir.path().join("new.xml")).unwrap();
        let reopened = XmlStore::open(store.path()).unwrap();
        assert_eq!(reopened.root().name, ROOT);
        assert!(reopened.user_ids().unwrap().is_empty());
    }
}
