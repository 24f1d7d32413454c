//! # messenger-store
//!
//! Persistence for the messenger entity model. Two interchangeable backends
//! implement the same [`StoreAdapter`] contract over different on-disk
//! formats:
//!
//! - [`JsonStore`]: one JSON document holding `users` and `chats`
//! - [`XmlStore`]: the same records as an XML element tree
//!
//! Both keep the whole store in memory and rewrite the whole file on every
//! applied update. A [`Directory`] rebuilds live entities from the records
//! and pushes them back.

pub mod adapter;
pub mod backend;
pub mod directory;
pub mod json;
pub mod records;
pub mod xml;

mod error;
mod persist;

pub use adapter::StoreAdapter;
pub use backend::{create_store, open_store, BackendKind, StoreConfig};
pub use directory::{Directory, DirectoryError};
pub use error::{RecordKind, StoreError};
pub use json::JsonStore;
pub use records::{ChatRecord, MessageRecord, UserRecord};
pub use xml::XmlStore;
