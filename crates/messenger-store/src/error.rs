use std::fmt;

use thiserror::Error;

/// Which kind of record a lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    Chat,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Chat => "chat",
        })
    }
}

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Generic I/O error while reading or writing the backing file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document backend could not parse or project a value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The markup backend could not parse or write the tree.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// A record exists but one of its fields cannot be interpreted.
    #[error("Malformed store: {0}")]
    Malformed(String),

    /// A caller asked for a record the store does not hold.
    #[error("No {kind} record with id {id}")]
    RecordNotFound { kind: RecordKind, id: u64 },

    #[error("Unknown storage backend: {0:?}")]
    UnknownBackend(String),

    /// No store path was configured and the platform has no data directory.
    #[error("Could not determine data directory")]
    NoDataDir,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
