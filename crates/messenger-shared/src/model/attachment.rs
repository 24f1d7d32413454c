use serde::{Deserialize, Serialize};

use crate::error::{InvalidMessage, Result};
use crate::types::UserId;

/// Metadata of an uploaded file. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    /// Size in bytes.
    file_size: u64,
    /// MIME type or extension, whatever the uploader reported.
    file_type: String,
    uploaded_by: UserId,
}

impl Attachment {
    /// Describe an upload. Rejects uploads without a name, a type, or any
    /// content.
    pub fn new(
        file_name: impl Into<String>,
        file_size: u64,
        file_type: impl Into<String>,
        uploaded_by: UserId,
    ) -> Result<Self> {
        let file_name = file_name.into();
        let file_type = file_type.into();

        if file_name.trim().is_empty() {
            return Err(InvalidMessage::InvalidAttachment("missing file name".into()).into());
        }
        if file_type.trim().is_empty() {
            return Err(InvalidMessage::InvalidAttachment("missing file type".into()).into());
        }
        if file_size == 0 {
            return Err(
                InvalidMessage::InvalidAttachment(format!("{file_name} is empty")).into(),
            );
        }

        Ok(Self {
            file_name,
            file_size,
            file_type,
            uploaded_by,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn uploaded_by(&self) -> UserId {
        self.uploaded_by
    }
}
