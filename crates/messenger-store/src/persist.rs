//! Whole-file writes.
//!
//! The new content goes to a temporary file next to the target, is flushed
//! and synced, and then renamed over the target. Readers either see the old
//! store or the new one, never a torn write.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};

pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;

    tracing::debug!(path = %path.display(), "store written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.txt");
        std::fs::write(&path, "old").unwrap();

        write_atomically(&path, |w| {
            w.write_all(b"new")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_failed_write_keeps_old_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.txt");
        std::fs::write(&path, "old").unwrap();

        let result = write_atomically(&path, |w| {
            w.write_all(b"partial")?;
            Err(StoreError::Malformed("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
