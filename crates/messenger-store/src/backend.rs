//! Backend selection and store configuration.
//!
//! All settings have defaults so a store can be opened with zero
//! configuration during local development.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;

use crate::adapter::StoreAdapter;
use crate::error::{Result, StoreError};
use crate::json::JsonStore;
use crate::xml::XmlStore;

/// On-disk format of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Json,
    Xml,
}

impl BackendKind {
    /// Guess the backend from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(StoreError::UnknownBackend(s.to_string())),
        }
    }
}

/// Where the store lives and which format it uses.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Env: `MESSENGER_BACKEND` (`json` / `xml`).
    /// Default: inferred from `MESSENGER_STORE_PATH`'s extension, else `json`.
    pub backend: BackendKind,

    /// Env: `MESSENGER_STORE_PATH`
    /// Default: `None`, meaning `messenger.<ext>` in the platform data
    /// directory:
    /// - Linux:   `~/.local/share/messenger/`
    /// - macOS:   `~/Library/Application Support/com.messenger.messenger/`
    /// - Windows: `{FOLDERID_RoamingAppData}\messenger\messenger\data\`
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// A store of kind `backend` at an explicit `path`.
    pub fn new(backend: BackendKind, path: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            path: Some(path.into()),
        }
    }

    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let mut explicit_backend = false;

        if let Some(value) = var("MESSENGER_BACKEND") {
            match value.parse::<BackendKind>() {
                Ok(kind) => {
                    config.backend = kind;
                    explicit_backend = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Invalid MESSENGER_BACKEND, using default");
                }
            }
        }

        if let Some(path) = var("MESSENGER_STORE_PATH").filter(|p| !p.trim().is_empty()) {
            let path = PathBuf::from(path);
            if !explicit_backend {
                if let Some(kind) = BackendKind::from_path(&path) {
                    config.backend = kind;
                }
            }
            config.path = Some(path);
        }

        config
    }

    /// The configured path, or the default file in the platform data
    /// directory.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let dirs = ProjectDirs::from("com", "messenger", "messenger").ok_or(StoreError::NoDataDir)?;
        Ok(dirs
            .data_dir()
            .join(format!("messenger.{}", self.backend.extension())))
    }
}

/// Open the configured store.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn StoreAdapter>> {
    let path = config.resolve_path()?;
    tracing::info!(backend = %config.backend, path = %path.display(), "opening store");
    Ok(match config.backend {
        BackendKind::Json => Box::new(JsonStore::open(path)?),
        BackendKind::Xml => Box::new(XmlStore::open(path)?),
    })
}

/// Create an empty store of the configured kind, creating parent directories.
pub fn create_store(config: &StoreConfig) -> Result<Box<dyn StoreAdapter>> {
    let path = config.resolve_path()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    tracing::info!(backend = %config.backend, path = %path.display(), "creating store");
    Ok(match config.backend {
        BackendKind::Json => Box::new(JsonStore::create(path)?),
        BackendKind::Xml => Box::new(XmlStore::create(path)?),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::from_vars(vars(&[]));
        assert_eq!(config.backend, BackendKind::Json);
        assert_eq!(config.path, None);
        match config.resolve_path() {
            Ok(path) => assert_eq!(
                path.file_name().and_then(|n| n.to_str()),
                Some("messenger.json")
            ),
            Err(e) => assert!(matches!(e, StoreError::NoDataDir)),
        }
    }

    #[test]
    fn test_backend_inferred_from_path() {
        let config = StoreConfig::from_vars(vars(&[("MESSENGER_STORE_PATH", "/tmp/data.xml")]));
        assert_eq!(config.backend, BackendKind::Xml);
        assert_eq!(config.path, Some(PathBuf::from("/tmp/data.xml")));
        assert_eq!(config.resolve_path().unwrap(), PathBuf::from("/tmp/data.xml"));
    }

    #[test]
    fn test_explicit_backend_wins() {
        let config = StoreConfig::from_vars(vars(&[
            ("MESSENGER_BACKEND", "json"),
            ("MESSENGER_STORE_PATH", "/tmp/data.xml"),
        ]));
        assert_eq!(config.backend, BackendKind::Json);
    }

    #[test]
    fn test_invalid_backend_falls_back() {
        let config = StoreConfig::from_vars(vars(&[("MESSENGER_BACKEND", "yaml")]));
        assert_eq!(config.backend, BackendKind::Json);
        assert!(matches!(
            "yaml".parse::<BackendKind>(),
            Err(StoreError::UnknownBackend(_))
        ));
    }

    #[test]
    fn test_xml_backend_default_path() {
        let config = StoreConfig::from_vars(vars(&[("MESSENGER_BACKEND", "XML")]));
        assert_eq!(config.backend, BackendKind::Xml);
        if let Ok(path) = config.resolve_path() {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("xml"));
        }
    }

    #[test]
    fn test_create_then_open() {
        let dir = tempfile::tempdir().unwrap();
        for backend in [BackendKind::Json, BackendKind::Xml] {
            let path = dir.path().join("nested").join(format!("s.{backend}"));
            let config = StoreConfig::new(backend, &path);
            create_store(&config).unwrap();
            let store = open_store(&config).unwrap();
            assert!(store.user_ids().unwrap().is_empty());
            assert_eq!(store.path(), path.as_path());
        }
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(BackendKind::Xml, dir.path().join("absent.xml"));
        assert!(matches!(open_store(&config), Err(StoreError::Io(_))));
    }
}
