//! CLI configuration loaded from environment variables.
//!
//! Store settings come from [`StoreConfig`]; the rest selects what the
//! driver does once the store is open.

use messenger_shared::model::UserStatus;
use messenger_shared::{ChatId, UserId};
use messenger_store::StoreConfig;

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub store: StoreConfig,

    /// User to load and log in.
    /// Env: `MESSENGER_USER_ID`
    /// Default: `1`
    pub user_id: UserId,

    /// Status set after logging in.
    /// Env: `MESSENGER_STATUS` (`online` / `offline` / `away`)
    /// Default: `online`
    pub status: UserStatus,

    /// Chat to post `message` into.
    /// Env: `MESSENGER_CHAT_ID`
    /// Default: none
    pub chat_id: Option<ChatId>,

    /// Env: `MESSENGER_MESSAGE`
    /// Default: none (nothing is sent).
    pub message: Option<String>,

    /// Create an empty store when none exists at the configured path.
    /// Env: `MESSENGER_CREATE` (true/false)
    /// Default: `false`
    pub create_missing: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            user_id: UserId(1),
            status: UserStatus::Online,
            chat_id: None,
            message: None,
            create_missing: false,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self {
            store: StoreConfig::from_vars(&var),
            ..Self::default()
        };

        if let Some(value) = var("MESSENGER_USER_ID") {
            match value.parse::<UserId>() {
                Ok(id) => config.user_id = id,
                Err(_) => tracing::warn!(value = %value, "Invalid MESSENGER_USER_ID, using default"),
            }
        }

        if let Some(value) = var("MESSENGER_STATUS") {
            match value.parse::<UserStatus>() {
                Ok(status) => config.status = status,
                Err(e) => tracing::warn!(error = %e, "Invalid MESSENGER_STATUS, using default"),
            }
        }

        if let Some(value) = var("MESSENGER_CHAT_ID") {
            match value.parse::<ChatId>() {
                Ok(id) => config.chat_id = Some(id),
                Err(_) => tracing::warn!(value = %value, "Invalid MESSENGER_CHAT_ID, ignoring"),
            }
        }

        if let Some(message) = var("MESSENGER_MESSAGE") {
            if !message.is_empty() {
                config.message = Some(message);
            }
        }

        if let Some(value) = var("MESSENGER_CREATE") {
            config.create_missing = value != "false" && value != "0";
        }

        config
    }

    /// The message to send and where, if both were configured.
    pub fn outgoing(&self) -> Option<(ChatId, &str)> {
        Some((self.chat_id?, self.message.as_deref()?))
    }
}
