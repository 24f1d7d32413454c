//! # messenger-cli
//!
//! Small driver over the messenger store. It opens the configured store,
//! loads one user with their chats, logs them in, optionally posts a message,
//! persists what changed and reports the user's chats.

mod config;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use messenger_shared::constants::APP_NAME;
use messenger_shared::{ChatId, MessageId};
use messenger_store::{create_store, open_store, Directory, StoreAdapter};

use crate::config::CliConfig;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,messenger_store=debug")),
        )
        .init();

    info!("Starting {} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let config = CliConfig::from_env();
    info!(?config, "Loaded configuration");

    let report = run(&config)?;
    info!(
        user = %report.username,
        chats = report.chats,
        unread = report.unread,
        sent = ?report.sent,
        "Session finished"
    );
    Ok(())
}

/// What a driver session did, for the final status line.
#[derive(Debug)]
struct Report {
    username: String,
    chats: usize,
    unread: usize,
    sent: Option<(ChatId, MessageId)>,
}

fn run(config: &CliConfig) -> anyhow::Result<Report> {
    let mut store = open_or_create(config)?;
    let user_id = config.user_id;

    let mut directory = Directory::new();
    directory
        .load_user_with_chats(store.as_ref(), user_id)
        .with_context(|| format!("loading user {user_id}"))?;

    let user = directory.user_mut(user_id)?;
    user.log_in();
    user.change_status(config.status);
    info!(user_id = %user.id, username = %user.username, status = %user.status, "Logged in");

    let sent = match config.outgoing() {
        Some((chat_id, content)) => {
            let message_id = directory
                .send_message(user_id, chat_id, content)
                .with_context(|| format!("sending to chat {chat_id}"))?;
            directory.persist_chat(store.as_mut(), chat_id)?;
            info!(%chat_id, %message_id, "Message sent");
            Some((chat_id, message_id))
        }
        None => None,
    };

    if !directory.persist_user(store.as_mut(), user_id)? {
        tracing::warn!(%user_id, "user vanished from the store before it could be saved");
    }

    let mut unread = 0;
    for chat in directory.chats() {
        unread += chat.unread_count();
        match chat.get_last_message() {
            Some(last) => {
                let from = directory
                    .sender_of(last)
                    .map(|u| u.username.as_str())
                    .unwrap_or("unknown");
                info!(chat_id = %chat.id, group = ?chat.group_name(), from, last = %last.content, "Chat");
            }
            None => info!(chat_id = %chat.id, group = ?chat.group_name(), "Chat (empty)"),
        }
    }

    let user = directory.user_mut(user_id)?;
    user.log_out();

    Ok(Report {
        username: user.username.clone(),
        chats: user.chats().len(),
        unread,
        sent,
    })
}

fn open_or_create(config: &CliConfig) -> anyhow::Result<Box<dyn StoreAdapter>> {
    let path = config.store.resolve_path()?;
    if config.create_missing && !path.exists() {
        return create_store(&config.store)
            .with_context(|| format!("creating store at {}", path.display()));
    }
    open_store(&config.store).with_context(|| format!("opening store at {}", path.display()))
}
