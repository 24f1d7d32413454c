//! Entity model.
//!
//! Entities refer to each other by id. A [`Chat`] owns its messages; a
//! [`User`] only records which chats and contacts it knows about. Operations
//! that touch both sides of a membership take both entities mutably so the
//! relation can never be left half-updated.

mod attachment;
mod chat;
mod message;
mod notification;
mod reaction;
mod user;

pub use attachment::Attachment;
pub use chat::{Chat, GroupInfo};
pub use message::{Message, MessageKind};
pub use notification::{Notification, NotificationBody};
pub use reaction::{Reaction, ReactionType};
pub use user::{User, UserStatus};
