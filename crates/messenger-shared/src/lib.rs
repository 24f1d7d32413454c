//! # messenger-shared
//!
//! Identifiers, the entity model and the domain error taxonomy shared by the
//! store and the binary.

pub mod constants;
pub mod error;
pub mod model;
pub mod types;

pub use error::{InvalidMessage, MessengerError, UserNotFound};
pub use types::{ChatId, MessageId, NotificationId, UserId};
