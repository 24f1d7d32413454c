use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{MessageId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReactionType {
    Like,
    Love,
    Laugh,
    Sad,
    Angry,
    /// Anything else, usually an emoji.
    Custom(String),
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Like => f.write_str("like"),
            Self::Love => f.write_str("love"),
            Self::Laugh => f.write_str("laugh"),
            Self::Sad => f.write_str("sad"),
            Self::Angry => f.write_str("angry"),
            Self::Custom(other) => f.write_str(other),
        }
    }
}

impl FromStr for ReactionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "like" => Self::Like,
            "love" => Self::Love,
            "laugh" => Self::Laugh,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            _ => Self::Custom(s.trim().to_string()),
        })
    }
}

/// A user's reaction to a message, referenced by message id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Reaction {
    pub message_id: MessageId,
    pub user: UserId,
    pub reaction_type: ReactionType,
}

impl Reaction {
    pub fn new(message_id: MessageId, user: UserId, reaction_type: ReactionType) -> Self {
        Self {
            message_id,
            user,
            reaction_type,
        }
    }
}
