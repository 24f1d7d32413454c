use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// Unique user identifier, as stored in both record formats.
    UserId
);

numeric_id!(
    /// Unique chat identifier.
    ChatId
);

numeric_id!(
    /// Message identifier. Only unique within the owning chat.
    MessageId
);

numeric_id!(NotificationId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parses_with_whitespace() {
        assert_eq!(" 42\n".parse::<UserId>().unwrap(), UserId(42));
        assert!("abc".parse::<ChatId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&MessageId(7)).unwrap();
        assert_eq!(json, "7");
        let back: MessageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MessageId(7));
    }
}
