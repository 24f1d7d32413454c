/// Application name
pub const APP_NAME: &str = "Messenger";

/// Id handed out to the first message of an empty chat
pub const FIRST_MESSAGE_ID: u64 = 1;
