/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Identity of the user behind an inbound event, as recorded in the activity log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
    pub is_bot: bool,
}

impl UserProfile {
    /// Case-insensitive username match; a leading `@` on either side is ignored.
    pub fn has_username(&self, name: &str) -> bool {
        let want = name.trim_start_matches('@');
        self.username
            .as_deref()
            .map(|u| u.trim_start_matches('@').eq_ignore_ascii_case(want))
            .unwrap_or(false)
    }
}
