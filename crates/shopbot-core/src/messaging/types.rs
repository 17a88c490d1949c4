use crate::domain::{ChatId, MessageRef, UserProfile};

/// Incoming update model, already stripped of Telegram specifics.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    Text(TextMessage),
    Callback(CallbackQuery),
}

#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub user: UserProfile,
    pub name: String,
    pub args: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub user: UserProfile,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub user: UserProfile,
    pub callback_id: String,
    pub data: String,
    /// Message the pressed button is attached to; absent for inline-mode messages.
    pub message: Option<MessageRef>,
}

impl IncomingUpdate {
    /// Classify a plain text message: `/cmd@bot args` becomes a command, anything else stays text.
    pub fn from_text(chat_id: ChatId, user: UserProfile, text: &str) -> Self {
        if text.starts_with('/') {
            let (name, args) = parse_command(text);
            return Self::Command(Command {
                chat_id,
                user,
                name,
                args,
            });
        }
        Self::Text(TextMessage {
            chat_id,
            user,
            text: text.to_string(),
        })
    }
}

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineButton {
    Callback { label: String, data: String },
    Url { label: String, url: String },
}

impl InlineButton {
    pub fn callback(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Callback {
            label: label.into(),
            data: data.into(),
        }
    }

    pub fn url(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Url {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Inline keyboard laid out as rows of buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    /// Convenience for "one button per row" layouts.
    pub fn one_per_row(buttons: impl IntoIterator<Item = InlineButton>) -> Self {
        Self {
            rows: buttons.into_iter().map(|b| vec![b]).collect(),
        }
    }
}
