//! Telegram adapter (teloxide).
//!
//! This crate implements the `shopbot-core` MessagingPort over Telegram Bot API
//! and feeds Telegram updates into the core router.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia, InputMediaPhoto},
    ApiError, RequestError,
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use shopbot_core::{
    catalog::MediaRef,
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{InlineButton, InlineKeyboard},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn msg_ref(chat_id: ChatId, msg: &Message) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        }
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        tracing::warn!("telegram flood control, retrying in {d:?}");
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(map_err(other)),
                },
            }
        }
    }
}

fn map_err(e: RequestError) -> Error {
    match e {
        RequestError::Api(ApiError::MessageNotModified) => Error::MessageNotModified,
        other => Error::Platform(format!("telegram error: {other}")),
    }
}

fn input_file(media: &MediaRef) -> Result<InputFile> {
    match media {
        MediaRef::File(path) => Ok(InputFile::file(path.clone())),
        MediaRef::Url(raw) => reqwest::Url::parse(raw)
            .map(InputFile::url)
            .map_err(|e| Error::Platform(format!("invalid image url {raw:?}: {e}"))),
    }
}

fn markup(keyboard: &InlineKeyboard) -> Result<InlineKeyboardMarkup> {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Vec::with_capacity(keyboard.rows.len());
    for row in &keyboard.rows {
        let mut out = Vec::with_capacity(row.len());
        for button in row {
            out.push(match button {
                InlineButton::Callback { label, data } => {
                    InlineKeyboardButton::callback(label.clone(), data.clone())
                }
                InlineButton::Url { label, url } => {
                    let url = reqwest::Url::parse(url)
                        .map_err(|e| Error::Platform(format!("invalid button url {url:?}: {e}")))?;
                    InlineKeyboardButton::url(label.clone(), url)
                }
            });
        }
        rows.push(out);
    }
    Ok(InlineKeyboardMarkup::new(rows))
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| self.bot.send_message(Self::tg_chat(chat_id), text.to_string()))
            .await?;
        Ok(Self::msg_ref(chat_id, &msg))
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &MediaRef,
        caption: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef> {
        let file = input_file(photo)?;
        let markup = markup(keyboard)?;
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_photo(Self::tg_chat(chat_id), file.clone())
                    .caption(caption.to_string())
                    .reply_markup(markup.clone())
            })
            .await?;
        Ok(Self::msg_ref(chat_id, &msg))
    }

    async fn edit_photo(
        &self,
        msg: MessageRef,
        photo: &MediaRef,
        caption: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        let file = input_file(photo)?;
        let markup = markup(keyboard)?;
        self.with_retry(|| {
            let media =
                InputMedia::Photo(InputMediaPhoto::new(file.clone()).caption(caption.to_string()));
            self.bot
                .edit_message_media(
                    Self::tg_chat(msg.chat_id),
                    Self::tg_msg_id(msg.message_id),
                    media,
                )
                .reply_markup(markup.clone())
        })
        .await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.with_retry(|| {
            let mut req = self.bot.answer_callback_query(callback_id.to_string());
            if let Some(t) = text {
                req = req.text(t.to_string());
            }
            req
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn not_modified_is_distinguished() {
        let err = map_err(RequestError::Api(ApiError::MessageNotModified));
        assert!(matches!(err, Error::MessageNotModified));
    }

    #[test]
    fn other_errors_are_platform_errors() {
        let err = map_err(RequestError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "boom",
        )));
        assert!(matches!(err, Error::Platform(_)));
    }

    #[test]
    fn keyboard_rows_map_to_buttons() {
        let kb = InlineKeyboard::one_per_row([
            InlineButton::callback("Widget", "product_p1"),
            InlineButton::url("Ask", "https://t.me/admin?text=Halo"),
        ]);
        let m = markup(&kb).unwrap();
        assert_eq!(m.inline_keyboard.len(), 2);
        assert_eq!(m.inline_keyboard[0][0].text, "Widget");
        assert!(matches!(
            &m.inline_keyboard[0][0].kind,
            InlineKeyboardButtonKind::CallbackData(d) if d == "product_p1"
        ));
        assert!(matches!(
            &m.inline_keyboard[1][0].kind,
            InlineKeyboardButtonKind::Url(u) if u.host_str() == Some("t.me")
        ));
    }

    #[test]
    fn bad_button_url_is_rejected() {
        let kb = InlineKeyboard::one_per_row([InlineButton::url("Ask", "not a url")]);
        assert!(matches!(markup(&kb), Err(Error::Platform(_))));
    }

    #[test]
    fn media_refs_map_to_input_files() {
        assert!(input_file(&MediaRef::Url("https://cdn.example/a.jpg".to_string())).is_ok());
        assert!(input_file(&MediaRef::File("a.jpg".into())).is_ok());
        assert!(input_file(&MediaRef::Url("https://".to_string())).is_err());
    }
}
