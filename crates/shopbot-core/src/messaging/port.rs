use async_trait::async_trait;

use crate::{
    catalog::MediaRef,
    domain::{ChatId, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Outbound side of the messaging platform.
///
/// Implementations map "content unchanged" edit rejections to
/// `Error::MessageNotModified` so callers can tell them apart from real failures.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &MediaRef,
        caption: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_photo(
        &self,
        msg: MessageRef,
        photo: &MediaRef,
        caption: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
