use std::sync::Arc;

use teloxide::prelude::*;

use shopbot_core::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::types::{CallbackQuery as CoreCallback, IncomingUpdate},
};

use crate::router::AppState;

use super::user_profile;

/// Every press goes through the router, which acknowledges it first; presses
/// without data (game buttons) are acknowledged and otherwise ignored there.
pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let data = q.data.clone().unwrap_or_default();

    let message = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });

    let update = IncomingUpdate::Callback(CoreCallback {
        user: user_profile(&q.from),
        callback_id: q.id.clone(),
        data,
        message,
    });

    if let Err(e) = state.router.handle(update).await {
        tracing::error!(user_id = q.from.id.0, "callback handler failed: {e}");
    }

    Ok(())
}
