//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - converts the teloxide update into a core `IncomingUpdate`
//! - hands it to the core router
//! - logs (and swallows) whatever error the router returns

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message, User},
};

use shopbot_core::{
    domain::{ChatId, UserId, UserProfile},
    messaging::types::IncomingUpdate,
};

use crate::router::AppState;

mod callback;

pub(crate) fn user_profile(user: &User) -> UserProfile {
    UserProfile {
        id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        is_bot: user.is_bot,
    }
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    // Channel posts and service messages carry no sender or text.
    let Some(user) = msg.from() else {
        return Ok(());
    };
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let update = IncomingUpdate::from_text(ChatId(msg.chat.id.0), user_profile(user), text);
    if let Err(e) = state.router.handle(update).await {
        tracing::error!(
            chat_id = msg.chat.id.0,
            user_id = user.id.0,
            "message handler failed: {e}"
        );
    }
    Ok(())
}
