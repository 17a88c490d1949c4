//! Event router: one inbound update in, at most one message or edit plus one log row out.

use std::sync::Arc;

use crate::{
    activity::ActivityLog,
    catalog::{Catalog, TOKEN_SEPARATOR},
    domain::{ChatId, UserProfile},
    messaging::types::{CallbackQuery, Command, IncomingUpdate, TextMessage},
    presenter::CatalogPresenter,
    Result,
};

pub const PRICELIST_KEYWORD: &str = "pricelist";
pub const NO_LOGS_TEXT: &str = "Belum ada log.";
pub const START_ACTION: &str = "start";

/// Decoded button-press token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    Product(String),
    Buy(String),
    Back,
}

impl CallbackAction {
    /// `product_<id>`, `buy_<id>` or `back`; anything else is `None`.
    pub fn parse(data: &str) -> Option<Self> {
        if data == "back" {
            return Some(Self::Back);
        }
        let (kind, id) = data.split_once(TOKEN_SEPARATOR)?;
        if id.is_empty() || id.contains(TOKEN_SEPARATOR) {
            return None;
        }
        match kind {
            "product" => Some(Self::Product(id.to_string())),
            "buy" => Some(Self::Buy(id.to_string())),
            _ => None,
        }
    }

    pub fn token(&self) -> String {
        match self {
            Self::Product(id) => format!("product_{id}"),
            Self::Buy(id) => format!("buy_{id}"),
            Self::Back => "back".to_string(),
        }
    }
}

pub fn buy_action_label(product_id: &str) -> String {
    format!("klik_beli_{product_id}")
}

pub fn mentions_pricelist(text: &str) -> bool {
    text.to_lowercase().contains(PRICELIST_KEYWORD)
}

/// Who may run `/logs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogsAccess {
    Everyone,
    AdminOnly { admin_username: String },
}

impl LogsAccess {
    pub fn allows(&self, user: &UserProfile) -> bool {
        match self {
            Self::Everyone => true,
            Self::AdminOnly { admin_username } => user.has_username(admin_username),
        }
    }
}

#[derive(Clone)]
pub struct Router {
    catalog: Arc<Catalog>,
    activity: Arc<dyn ActivityLog>,
    presenter: CatalogPresenter,
    logs_access: LogsAccess,
    logs_limit: usize,
}

impl Router {
    pub fn new(
        catalog: Arc<Catalog>,
        activity: Arc<dyn ActivityLog>,
        presenter: CatalogPresenter,
        logs_access: LogsAccess,
        logs_limit: usize,
    ) -> Self {
        Self {
            catalog,
            activity,
            presenter,
            logs_access,
            logs_limit,
        }
    }

    pub async fn handle(&self, update: IncomingUpdate) -> Result<()> {
        match update {
            IncomingUpdate::Command(cmd) => self.handle_command(cmd).await,
            IncomingUpdate::Text(msg) => self.handle_text(msg).await,
            IncomingUpdate::Callback(q) => self.handle_callback(q).await,
        }
    }

    async fn handle_command(&self, cmd: Command) -> Result<()> {
        tracing::debug!(command = %cmd.name, user_id = cmd.user.id.0, "command");
        match cmd.name.as_str() {
            "start" => {
                self.activity.record(&cmd.user, START_ACTION).await?;
                self.presenter.send_catalog(cmd.chat_id).await?;
                Ok(())
            }
            "logs" => self.show_logs(cmd.chat_id, &cmd.user).await,
            _ => Ok(()),
        }
    }

    async fn handle_text(&self, msg: TextMessage) -> Result<()> {
        if msg.user.is_bot || msg.text.is_empty() {
            return Ok(());
        }
        if mentions_pricelist(&msg.text) {
            tracing::debug!(user_id = msg.user.id.0, "pricelist keyword");
            self.presenter.send_catalog(msg.chat_id).await?;
        }
        Ok(())
    }

    async fn handle_callback(&self, q: CallbackQuery) -> Result<()> {
        // Clear the client's pending indicator before anything else.
        self.presenter
            .messenger()
            .answer_callback_query(&q.callback_id, None)
            .await?;

        let Some(action) = CallbackAction::parse(&q.data) else {
            tracing::warn!(data = %q.data, "ignoring unknown callback token");
            return Ok(());
        };
        tracing::debug!(token = %action.token(), user_id = q.user.id.0, "callback");

        match action {
            CallbackAction::Product(id) => {
                let (Some(product), Some(msg)) = (self.catalog.find_product(&id), q.message)
                else {
                    return Ok(());
                };
                self.presenter.show_product(msg, product).await
            }
            CallbackAction::Buy(id) => {
                self.activity.record(&q.user, &buy_action_label(&id)).await?;
                let (Some(product), Some(msg)) = (self.catalog.find_product(&id), q.message)
                else {
                    return Ok(());
                };
                self.presenter
                    .messenger()
                    .send_text(msg.chat_id, &product.link)
                    .await?;
                Ok(())
            }
            CallbackAction::Back => {
                let Some(msg) = q.message else {
                    return Ok(());
                };
                self.presenter.show_catalog_in_place(msg).await
            }
        }
    }

    async fn show_logs(&self, chat_id: ChatId, user: &UserProfile) -> Result<()> {
        if !self.logs_access.allows(user) {
            tracing::warn!(user_id = user.id.0, "/logs denied");
            return Ok(());
        }

        let entries = self.activity.recent(self.logs_limit).await?;
        let text = if entries.is_empty() {
            NO_LOGS_TEXT.to_string()
        } else {
            entries
                .iter()
                .map(|e| e.display_line())
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.presenter.messenger().send_text(chat_id, &text).await?;
        Ok(())
    }
}
