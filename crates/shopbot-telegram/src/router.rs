use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};

use shopbot_core::{
    activity::ActivityLog,
    catalog::Catalog,
    config::Config,
    dispatch::{LogsAccess, Router},
    messaging::port::MessagingPort,
    presenter::CatalogPresenter,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub router: Router,
}

pub fn logs_access(cfg: &Config) -> LogsAccess {
    if cfg.logs_admin_only {
        LogsAccess::AdminOnly {
            admin_username: cfg.admin_username.clone(),
        }
    } else {
        LogsAccess::Everyone
    }
}

fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Lihat katalog produk"),
        BotCommand::new("logs", "Aktivitas terbaru"),
    ]
}

pub async fn run_polling(
    cfg: Arc<Config>,
    catalog: Arc<Catalog>,
    activity: Arc<dyn ActivityLog>,
) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    match bot.get_me().await {
        Ok(me) => tracing::info!("shopbot started: @{}", me.username()),
        Err(e) => tracing::warn!("getMe failed: {e}"),
    }
    tracing::info!(
        products = catalog.products.len(),
        admin = %cfg.admin_username,
        logs_admin_only = cfg.logs_admin_only,
        "serving catalog"
    );

    // Command menu is cosmetic; failure does not stop the bot.
    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        tracing::warn!("setMyCommands failed: {e}");
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let presenter = CatalogPresenter::new(messenger, catalog.clone(), cfg.admin_username.clone());
    let router = Router::new(
        catalog,
        activity,
        presenter,
        logs_access(&cfg),
        cfg.logs_limit,
    );

    let state = Arc::new(AppState { cfg, router });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("shopbot stopped");
    Ok(())
}
