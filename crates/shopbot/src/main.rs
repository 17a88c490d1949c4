use std::sync::Arc;

use shopbot_core::{activity::ActivityLog, catalog::Catalog, config::Config};
use shopbot_postgres::PgActivityLog;

#[tokio::main]
async fn main() -> Result<(), shopbot_core::Error> {
    shopbot_core::logging::init("shopbot")?;

    let cfg = Arc::new(Config::load()?);
    let catalog = Arc::new(Catalog::load(&cfg.catalog_path)?);

    let store = PgActivityLog::connect(&cfg.database_url, cfg.database_max_connections).await?;
    store.ensure_schema().await?;
    tracing::info!("activity log ready");
    let activity: Arc<dyn ActivityLog> = Arc::new(store);

    shopbot_telegram::router::run_polling(cfg, catalog, activity)
        .await
        .map_err(|e| shopbot_core::Error::Platform(format!("telegram bot failed: {e}")))?;

    Ok(())
}
