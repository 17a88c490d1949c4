/// Core error type for the catalog bot.
///
/// Adapter crates map their specific errors (`sqlx`, `teloxide`) into this type
/// so the router can treat store and platform failures uniformly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(String),

    /// The platform refused an edit because the content is already displayed.
    #[error("message is not modified")]
    MessageNotModified,

    #[error("platform error: {0}")]
    Platform(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
