use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

pub const DEFAULT_CATALOG_PATH: &str = "data.json";
pub const DEFAULT_ADMIN_USERNAME: &str = "szavvvv";
pub const DEFAULT_LOGS_LIMIT: usize = 20;
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Typed process configuration, read from the environment once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,
    pub database_url: String,
    pub catalog_path: PathBuf,

    // Contact / admin
    pub admin_username: String,
    pub logs_admin_only: bool,
    pub logs_limit: usize,

    // Store
    pub database_max_connections: u32,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        // Required env vars
        let telegram_bot_token = env_str("TELEGRAM_TOKEN")
            .and_then(non_empty)
            .or_else(|| env_str("TELEGRAM_BOT_TOKEN").and_then(non_empty))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_TOKEN environment variable is required".to_string())
            })?;
        let database_url = env_str("DATABASE_URL").and_then(non_empty).ok_or_else(|| {
            Error::Config("DATABASE_URL environment variable is required".to_string())
        })?;

        let catalog_path = env_path("CATALOG_PATH")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

        let admin_username = env_str("ADMIN_USERNAME")
            .and_then(non_empty)
            .map(|s| s.trim().trim_start_matches('@').to_string())
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string());
        let logs_admin_only = env_bool("LOGS_ADMIN_ONLY").unwrap_or(false);
        let logs_limit = env_usize("LOGS_LIMIT")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_LOGS_LIMIT);

        let database_max_connections = env_u32("DATABASE_MAX_CONNECTIONS")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS);

        Ok(Self {
            telegram_bot_token,
            database_url,
            catalog_path,
            admin_username,
            logs_admin_only,
            logs_limit,
            database_max_connections,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn env_bool(key: &str) -> Option<bool> {
    env_str(key).map(|s| parse_bool(&s))
}

fn env_u32(key: &str) -> Option<u32> {
    env_str(key).and_then(|s| s.trim().parse::<u32>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
