use anyhow::Result;
use sea_orm::{ConnectOptions, Database};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Database used when neither `--database-url` nor `DATABASE_URL` is given
pub const DEFAULT_DATABASE_URL: &str = "sqlite://userbase.db?mode=rwc";

/// Bind address used when neither `--bind-address` nor `BIND_ADDRESS` is given
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Load variables from a `.env` file, if one exists, before arguments are parsed.
///
/// Returns the file that was loaded. Runs before tracing is set up so that
/// `RUST_LOG` may come from the file; report the result with [`log_env`].
pub fn load_env() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

pub fn log_env(env_file: Option<&Path>) {
    match env_file {
        Some(path) => debug!("Loaded environment from {}", path.display()),
        None => debug!("No .env file found"),
    }
}

/// Initialize application state for the given database
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);

    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    let db = Database::connect(options).await?;

    Ok(AppState { db })
}
