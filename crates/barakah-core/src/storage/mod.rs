mod config;
pub mod kv;

pub use config::{AudioConfig, AuthConfig, Config, NotificationsConfig, TimerConfig, UiConfig};
pub use kv::{KvStore, MemoryStore, SqliteStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Storage key holding the serialized signed-in user.
pub const USER_KEY: &str = "user";
/// Storage key holding the serialized session list.
pub const SESSIONS_KEY: &str = "sessions";
/// Storage key holding the selected timer background.
pub const BACKGROUND_KEY: &str = "selectedBackground";
/// Storage key mirroring the immersive-mode flag as `"true"`/`"false"`.
pub const IMMERSIVE_KEY: &str = "immersiveMode";
/// Storage key holding user-authored duas.
pub const CUSTOM_DUAS_KEY: &str = "customDuas";
/// Storage key holding the serialized timer engine.
pub const TIMER_ENGINE_KEY: &str = "timer_engine";

/// Returns the data directory, creating it if needed.
///
/// `BARAKAH_DATA_DIR` wins when set. Otherwise `~/.config/barakah[-dev]/`,
/// where `BARAKAH_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("BARAKAH_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("BARAKAH_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("barakah-dev")
            } else {
                base_dir.join("barakah")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
