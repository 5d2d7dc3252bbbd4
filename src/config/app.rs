//! Application-level configuration.
//!
//! User preferences that affect window management. Uses
//! `parking_lot::RwLock` so window event handlers can read it from any thread.

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Global app configuration.
    pub static ref APP_CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::default());
}

/// Application-wide user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Hide to the system tray instead of quitting when the window is closed.
    pub close_to_tray: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            close_to_tray: true,
        }
    }
}

/// Check if close-to-tray is enabled.
pub fn is_close_to_tray() -> bool {
    APP_CONFIG.read().close_to_tray
}

/// Replace the whole app configuration (used once, when settings are loaded).
pub fn set_app_config(config: AppConfig) {
    log::debug!("[APP_CONFIG] set_app_config({:?})", config);
    *APP_CONFIG.write() = config;
}
