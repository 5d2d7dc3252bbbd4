//! Shell configuration.
//!
//! - `SiteConfig`: the hosted site and the markup conventions the shell pokes
//! - `AppConfig`: window-management preferences (close to tray)
//!
//! Both are read from the settings store at startup; missing or malformed
//! entries fall back to the defaults.

pub mod app;
pub mod site;

pub use app::{is_close_to_tray, AppConfig, APP_CONFIG};
pub use site::SiteConfig;

/// Application name used for window titles, the tray tooltip and log files.
pub const APP_NAME: &str = "TwitCoop";

/// Settings store file, relative to the app data directory.
pub const STORE_FILE: &str = "settings.json";

/// Label of the window hosting the site.
pub const MAIN_WINDOW_LABEL: &str = "main";

/// Label of the splash window shown until the first successful load.
pub const SPLASH_WINDOW_LABEL: &str = "splash";
