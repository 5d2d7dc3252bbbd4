//! Persisted settings.
//!
//! A flat key-value store (`settings.json` through `tauri-plugin-store`) read
//! once at startup and written once at shutdown. The `SettingsStore` trait is
//! the seam: production code uses the plugin's `Store`, tests use
//! `MemoryStore`.

pub mod cookies;
pub mod geometry;


use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tauri::Runtime;
use tauri_plugin_store::Store;

use crate::config::{AppConfig, SiteConfig};
use crate::error::ShellResult;

pub use cookies::CookieJar;
pub use geometry::WindowGeometry;

pub const COOKIES_KEY: &str = "cookies";
pub const ZOOM_KEY: &str = "zoom";
pub const SHOW_TWEET_BOX_KEY: &str = "show-tweetbox";
pub const GEOMETRY_KEY: &str = "geometry";
pub const SITE_KEY: &str = "site";
pub const APP_KEY: &str = "app";

/// Minimal key-value capability the shell needs from persistent storage.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
    /// Flush pending writes to disk.
    fn save(&self) -> ShellResult<()>;
}

impl<R: Runtime> SettingsStore for Store<R> {
    fn get(&self, key: &str) -> Option<Value> {
        Store::get(self, key)
    }

    fn set(&self, key: &str, value: Value) {
        Store::set(self, key, value);
    }

    fn save(&self) -> ShellResult<()> {
        Store::save(self)?;
        Ok(())
    }
}

/// In-memory store. Used by tests and as a fallback when the settings file
/// cannot be opened, in which case nothing survives the session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        self.values.lock().insert(key.to_string(), value);
    }

    fn save(&self) -> ShellResult<()> {
        *self.saves.lock() += 1;
        Ok(())
    }
}

/// Read and deserialize `key`. Missing keys give `None`; malformed values are
/// logged and treated as missing.
fn read_value<T: DeserializeOwned>(store: &dyn SettingsStore, key: &str) -> Option<T> {
    let value = store.get(key)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            log::warn!("[SETTINGS] Ignoring malformed '{}': {}", key, e);
            None
        },
    }
}

/// Everything loaded from the store at startup, cookies aside.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSettings {
    pub site: SiteConfig,
    pub app: AppConfig,
    pub zoom: f64,
    pub show_tweet_box: bool,
    pub geometry: Option<WindowGeometry>,
}

impl PersistedSettings {
    pub fn load(store: &dyn SettingsStore) -> Self {
        let site = match read_value::<SiteConfig>(store, SITE_KEY) {
            Some(site) => match site.validate() {
                Ok(()) => site,
                Err(e) => {
                    log::warn!("[SETTINGS] Site override rejected, using defaults: {}", e);
                    SiteConfig::default()
                },
            },
            None => SiteConfig::default(),
        };

        let zoom = read_value::<f64>(store, ZOOM_KEY)
            .filter(|zoom| zoom.is_finite() && *zoom > 0.0)
            .unwrap_or(site.default_zoom);

        Self {
            app: read_value(store, APP_KEY).unwrap_or_default(),
            zoom,
            show_tweet_box: read_value(store, SHOW_TWEET_BOX_KEY).unwrap_or(true),
            geometry: read_value(store, GEOMETRY_KEY),
            site,
        }
    }
}

/// UI state written back at shutdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSnapshot {
    pub zoom: f64,
    pub show_tweet_box: bool,
}

/// Write the shutdown state. Geometry is only overwritten when it could be read.
pub fn write_session(
    store: &dyn SettingsStore,
    session: SessionSnapshot,
    geometry: Option<WindowGeometry>,
) -> ShellResult<()> {
    store.set(ZOOM_KEY, Value::from(session.zoom));
    store.set(SHOW_TWEET_BOX_KEY, Value::from(session.show_tweet_box));
    if let Some(geometry) = geometry {
        store.set(GEOMETRY_KEY, serde_json::to_value(geometry)?);
    }
    Ok(())
}

/// Write the shutdown state and flush it to disk.
pub fn save_session(
    store: &dyn SettingsStore,
    session: SessionSnapshot,
    geometry: Option<WindowGeometry>,
) -> ShellResult<()> {
    write_session(store, session, geometry)?;
    store.save()
}
