//! Cookie persistence.
//!
//! Cookies live in the store as a list of raw `Set-Cookie` strings. They are
//! pushed into the webview's jar before the first navigation and read back
//! at shutdown. Nothing is written in between, so a crash loses the session's
//! cookie changes.

use cookie::Cookie;
use serde_json::Value;

use super::{SettingsStore, COOKIES_KEY};
use crate::error::ShellResult;

/// The browser engine's cookie jar.
pub trait CookieJar {
    fn all_cookies(&self) -> ShellResult<Vec<Cookie<'static>>>;
    fn set_all_cookies(&self, cookies: Vec<Cookie<'static>>) -> ShellResult<()>;
}

/// Parse the stored list. Entries that are not strings or fail to parse are
/// dropped without surfacing an error.
pub fn load(store: &dyn SettingsStore) -> Vec<Cookie<'static>> {
    let Some(Value::Array(entries)) = store.get(COOKIES_KEY) else {
        return Vec::new();
    };

    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Value::String(raw) => match Cookie::parse(raw) {
                Ok(cookie) => Some(cookie),
                Err(e) => {
                    log::debug!("[COOKIES] Dropping unparsable cookie: {}", e);
                    None
                },
            },
            _ => None,
        })
        .collect()
}

/// Overwrite the stored list with the raw form of `cookies`.
pub fn save(cookies: &[Cookie<'_>], store: &dyn SettingsStore) {
    let serialized = cookies
        .iter()
        .map(|cookie| Value::String(cookie.to_string()))
        .collect();
    store.set(COOKIES_KEY, Value::Array(serialized));
}

/// Load persisted cookies into the jar. Returns how many were restored.
pub fn restore(jar: &dyn CookieJar, store: &dyn SettingsStore) -> ShellResult<usize> {
    let cookies = load(store);
    let count = cookies.len();
    jar.set_all_cookies(cookies)?;
    log::info!("[COOKIES] Restored {} cookies", count);
    Ok(count)
}

/// Copy the jar's cookies into the store. Returns how many were saved.
pub fn capture(jar: &dyn CookieJar, store: &dyn SettingsStore) -> ShellResult<usize> {
    let cookies = jar.all_cookies()?;
    save(&cookies, store);
    log::info!("[COOKIES] Saved {} cookies", cookies.len());
    Ok(cookies.len())
}

/// Capture the jar and flush the store.
pub fn persist(jar: &dyn CookieJar, store: &dyn SettingsStore) -> ShellResult<usize> {
    let count = capture(jar, store)?;
    store.save()?;
    Ok(count)
}
