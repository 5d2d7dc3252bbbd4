//! IPC commands called from the hosted page and the splash screen.
//!
//! The page side is injected by `app::webview` as an initialization script
//! that forwards console output, alerts and right-clicks.

use tauri::{command, LogicalPosition, State, WebviewWindow};

use crate::app::{AppContext, TrayState};
use crate::error::{LockResultExt, ShellResult};

/// Map a console method name to a log level.
fn console_level(level: &str) -> log::Level {
    match level.to_lowercase().as_str() {
        "debug" => log::Level::Debug,
        "warn" | "warning" => log::Level::Warn,
        "error" => log::Level::Error,
        "trace" => log::Level::Trace,
        _ => log::Level::Info,
    }
}

/// JS console output, logged at debug level (trace stays trace).
#[command]
pub fn page_console(level: String, message: String, source: String, line: u32) {
    let level = console_level(&level).max(log::Level::Debug);
    log::log!(target: "page", level, "JS Message: {} {} {}", source, line, message);
}

/// `window.alert` replacement: log instead of blocking on a dialog.
#[command]
pub fn page_alert(message: String) {
    log::debug!(target: "page", "JS Alert: {}", message);
}

/// Page coordinates are CSS pixels; the window works in logical pixels,
/// which differ by the page zoom.
fn menu_position(x: f64, y: f64, zoom: f64) -> LogicalPosition<f64> {
    LogicalPosition::new(x * zoom, y * zoom)
}

/// Pop up the shell menu where the page was right-clicked.
#[command]
pub fn show_page_menu(
    window: WebviewWindow,
    tray: State<'_, std::sync::Mutex<TrayState>>,
    context: State<'_, AppContext>,
    x: f64,
    y: f64,
) -> ShellResult<()> {
    let menu = tray.lock().map_lock_err("tray state")?.menu.clone();
    window.popup_menu_at(&menu, menu_position(x, y, context.session().zoom))?;
    Ok(())
}

/// Current status message, for the splash screen's first paint.
#[command]
pub fn shell_status(context: State<'_, AppContext>) -> Option<String> {
    context.status()
}
