//! Window-system side of the shell controller.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tauri::{AppHandle, CursorIcon, Emitter, Manager};
use tauri_plugin_opener::OpenerExt;
use url::Url;

use super::context::ShellSender;
use super::webview;
use crate::config::{APP_NAME, MAIN_WINDOW_LABEL, SPLASH_WINDOW_LABEL};
use crate::error::{OptionExt, ResultExt, ShellError, ShellResult};
use crate::shell::{ShellEvent, ShellHost};

/// Event carrying the status line to the splash page.
pub const STATUS_EVENT: &str = "shell-status";

pub struct TauriHost {
    app: AppHandle,
    events: ShellSender,
    status: Arc<RwLock<Option<String>>>,
}

impl TauriHost {
    pub fn new(app: AppHandle, events: ShellSender, status: Arc<RwLock<Option<String>>>) -> Self {
        Self { app, events, status }
    }
}

fn window_title(status: Option<&str>) -> String {
    match status {
        Some(message) => format!("{} - {}", APP_NAME, message),
        None => APP_NAME.to_string(),
    }
}

impl ShellHost for TauriHost {
    fn set_busy(&self, busy: bool) -> ShellResult<()> {
        let icon = if busy {
            CursorIcon::Progress
        } else {
            CursorIcon::Default
        };
        for label in [SPLASH_WINDOW_LABEL, MAIN_WINDOW_LABEL] {
            if let Some(window) = self.app.get_webview_window(label) {
                window.set_cursor_icon(icon)?;
            }
        }
        Ok(())
    }

    fn show_status(&self, message: Option<&str>) -> ShellResult<()> {
        *self.status.write() = message.map(str::to_string);
        if let Some(window) = self.app.get_webview_window(MAIN_WINDOW_LABEL) {
            window.set_title(&window_title(message))?;
        }
        self.app.emit(STATUS_EVENT, message)?;
        Ok(())
    }

    fn show_browser(&self) -> ShellResult<()> {
        let main = self
            .app
            .get_webview_window(MAIN_WINDOW_LABEL)
            .ok_or_else(|| ShellError::WindowNotFound {
                label: MAIN_WINDOW_LABEL.to_string(),
            })?;

        if let Some(splash) = self.app.get_webview_window(SPLASH_WINDOW_LABEL) {
            let was_visible = splash.is_visible()?;
            webview::copy_geometry(&splash, &main)?;
            splash.destroy()?;
            if !was_visible {
                // Hidden in the tray; stay there.
                return Ok(());
            }
        }

        main.show()?;
        main.set_focus()?;
        log::info!("[SHELL] Site loaded, showing browser");
        Ok(())
    }

    fn restore_window(&self) -> ShellResult<()> {
        let window = webview::active_window(&self.app).context("no window to restore")?;
        window.show()?;
        window.unminimize()?;
        window.set_focus()?;
        Ok(())
    }

    fn open_external(&self, url: &Url) -> ShellResult<()> {
        log::info!("[SHELL] Opening {} in the system browser", url);
        self.app
            .opener()
            .open_url(url.as_str(), None::<&str>)
            .context("failed to open link")
    }

    fn schedule_retry(&self, url: Url, delay: Duration) {
        let events = self.events.clone();
        tauri::async_runtime::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(ShellEvent::RetryElapsed { url });
        });
    }

    fn quit(&self) {
        log::info!("[SHELL] Quit requested");
        self.app.exit(0);
    }
}
