//! Window and run-loop event handlers.

use tauri::{AppHandle, Manager, RunEvent, Window, WindowEvent};

use super::context::AppContext;
use super::webview::{self, TauriPage};
use crate::config::{self, MAIN_WINDOW_LABEL, SPLASH_WINDOW_LABEL};
use crate::error::ShellResult;
use crate::settings::{self, cookies};

/// Handle window events for the application.
///
/// This is called from the Tauri builder's `on_window_event` hook.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    match event {
        // Fix Windows resize lag by adding small delay
        // See: https://github.com/tauri-apps/tauri/issues/6322#issuecomment-2495685888
        #[cfg(target_os = "windows")]
        WindowEvent::Resized(_) => {
            std::thread::sleep(std::time::Duration::from_millis(1));
        },

        WindowEvent::CloseRequested { api, .. } => {
            let label = window.label();
            if label != MAIN_WINDOW_LABEL && label != SPLASH_WINDOW_LABEL {
                return;
            }

            // Windows stay alive until exit so their state can be saved.
            api.prevent_close();
            if config::is_close_to_tray() {
                let _ = window.hide();
            } else {
                window.app_handle().exit(0);
            }
        },

        _ => {},
    }
}

/// Handle run-loop events.
///
/// The first exit request is held back: settings are flushed right away on
/// the main thread, then cookies are read on a worker (the webview's cookie
/// query blocks on the main thread's message loop on Windows) and the app
/// exits again from there.
pub fn handle_run_event(app: &AppHandle, event: RunEvent) {
    let RunEvent::ExitRequested { code, api, .. } = event else {
        return;
    };
    let Some(context) = app.try_state::<AppContext>() else {
        return;
    };
    if !context.begin_exit() {
        return;
    }

    api.prevent_exit();
    if let Err(e) = persist_session(app, &context) {
        log::error!("[SETTINGS] Failed to save settings: {}", e);
    }

    let app = app.clone();
    let context = context.inner().clone();
    tauri::async_runtime::spawn_blocking(move || {
        persist_cookies(&app, &context);
        app.exit(code.unwrap_or(0));
    });
}

fn persist_session(app: &AppHandle, context: &AppContext) -> ShellResult<()> {
    let geometry = webview::active_window(app).and_then(|window| {
        webview::read_geometry(&window)
            .map_err(|e| log::warn!("[SETTINGS] Could not read window geometry: {}", e))
            .ok()
    });
    settings::save_session(context.store(), context.session(), geometry)?;
    log::info!("[SETTINGS] Settings saved");
    Ok(())
}

fn persist_cookies(app: &AppHandle, context: &AppContext) {
    let Some(main) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };
    if let Err(e) = cookies::persist(&TauriPage::new(main), context.store()) {
        log::warn!("[COOKIES] Could not save cookies: {}", e);
    }
}
