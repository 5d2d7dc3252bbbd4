use std::sync::Arc;

use tauri::{App, Manager};
use tauri_plugin_store::StoreExt;

mod app;
mod commands;
mod config;
mod error;
mod settings;
mod shell;

use app::context::{self, AppContext};
use app::host::TauriHost;
use app::webview::{self, TauriPage};
use config::STORE_FILE;
use error::ShellResult;
use settings::{MemoryStore, PersistedSettings, SessionSnapshot, SettingsStore};
use shell::{ShellController, ShellEvent, TrayActivation};

pub fn run() {
    tauri::Builder::default()
        // Must be registered first so a second launch exits before doing work.
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            if let Some(context) = app.try_state::<AppContext>() {
                context.dispatch(ShellEvent::TrayActivated(TrayActivation::Trigger));
            }
        }))
        .plugin(tauri_plugin_store::Builder::default().build())
        .plugin(tauri_plugin_opener::init())
        .on_window_event(app::events::handle_window_event)
        .invoke_handler(tauri::generate_handler![
            commands::page::page_console,
            commands::page::page_alert,
            commands::page::show_page_menu,
            commands::page::shell_status,
        ])
        .setup(|app| {
            if let Err(e) = commands::logging::init_logging(app.handle()) {
                eprintln!("Failed to initialize file logging: {}", e);
            }
            setup_shell(app)?;
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(app::events::handle_run_event);
}

fn open_store(app: &App) -> Arc<dyn SettingsStore + Send + Sync> {
    match app.store(STORE_FILE) {
        Ok(store) => store,
        Err(e) => {
            log::error!(
                "[SETTINGS] Could not open {}, settings will not be kept: {}",
                STORE_FILE,
                e
            );
            Arc::new(MemoryStore::new())
        },
    }
}

/// Load settings, create the windows and the tray, then start the controller.
fn setup_shell(app: &mut App) -> ShellResult<()> {
    let store = open_store(app);
    let settings = PersistedSettings::load(store.as_ref());
    config::app::set_app_config(settings.app.clone());
    log::info!(
        "[SETUP] Hosting {} (zoom {}, tweet box {})",
        settings.site.url,
        settings.zoom,
        settings.show_tweet_box
    );

    let session = SessionSnapshot {
        zoom: settings.zoom,
        show_tweet_box: settings.show_tweet_box,
    };
    let (context, receiver) = AppContext::new(store, &settings.site, session)?;
    app.manage(context.clone());

    let handle = app.handle().clone();
    let placement = webview::startup_placement(&handle, settings.geometry);
    webview::create_splash_window(&handle, placement)?;
    let main = webview::create_main_window(&handle, &context, placement)?;

    app::tray::init(app, &context, settings.show_tweet_box)?;

    let host = TauriHost::new(handle, context.sender(), context.status_handle());
    let controller = ShellController::new(
        TauriPage::new(main),
        host,
        settings.site.clone(),
        settings.zoom,
        settings.show_tweet_box,
    )?;

    context::spawn_poke_timer(context.sender(), settings.site.poke_interval());
    tauri::async_runtime::spawn(context::run_event_loop(controller, receiver, context));
    Ok(())
}
