//! System tray icon and the shell menu.
//!
//! The same menu backs the tray icon and the page's context menu.

use std::sync::Mutex;

use tauri::{
    image::Image,
    menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Manager, Wry,
};

use super::context::AppContext;
use crate::config::APP_NAME;
use crate::error::ShellResult;
use crate::shell::{MenuAction, ShellEvent, TrayActivation};

const TOGGLE_TWEET_BOX_ID: &str = "toggle_tweet_box";
const LARGER_ID: &str = "larger";
const SMALLER_ID: &str = "smaller";
const QUIT_ID: &str = "quit";

/// Menu handles kept for the page context menu and the check state.
pub struct TrayState {
    pub menu: Menu<Wry>,
    pub show_tweet_box: CheckMenuItem<Wry>,
}

/// Shell menu action for a menu item id. The toggle carries the item's new
/// check state.
fn menu_action(id: &str, checked: impl FnOnce() -> bool) -> Option<MenuAction> {
    match id {
        TOGGLE_TWEET_BOX_ID => Some(MenuAction::ToggleTweetBox(checked())),
        LARGER_ID => Some(MenuAction::Larger),
        SMALLER_ID => Some(MenuAction::Smaller),
        QUIT_ID => Some(MenuAction::Quit),
        _ => None,
    }
}

/// How a tray click reads to the shell. Only completed clicks count; the
/// right button belongs to the menu.
fn activation_for(button: MouseButton, state: MouseButtonState) -> Option<TrayActivation> {
    match (button, state) {
        (MouseButton::Left, MouseButtonState::Up) => Some(TrayActivation::Trigger),
        (MouseButton::Middle, MouseButtonState::Up) => Some(TrayActivation::MiddleClick),
        (MouseButton::Right, MouseButtonState::Up) => Some(TrayActivation::Context),
        _ => None,
    }
}

fn handle_menu_event(app: &AppHandle, context: &AppContext, event: MenuEvent) {
    let checked = || {
        app.try_state::<Mutex<TrayState>>()
            .and_then(|state| {
                state
                    .lock()
                    .ok()
                    .and_then(|tray| tray.show_tweet_box.is_checked().ok())
            })
            .unwrap_or(true)
    };

    match menu_action(event.id.as_ref(), checked) {
        Some(action) => context.dispatch(ShellEvent::Menu(action)),
        None => log::debug!("[TRAY] Unhandled menu item: {:?}", event.id),
    }
}

fn handle_tray_event(context: &AppContext, event: TrayIconEvent) {
    let activation = match event {
        TrayIconEvent::Click {
            button,
            button_state,
            ..
        } => activation_for(button, button_state),
        TrayIconEvent::DoubleClick { .. } => Some(TrayActivation::DoubleClick),
        _ => None,
    };

    if let Some(activation) = activation {
        context.dispatch(ShellEvent::TrayActivated(activation));
    }
}

/// Build the shell menu and the tray icon.
pub fn setup_system_tray(
    app: &App,
    context: &AppContext,
    show_tweet_box: bool,
) -> ShellResult<TrayState> {
    let toggle = CheckMenuItem::with_id(
        app,
        TOGGLE_TWEET_BOX_ID,
        "Show Tweet box",
        true,
        show_tweet_box,
        None::<&str>,
    )?;
    let larger = MenuItem::with_id(app, LARGER_ID, "Larger", true, None::<&str>)?;
    let smaller = MenuItem::with_id(app, SMALLER_ID, "Smaller", true, None::<&str>)?;
    let quit = MenuItem::with_id(app, QUIT_ID, "Exit", true, None::<&str>)?;
    let separator = PredefinedMenuItem::separator(app)?;

    let menu = Menu::with_items(
        app,
        &[&toggle, &separator, &larger, &smaller, &separator, &quit],
    )?;

    let tray_icon = Image::from_bytes(include_bytes!("../../icons/32x32.png"))?;

    // Menu events from the page context menu arrive here too.
    let menu_context = context.clone();
    app.on_menu_event(move |app, event| handle_menu_event(app, &menu_context, event));

    let tray_context = context.clone();
    let _tray = TrayIconBuilder::new()
        .icon(tray_icon)
        .tooltip(APP_NAME)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(move |_tray, event| handle_tray_event(&tray_context, event))
        .build(app)?;

    Ok(TrayState {
        menu,
        show_tweet_box: toggle,
    })
}

/// Initialize the system tray and register it with the app state.
pub fn init(app: &App, context: &AppContext, show_tweet_box: bool) -> ShellResult<()> {
    let tray_state = setup_system_tray(app, context, show_tweet_box)?;
    app.manage(Mutex::new(tray_state));
    Ok(())
}
