//! Site and splash windows.
//!
//! The site window starts hidden on `about:blank` so the cookie jar can be
//! filled before the first real request; the controller then navigates it to
//! the site. The splash window is a bundled page shown until the first
//! successful load.

use cookie::Cookie;
use tauri::webview::{NewWindowResponse, PageLoadEvent};
use tauri::{
    AppHandle, Manager, PhysicalPosition, PhysicalSize, WebviewUrl, WebviewWindow,
    WebviewWindowBuilder,
};
use url::Url;

use super::context::AppContext;
use super::probe;
use crate::config::{APP_NAME, MAIN_WINDOW_LABEL, SPLASH_WINDOW_LABEL};
use crate::error::{ShellError, ShellResult};
use crate::settings::geometry::{initial_placement, Placement, ScreenArea, WindowGeometry};
use crate::settings::CookieJar;
use crate::shell::{Page, ShellEvent};

const PAGE_BRIDGE_SCRIPT: &str = include_str!("page_bridge.js");

/// Only web loads drive the lifecycle; `about:blank` and friends are noise.
fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// In-view navigation: same-site pages load, everything else is cancelled
/// and handed to the controller.
fn allow_navigation(context: &AppContext, url: &Url) -> bool {
    let decision = context.links().decide(url);
    if !decision.allows_in_view() {
        context.dispatch(ShellEvent::LinkClicked(url.clone()));
    }
    decision.allows_in_view()
}

/// `target=_blank` links and `window.open` never get their own window; the
/// controller decides where they go.
fn redirect_new_window(context: &AppContext, url: Url) {
    context.dispatch(ShellEvent::LinkClicked(url));
}

/// `Page` and `CookieJar` backed by the site window's webview.
pub struct TauriPage {
    window: WebviewWindow,
}

impl TauriPage {
    pub fn new(window: WebviewWindow) -> Self {
        Self { window }
    }
}

impl Page for TauriPage {
    fn navigate(&self, url: &Url) -> ShellResult<()> {
        self.window.navigate(url.clone())?;
        Ok(())
    }

    fn current_url(&self) -> ShellResult<Url> {
        Ok(self.window.url()?)
    }

    fn set_zoom(&self, factor: f64) -> ShellResult<()> {
        self.window.set_zoom(factor)?;
        Ok(())
    }

    fn evaluate_script(&self, script: &str) -> ShellResult<()> {
        self.window
            .eval(script)
            .map_err(|e| ShellError::Page(e.to_string()))
    }
}

impl CookieJar for TauriPage {
    fn all_cookies(&self) -> ShellResult<Vec<Cookie<'static>>> {
        Ok(self.window.cookies()?)
    }

    fn set_all_cookies(&self, cookies: Vec<Cookie<'static>>) -> ShellResult<()> {
        for cookie in cookies {
            self.window.set_cookie(cookie)?;
        }
        Ok(())
    }
}

/// Monitor work areas as the geometry code sees them.
fn screen_areas(app: &AppHandle) -> (Vec<ScreenArea>, Option<ScreenArea>) {
    let to_area = |monitor: &tauri::Monitor| ScreenArea {
        x: monitor.position().x,
        y: monitor.position().y,
        width: monitor.size().width,
        height: monitor.size().height,
        scale_factor: monitor.scale_factor(),
    };

    let screens = app
        .available_monitors()
        .map(|monitors| monitors.iter().map(to_area).collect())
        .unwrap_or_default();
    let primary = app.primary_monitor().ok().flatten().map(|m| to_area(&m));
    (screens, primary)
}

/// Startup placement from the saved geometry and the connected monitors.
pub fn startup_placement(app: &AppHandle, saved: Option<WindowGeometry>) -> Placement {
    let (screens, primary) = screen_areas(app);
    initial_placement(saved, &screens, primary.as_ref())
}

fn apply_placement(window: &WebviewWindow, placement: Placement) -> ShellResult<()> {
    match placement {
        Placement::Restore(geometry) => {
            window.set_position(PhysicalPosition::new(geometry.x, geometry.y))?;
            window.set_size(PhysicalSize::new(geometry.width, geometry.height))?;
            if geometry.maximized {
                window.maximize()?;
            }
        },
        Placement::Default { width, height } => {
            window.set_size(tauri::LogicalSize::new(width, height))?;
            window.center()?;
        },
    }
    Ok(())
}

/// Current geometry of `window`: outer position, inner size.
pub fn read_geometry(window: &WebviewWindow) -> ShellResult<WindowGeometry> {
    let position = window.outer_position()?;
    let size = window.inner_size()?;
    Ok(WindowGeometry {
        x: position.x,
        y: position.y,
        width: size.width,
        height: size.height,
        maximized: window.is_maximized()?,
    })
}

/// Move `target` onto `source`'s rectangle.
pub fn copy_geometry(source: &WebviewWindow, target: &WebviewWindow) -> ShellResult<()> {
    apply_placement(target, Placement::Restore(read_geometry(source)?))
}

pub fn create_splash_window(app: &AppHandle, placement: Placement) -> ShellResult<WebviewWindow> {
    let builder = WebviewWindowBuilder::new(
        app,
        SPLASH_WINDOW_LABEL,
        WebviewUrl::App("splash.html".into()),
    )
    .title(APP_NAME)
    .visible(false);

    #[cfg(not(target_os = "linux"))]
    let builder = builder.skip_taskbar(true);

    let window = builder.build()?;
    apply_placement(&window, placement)?;
    window.show()?;
    Ok(window)
}

pub fn create_main_window(
    app: &AppHandle,
    context: &AppContext,
    placement: Placement,
) -> ShellResult<WebviewWindow> {
    let blank = Url::parse("about:blank")?;

    let nav_context = context.clone();
    let popup_context = context.clone();
    let load_context = context.clone();

    let builder = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(blank))
        .title(APP_NAME)
        .visible(false)
        .initialization_script(PAGE_BRIDGE_SCRIPT)
        .on_navigation(move |url| allow_navigation(&nav_context, url))
        .on_new_window(move |url, _features| {
            redirect_new_window(&popup_context, url);
            NewWindowResponse::Deny
        })
        .on_page_load(move |_window, payload| {
            let url = payload.url().clone();
            if !is_web_url(&url) {
                return;
            }
            match payload.event() {
                PageLoadEvent::Started => load_context.dispatch(ShellEvent::LoadStarted { url }),
                PageLoadEvent::Finished => {
                    load_context.dispatch(ShellEvent::LoadProgress(100));
                    let context = load_context.clone();
                    tauri::async_runtime::spawn(async move {
                        let ok = probe::is_reachable(url.clone()).await;
                        context.dispatch(ShellEvent::LoadFinished { url, ok });
                    });
                },
            }
        });

    #[cfg(not(target_os = "linux"))]
    let builder = builder.skip_taskbar(true);

    let window = builder.build()?;
    apply_placement(&window, placement)?;
    Ok(window)
}

/// The window currently standing in for the app: the splash until it is
/// closed, the site window afterwards.
pub fn active_window(app: &AppHandle) -> Option<WebviewWindow> {
    app.get_webview_window(SPLASH_WINDOW_LABEL)
        .or_else(|| app.get_webview_window(MAIN_WINDOW_LABEL))
}
