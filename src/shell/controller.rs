//! Page lifecycle controller.
//!
//! States: `Idle -> Loading -> Loaded`, or `Loading -> Retrying` when a load
//! fails. A failed load arms one retry of the same URL; retries never stop
//! and never back off. The splash view is swapped for the browser on the
//! first successful load and never comes back.

use std::time::Duration;

use url::Url;

use super::link::{LinkDecision, LinkPolicy};
use super::page::Page;
use super::{zoom, MenuAction, ShellEvent, TrayActivation};
use crate::config::SiteConfig;
use crate::error::ShellResult;
use crate::settings::SessionSnapshot;

/// Status shown while waiting for a retry.
pub const RETRY_STATUS: &str = "Connection error. Retrying ...";

/// Hides the vertical scrollbar; the page still scrolls with wheel and keys.
const HIDE_SCROLLBAR_RULE: &str = "::-webkit-scrollbar { display: none; }";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Retrying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Splash,
    Browser,
}

/// Window-level side effects the controller asks for.
pub trait ShellHost {
    fn set_busy(&self, busy: bool) -> ShellResult<()>;

    /// Show `message` in the status area, or clear it with `None`.
    fn show_status(&self, message: Option<&str>) -> ShellResult<()>;

    /// Swap the splash screen for the browser view.
    fn show_browser(&self) -> ShellResult<()>;

    /// Bring the active window to the foreground.
    fn restore_window(&self) -> ShellResult<()>;

    fn open_external(&self, url: &Url) -> ShellResult<()>;

    /// Deliver `ShellEvent::RetryElapsed { url }` once `delay` has passed.
    fn schedule_retry(&self, url: Url, delay: Duration);

    fn quit(&self);
}

pub struct ShellController<P, H> {
    page: P,
    host: H,
    site: SiteConfig,
    links: LinkPolicy,
    state: LoadState,
    view: ActiveView,
    zoom: f64,
    show_tweet_box: bool,
}

impl<P: Page, H: ShellHost> ShellController<P, H> {
    pub fn new(
        page: P,
        host: H,
        site: SiteConfig,
        zoom: f64,
        show_tweet_box: bool,
    ) -> ShellResult<Self> {
        let links = LinkPolicy::new(&site)?;
        Ok(Self {
            page,
            host,
            site,
            links,
            state: LoadState::Idle,
            view: ActiveView::Splash,
            zoom,
            show_tweet_box,
        })
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn view(&self) -> ActiveView {
        self.view
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn show_tweet_box(&self) -> bool {
        self.show_tweet_box
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// UI state to persist at shutdown.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            zoom: self.zoom,
            show_tweet_box: self.show_tweet_box,
        }
    }

    pub fn handle(&mut self, event: ShellEvent) -> ShellResult<()> {
        match event {
            ShellEvent::Start => self.start(),
            ShellEvent::LoadStarted { url } => self.on_load_started(&url),
            ShellEvent::LoadProgress(_) => self.update_tweet_box_visibility(),
            ShellEvent::LoadFinished { url, ok: true } => self.on_load_succeeded(&url),
            ShellEvent::LoadFinished { url, ok: false } => self.on_load_failed(url),
            ShellEvent::RetryElapsed { url } => {
                log::info!("[SHELL] Retrying {}", url);
                self.page.navigate(&url)
            },
            ShellEvent::PokeTick => self.poke(),
            ShellEvent::LinkClicked(url) => self.on_link_clicked(&url),
            ShellEvent::Menu(action) => self.on_menu(action),
            ShellEvent::TrayActivated(activation) => self.on_tray_activated(activation),
        }
    }

    fn start(&mut self) -> ShellResult<()> {
        let url = self.site.entry_url()?;
        log::info!("[SHELL] Loading {} at zoom {}", url, self.zoom);
        self.page.set_zoom(self.zoom)?;
        self.page.navigate(&url)
    }

    fn on_load_started(&mut self, url: &Url) -> ShellResult<()> {
        log::debug!("[SHELL] Load started: {}", url);
        self.state = LoadState::Loading;
        self.host.set_busy(true)?;
        self.host.show_status(None)
    }

    fn on_load_failed(&mut self, url: Url) -> ShellResult<()> {
        log::warn!(
            "[SHELL] Load failed: {}, retrying in {:?}",
            url,
            self.site.retry_delay()
        );
        self.state = LoadState::Retrying;
        self.host.show_status(Some(RETRY_STATUS))?;
        self.host.schedule_retry(url, self.site.retry_delay());
        Ok(())
    }

    fn on_load_succeeded(&mut self, url: &Url) -> ShellResult<()> {
        log::debug!("[SHELL] Load finished: {}", url);
        self.state = LoadState::Loaded;

        self.update_tweet_box_visibility()?;
        let rules = format!(
            ".{} {{ display: none; }} {}",
            self.site.hidden_element_class, HIDE_SCROLLBAR_RULE
        );
        self.page.append_style_rule(&rules)?;
        self.update_refresh_interval()?;
        self.host.set_busy(false)?;

        if self.view == ActiveView::Splash {
            self.host.show_browser()?;
            self.view = ActiveView::Browser;
        }
        Ok(())
    }

    /// The page initializes its refresh variable after the load event fires,
    /// so this runs again on every poke.
    fn update_refresh_interval(&self) -> ShellResult<()> {
        let (object, field) = self.site.refresh_target()?;
        self.page
            .assign_global(object, field, self.site.refresh_interval_millis())
    }

    fn poke(&mut self) -> ShellResult<()> {
        self.update_refresh_interval()?;
        self.page.dispatch_click(&self.site.update_button_selector)
    }

    fn is_tweet_box_visible(&self) -> bool {
        if self.show_tweet_box {
            return true;
        }
        match self.page.current_url() {
            Ok(url) => url.path().ends_with(&self.site.compose_reply_suffix),
            Err(e) => {
                log::debug!("[SHELL] No current URL for tweet box check: {}", e);
                false
            },
        }
    }

    fn update_tweet_box_visibility(&self) -> ShellResult<()> {
        let display = if self.is_tweet_box_visible() {
            "block"
        } else {
            "none"
        };
        self.page
            .set_style_property(&self.site.tweet_box_selector, "display", display)
    }

    fn on_link_clicked(&mut self, url: &Url) -> ShellResult<()> {
        match self.links.decide(url) {
            LinkDecision::Follow => self.page.assign_location(url),
            LinkDecision::Ignore => {
                log::debug!("[SHELL] Ignoring link {}", url);
                Ok(())
            },
            LinkDecision::OpenExternal => {
                log::info!("[SHELL] Opening {} externally", url);
                self.host.open_external(url)
            },
        }
    }

    fn on_menu(&mut self, action: MenuAction) -> ShellResult<()> {
        match action {
            MenuAction::ToggleTweetBox(checked) => {
                self.show_tweet_box = checked;
                self.update_tweet_box_visibility()
            },
            MenuAction::Larger => self.apply_zoom(zoom::larger(self.zoom)),
            MenuAction::Smaller => self.apply_zoom(zoom::smaller(self.zoom)),
            MenuAction::Quit => {
                self.host.quit();
                Ok(())
            },
        }
    }

    fn apply_zoom(&mut self, factor: f64) -> ShellResult<()> {
        if factor == self.zoom {
            return Ok(());
        }
        self.page.set_zoom(factor)?;
        self.zoom = factor;
        Ok(())
    }

    fn on_tray_activated(&mut self, activation: TrayActivation) -> ShellResult<()> {
        match activation {
            TrayActivation::Trigger | TrayActivation::DoubleClick | TrayActivation::MiddleClick => {
                self.host.restore_window()
            },
            TrayActivation::Context => Ok(()),
        }
    }
}
