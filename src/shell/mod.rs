//! Page lifecycle controller and the capabilities it drives.
//!
//! Every callback the app receives (page loads, timers, menu, tray, link
//! clicks) becomes a `ShellEvent` and goes through
//! `ShellController::handle`. The controller only sees the `Page` and
//! `ShellHost` traits, so it runs against fakes in tests.
//!
//! - `controller`: load state machine, tweet-box policy, poke, retries
//! - `page`: the page capability and the guarded scripts behind it
//! - `link`: in-view vs. external navigation policy
//! - `zoom`: zoom step arithmetic

pub mod controller;
pub mod link;
pub mod page;
pub mod zoom;


use url::Url;

pub use controller::{ActiveView, LoadState, ShellController, ShellHost, RETRY_STATUS};
pub use link::{LinkDecision, LinkPolicy};
pub use page::Page;

/// Context menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// "Show Tweet box" was toggled to the carried state.
    ToggleTweetBox(bool),
    Larger,
    Smaller,
    Quit,
}

/// How the tray icon was activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayActivation {
    /// Single left click.
    Trigger,
    DoubleClick,
    MiddleClick,
    /// Right click; the tray shows the menu on its own.
    Context,
}

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    /// App is up and the cookie jar is filled: apply zoom and load the site.
    Start,
    LoadStarted { url: Url },
    LoadProgress(u8),
    LoadFinished { url: Url, ok: bool },
    /// The delay armed by a failed load ran out.
    RetryElapsed { url: Url },
    /// Periodic refresh trigger.
    PokeTick,
    LinkClicked(Url),
    Menu(MenuAction),
    TrayActivated(TrayActivation),
}
