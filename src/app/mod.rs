//! Application lifecycle and platform integration.
//!
//! - `context`: shared handles and the shell event loop
//! - `webview`: site and splash windows, the `Page` implementation
//! - `host`: window-system side of the controller
//! - `probe`: load outcome check
//! - `tray`: system tray and the shell menu
//! - `events`: window and run-loop event handlers

pub mod context;
pub mod events;
pub mod host;
pub mod probe;
pub mod tray;
pub mod webview;

pub use context::AppContext;
pub use tray::TrayState;
