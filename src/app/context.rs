//! Application context and the shell event loop.
//!
//! Every event source only enqueues a `ShellEvent`. One task owns the
//! controller and drains the queue, so controller state has a single mutator
//! and needs no lock. After each event the task republishes the session
//! snapshot that the shutdown path persists.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval_at, Instant};

use crate::config::SiteConfig;
use crate::error::ShellResult;
use crate::settings::{cookies, CookieJar, SessionSnapshot, SettingsStore};
use crate::shell::{LinkPolicy, Page, ShellController, ShellEvent, ShellHost};

pub type ShellSender = UnboundedSender<ShellEvent>;

/// Shared handles given to every callback. Cheap to clone.
#[derive(Clone)]
pub struct AppContext {
    events: ShellSender,
    session: Arc<RwLock<SessionSnapshot>>,
    status: Arc<RwLock<Option<String>>>,
    store: Arc<dyn SettingsStore + Send + Sync>,
    links: LinkPolicy,
    exiting: Arc<AtomicBool>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn SettingsStore + Send + Sync>,
        site: &SiteConfig,
        session: SessionSnapshot,
    ) -> ShellResult<(Self, UnboundedReceiver<ShellEvent>)> {
        let (events, receiver) = unbounded_channel();
        let context = Self {
            events,
            session: Arc::new(RwLock::new(session)),
            status: Arc::new(RwLock::new(None)),
            store,
            links: LinkPolicy::new(site)?,
            exiting: Arc::new(AtomicBool::new(false)),
        };
        Ok((context, receiver))
    }

    /// Queue an event for the controller. Events sent after the loop has
    /// stopped are dropped.
    pub fn dispatch(&self, event: ShellEvent) {
        if self.events.send(event).is_err() {
            log::debug!("[SHELL] Event loop stopped, dropping event");
        }
    }

    pub fn sender(&self) -> ShellSender {
        self.events.clone()
    }

    pub fn links(&self) -> &LinkPolicy {
        &self.links
    }

    pub fn store(&self) -> &(dyn SettingsStore + Send + Sync) {
        self.store.as_ref()
    }

    /// Last session state published by the event loop.
    pub fn session(&self) -> SessionSnapshot {
        *self.session.read()
    }

    pub fn status(&self) -> Option<String> {
        self.status.read().clone()
    }

    /// Mark shutdown as started. Only the first caller gets `true`.
    pub fn begin_exit(&self) -> bool {
        !self.exiting.swap(true, Ordering::SeqCst)
    }

    /// Handle the host writes status messages through.
    pub fn status_handle(&self) -> Arc<RwLock<Option<String>>> {
        Arc::clone(&self.status)
    }
}

/// Fill the cookie jar, start the controller and run it until the channel
/// closes.
pub async fn run_event_loop<P, H>(
    mut controller: ShellController<P, H>,
    mut receiver: UnboundedReceiver<ShellEvent>,
    context: AppContext,
) where
    P: Page + CookieJar,
    H: ShellHost,
{
    if let Err(e) = cookies::restore(controller.page(), context.store()) {
        log::warn!("[COOKIES] Could not restore cookies: {}", e);
    }

    let mut next = Some(ShellEvent::Start);
    while let Some(event) = next.take() {
        let description = format!("{:?}", event);
        if let Err(e) = controller.handle(event) {
            log::warn!("[SHELL] Handling {} failed: {}", description, e);
        }
        *context.session.write() = controller.snapshot();
        next = receiver.recv().await;
    }
    log::debug!("[SHELL] Event loop finished");
}

/// Send `PokeTick` every `period` until the loop goes away. The first tick
/// comes one full period after start.
pub async fn poke_loop(events: ShellSender, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        ticker.tick().await;
        if events.send(ShellEvent::PokeTick).is_err() {
            break;
        }
    }
}

pub fn spawn_poke_timer(events: ShellSender, period: Duration) {
    tauri::async_runtime::spawn(poke_loop(events, period));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStore;

    fn context() -> (AppContext, UnboundedReceiver<ShellEvent>) {
        AppContext::new(
            Arc::new(MemoryStore::new()),
            &SiteConfig::default(),
            SessionSnapshot {
                zoom: 0.7,
                show_tweet_box: true,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let (context, mut receiver) = context();
        context.dispatch(ShellEvent::PokeTick);
        context.clone().dispatch(ShellEvent::LoadProgress(30));

        assert_eq!(receiver.try_recv().unwrap(), ShellEvent::PokeTick);
        assert_eq!(receiver.try_recv().unwrap(), ShellEvent::LoadProgress(30));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_dispatch_after_close_is_dropped() {
        let (context, receiver) = context();
        drop(receiver);
        context.dispatch(ShellEvent::PokeTick);
    }

    #[test]
    fn test_status_is_shared_with_host_handle() {
        let (context, _receiver) = context();
        *context.status_handle().write() = Some("offline".to_string());
        assert_eq!(context.status().as_deref(), Some("offline"));
    }

    #[test]
    fn test_exit_begins_once_across_clones() {
        let (context, _receiver) = context();
        assert!(context.begin_exit());
        assert!(!context.clone().begin_exit());
        assert!(!context.begin_exit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poke_timer_waits_one_period() {
        let (context, mut receiver) = context();
        tokio::spawn(poke_loop(context.sender(), Duration::from_secs(10)));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(receiver.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(receiver.try_recv().unwrap(), ShellEvent::PokeTick);
    }
}
