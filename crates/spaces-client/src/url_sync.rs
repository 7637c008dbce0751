//! Debounced delivery of the encoded filter state to the page URL.
//!
//! Each [`UrlSync::schedule`] cancels the pending timer and arms a new one, so
//! a burst of toggles produces a single write carrying the last value. The
//! timer runs on the ambient tokio runtime.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use spaces_core::AppConfig;
use tokio::task::JoinHandle;

type Sink = Arc<dyn Fn(String) + Send + Sync>;

pub struct UrlSync {
    debounce: Duration,
    sink: Sink,
    slot: Arc<Mutex<Option<String>>>,
    timer: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for UrlSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlSync")
            .field("debounce", &self.debounce)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl UrlSync {
    pub fn new(debounce: Duration, sink: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self {
            debounce,
            sink: Arc::new(sink),
            slot: Arc::new(Mutex::new(None)),
            timer: None,
        }
    }

    /// Debounce taken from `SPACES_URL_SYNC_DEBOUNCE_MS`.
    pub fn from_config(config: &AppConfig, sink: impl Fn(String) + Send + Sync + 'static) -> Self {
        Self::new(Duration::from_millis(config.url_sync_debounce_ms), sink)
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Replace the pending value with `query` and restart the quiet window.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, query: String) {
        self.abort_timer();
        *lock(&self.slot) = Some(query);

        let slot = Arc::clone(&self.slot);
        let sink = Arc::clone(&self.sink);
        let debounce = self.debounce;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            deliver(&slot, &sink);
        }));
    }

    /// Deliver the pending value immediately, if any.
    pub fn flush_now(&mut self) {
        self.abort_timer();
        deliver(&self.slot, &self.sink);
    }

    /// Drop the pending value without delivering it.
    pub fn cancel(&mut self) {
        self.abort_timer();
        lock(&self.slot).take();
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }

    fn abort_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for UrlSync {
    fn drop(&mut self) {
        self.abort_timer();
    }
}

fn lock(slot: &Mutex<Option<String>>) -> std::sync::MutexGuard<'_, Option<String>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

// The value is taken under the lock, so a racing timer and `flush_now`
// deliver it at most once.
fn deliver(slot: &Mutex<Option<String>>, sink: &Sink) {
    let value = lock(slot).take();
    if let Some(query) = value {
        tracing::debug!(%query, "syncing filters to url");
        sink(query);
    }
}
