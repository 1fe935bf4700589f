use std::sync::Arc;

use overlog_protocol::{FormatTag, ForwardedLog, LogMessage, Platform};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::clipboard::Clipboard;
use crate::state::{ConsoleStore, FLUSH_INTERVAL};

/// Shared handle around a [`ConsoleStore`] with a periodic flush task.
///
/// The embedding UI keeps one handle, wires inbound events into
/// [`handle_forwarded`](Self::handle_forwarded) and
/// [`set_view`](Self::set_view), and reads [`messages`](Self::messages) when
/// rendering. Cloning shares the same store.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<ConsoleStore>>,
    cancel: CancellationToken,
}

impl StoreHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ConsoleStore::new())),
            cancel: CancellationToken::new(),
        }
    }

    /// Spawns the repeating flush task (1-second period).
    ///
    /// Runs until [`stop`](Self::stop) is called or the handle's token is
    /// cancelled.
    pub fn spawn_flush_task(&self) {
        let inner = Arc::clone(&self.inner);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut flush_interval = tokio::time::interval(FLUSH_INTERVAL);
            flush_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = flush_interval.tick() => {
                        inner.lock().await.flush();
                    }
                }
            }
        });
    }

    /// Stops the flush task.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Ingests an entry straight off the relay wire.
    pub async fn handle_forwarded(&self, log: &ForwardedLog) {
        self.inner.lock().await.handle_forwarded(log);
    }

    pub async fn add_message(&self, platform: Platform, content: &str, format: FormatTag) {
        self.inner.lock().await.add_message(platform, content, format);
    }

    /// Flushes buffered entries immediately, outside the timer.
    pub async fn flush_now(&self) {
        self.inner.lock().await.flush();
    }

    pub async fn clear_messages(&self) {
        self.inner.lock().await.clear_messages();
    }

    pub async fn set_view(&self, visible: bool) {
        self.inner.lock().await.set_view(visible);
    }

    pub async fn view(&self) -> bool {
        self.inner.lock().await.view()
    }

    /// Snapshot of the visible message list, oldest first.
    pub async fn messages(&self) -> Vec<LogMessage> {
        self.inner.lock().await.messages().to_vec()
    }

    /// Best-effort copy to the host clipboard.
    ///
    /// Failure is logged and swallowed; the caller never sees it.
    pub fn copy_to_clipboard(&self, clipboard: &dyn Clipboard, text: &str) {
        if let Err(e) = clipboard.write_text(text) {
            tracing::warn!(error = %e, "failed to copy console text to clipboard");
        }
    }
}

impl Default for StoreHandle {
    fn default() -> Self {
        Self::new()
    }
}
