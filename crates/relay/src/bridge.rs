use std::collections::VecDeque;
use std::sync::Arc;

use overlog_protocol::{EVENT_ADD_LOG, EVENT_FORWARD_LOG, ForwardedLog, OVERLAY_URL, Platform};
use parking_lot::Mutex;

use crate::host::{BrowserId, HostApi};

/// Shared client-side bridge between loggers and the browser overlay.
///
/// One bridge is owned by a [`ConsoleContext`](crate::ConsoleContext) and
/// shared by every logger constructed from it, replacing what would otherwise
/// be process-wide static state. The bridge is reference-counted by live
/// logger instances: the first client-context logger initializes it (key
/// binding, overlay creation, forward-event listener) and the last one
/// destroyed tears it down.
///
/// Two states: **Uninitialized** (`browser` is `None`; every pushed log is
/// buffered) and **Ready** (logs are delivered directly, falling back to the
/// buffer on delivery failure).
pub struct ClientBridge {
    host: Arc<dyn HostApi>,
    state: Mutex<BridgeState>,
}

#[derive(Debug)]
struct BridgeState {
    browser: Option<BrowserId>,
    view_visible: bool,
    suppress_forwarding: bool,
    toggle_key: u32,
    pending: VecDeque<ForwardedLog>,
    instances: usize,
}

impl ClientBridge {
    pub(crate) fn new(host: Arc<dyn HostApi>, toggle_key: u32) -> Self {
        Self {
            host,
            state: Mutex::new(BridgeState {
                browser: None,
                view_visible: false,
                suppress_forwarding: false,
                toggle_key,
                pending: VecDeque::new(),
                instances: 0,
            }),
        }
    }

    /// Registers a live logger instance.
    ///
    /// Client-context registration initializes the bridge if the overlay is
    /// not up yet; initialization failure leaves the bridge Uninitialized and
    /// logs keep buffering.
    pub(crate) fn retain(&self, platform: Platform) {
        let should_init = {
            let mut state = self.state.lock();
            state.instances += 1;
            platform == Platform::Client && state.browser.is_none()
        };
        if should_init {
            self.initialize();
        }
    }

    /// Releases a logger instance, tearing the bridge down when the last one
    /// goes away.
    pub(crate) fn release(&self, platform: Platform) {
        let should_teardown = {
            let mut state = self.state.lock();
            state.instances = state.instances.saturating_sub(1);
            state.instances == 0 && platform == Platform::Client
        };
        if should_teardown {
            self.teardown();
        }
    }

    /// Delivers a log entry to the overlay, or buffers it.
    ///
    /// Buffered when the bridge is Uninitialized, when forwarding is
    /// suppressed mid-toggle, or when direct delivery fails.
    pub fn push_log(&self, log: ForwardedLog) {
        let target = {
            let mut state = self.state.lock();
            match state.browser {
                Some(browser) if !state.suppress_forwarding => Some(browser),
                _ => {
                    state.pending.push_back(log.clone());
                    None
                }
            }
        };

        if let Some(browser) = target
            && let Err(e) = self.host.call_browser(browser, EVENT_ADD_LOG, &log)
        {
            tracing::warn!(error = %e, "console delivery failed, buffering entry");
            self.state.lock().pending.push_back(log);
        }
    }

    /// Toggles overlay visibility. No-op while Uninitialized.
    ///
    /// Forwarding is suppressed for the duration of the host visibility call,
    /// so nothing is delivered mid-toggle; anything pushed in that window is
    /// buffered and flushed right after.
    pub fn toggle_view(&self) {
        let (browser, visible) = {
            let mut state = self.state.lock();
            let Some(browser) = state.browser else {
                return;
            };
            state.view_visible = !state.view_visible;
            state.suppress_forwarding = true;
            (browser, state.view_visible)
        };

        let result = self.host.set_browser_view(browser, visible);
        self.state.lock().suppress_forwarding = false;

        match result {
            Ok(()) => self.flush_pending(),
            Err(e) => tracing::error!(error = %e, "failed to toggle console view"),
        }
    }

    /// Replaces the view-toggle key binding. Silently ignored while
    /// Uninitialized; on failure the stored key is left unchanged.
    pub fn rebind_key(&self, new_key: u32) {
        let old_key = {
            let state = self.state.lock();
            if state.browser.is_none() {
                return;
            }
            state.toggle_key
        };

        match self
            .host
            .unbind_key(old_key)
            .and_then(|()| self.host.bind_key(new_key))
        {
            Ok(()) => self.state.lock().toggle_key = new_key,
            Err(e) => tracing::error!(error = %e, new_key, "failed to rebind console toggle key"),
        }
    }

    /// Whether the overlay is up and the bridge is Ready.
    pub fn is_ready(&self) -> bool {
        self.state.lock().browser.is_some()
    }

    /// Current overlay visibility.
    pub fn view_visible(&self) -> bool {
        self.state.lock().view_visible
    }

    /// Number of entries waiting in the pending buffer.
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Currently bound toggle key code.
    pub fn toggle_key(&self) -> u32 {
        self.state.lock().toggle_key
    }

    fn initialize(&self) {
        let key = self.state.lock().toggle_key;
        if let Err(e) = self.host.bind_key(key) {
            tracing::warn!(error = %e, key, "failed to bind console toggle key");
        }

        match self.host.create_browser(OVERLAY_URL) {
            Ok(browser) => self.state.lock().browser = Some(browser),
            Err(e) => {
                tracing::error!(error = %e, "failed to create console overlay");
                return;
            }
        }

        if let Err(e) = self.host.add_event_listener(EVENT_FORWARD_LOG) {
            tracing::warn!(error = %e, "failed to register forward-log listener");
        }

        self.flush_pending();
    }

    /// Drains the pending buffer to the overlay in FIFO order.
    ///
    /// Entries that fail to deliver are re-enqueued, not dropped.
    fn flush_pending(&self) {
        let (browser, drained) = {
            let mut state = self.state.lock();
            let Some(browser) = state.browser else {
                return;
            };
            if state.pending.is_empty() {
                return;
            }
            (browser, state.pending.drain(..).collect::<Vec<_>>())
        };

        for log in drained {
            if let Err(e) = self.host.call_browser(browser, EVENT_ADD_LOG, &log) {
                tracing::warn!(error = %e, "failed to flush buffered console entry");
                self.state.lock().pending.push_back(log);
            }
        }
    }

    /// Tears the bridge down and clears all state unconditionally, even when
    /// a host call fails along the way.
    fn teardown(&self) {
        let (browser, key) = {
            let state = self.state.lock();
            (state.browser, state.toggle_key)
        };

        if let Some(browser) = browser {
            if let Err(e) = self.host.unbind_key(key) {
                tracing::warn!(error = %e, key, "failed to unbind console toggle key");
            }
            if let Err(e) = self.host.destroy_browser(browser) {
                tracing::error!(error = %e, "failed to destroy console overlay");
            }
            if let Err(e) = self.host.remove_event_listener(EVENT_FORWARD_LOG) {
                tracing::warn!(error = %e, "failed to remove forward-log listener");
            }
        }

        let mut state = self.state.lock();
        state.browser = None;
        state.pending.clear();
        state.view_visible = false;
        state.suppress_forwarding = false;
        state.instances = 0;
    }
}
