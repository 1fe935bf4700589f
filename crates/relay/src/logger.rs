use std::sync::Arc;

use overlog_format::{LogValue, classify, serialize};
use overlog_protocol::{
    DEFAULT_TOGGLE_KEY, EVENT_FORWARD_LOG, ForwardedLog, LogLevel, Platform,
};

use crate::bridge::ClientBridge;
use crate::host::{HostApi, HostError};

/// Explicitly-owned console context, passed to every logger constructor.
///
/// Carries the execution platform (fixed by the embedder, never sniffed), the
/// injected host capability surface, and the shared [`ClientBridge`]. Cloning
/// is cheap; clones share the same bridge.
#[derive(Clone)]
pub struct ConsoleContext {
    platform: Platform,
    host: Arc<dyn HostApi>,
    bridge: Arc<ClientBridge>,
}

impl ConsoleContext {
    /// Creates a context with the default view-toggle key.
    pub fn new(platform: Platform, host: Arc<dyn HostApi>) -> Self {
        Self::with_toggle_key(platform, host, DEFAULT_TOGGLE_KEY)
    }

    /// Creates a context with a custom view-toggle key code.
    pub fn with_toggle_key(platform: Platform, host: Arc<dyn HostApi>, toggle_key: u32) -> Self {
        let bridge = Arc::new(ClientBridge::new(Arc::clone(&host), toggle_key));
        Self {
            platform,
            host,
            bridge,
        }
    }

    /// The execution platform this context was constructed for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The shared client bridge.
    ///
    /// Embedder glue wires host dispatch into it: the bound key's press
    /// handler calls [`ClientBridge::toggle_view`] and the inbound
    /// forward-log event calls [`ClientBridge::push_log`].
    pub fn bridge(&self) -> &Arc<ClientBridge> {
        &self.bridge
    }
}

/// A per-module console logger.
///
/// Each log call classifies and serializes every value independently, then
/// routes the rendered message according to the context's platform. All
/// methods are infallible from the caller's point of view: host failures
/// degrade to local printing or buffering.
pub struct Logger {
    context: ConsoleContext,
    prefix: String,
    destroyed: bool,
}

impl Logger {
    /// Creates a logger bound to the given context.
    ///
    /// The first client-context logger brings the shared bridge up.
    pub fn new(context: &ConsoleContext, prefix: impl Into<String>) -> Self {
        context.bridge.retain(context.platform);
        Self {
            context: context.clone(),
            prefix: prefix.into(),
            destroyed: false,
        }
    }

    pub fn log<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<LogValue>,
    {
        self.emit_all(LogLevel::Log, values);
    }

    pub fn warn<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<LogValue>,
    {
        self.emit_all(LogLevel::Warn, values);
    }

    pub fn info<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<LogValue>,
    {
        self.emit_all(LogLevel::Info, values);
    }

    pub fn error<I>(&self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<LogValue>,
    {
        self.emit_all(LogLevel::Error, values);
    }

    /// The immutable prefix this logger stamps on every message.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The platform fixed at construction.
    pub fn platform(&self) -> Platform {
        self.context.platform
    }

    /// Whether this logger has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Destroys the logger; all further log calls are no-ops.
    ///
    /// Decrements the shared bridge's instance count exactly once; the last
    /// client-context logger destroyed tears the bridge down.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.context.bridge.release(self.context.platform);
    }

    fn emit_all<I>(&self, level: LogLevel, values: I)
    where
        I: IntoIterator,
        I::Item: Into<LogValue>,
    {
        if self.destroyed {
            return;
        }
        for value in values {
            self.emit(level, value.into());
        }
    }

    fn emit(&self, level: LogLevel, value: LogValue) {
        let format = classify(&value);
        let rendered = serialize(&value, format);
        let message = if self.prefix.is_empty() {
            format!("{} {rendered}", level.label())
        } else {
            format!("{}[{}] {rendered}", level.label(), self.prefix)
        };

        let forwarded = ForwardedLog {
            message: message.clone(),
            platform: self.context.platform,
            format,
        };

        let result: Result<(), HostError> = match self.context.platform {
            Platform::Ui => self
                .context
                .host
                .call_event(EVENT_FORWARD_LOG, &forwarded),
            Platform::Client => {
                self.context.bridge.push_log(forwarded);
                Ok(())
            }
            Platform::Server => self
                .context
                .host
                .broadcast_to_clients(EVENT_FORWARD_LOG, &forwarded),
            Platform::Local => {
                local_print(level, &message);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!(error = %e, prefix = %self.prefix, "console relay call failed");
            local_print(level, &message);
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Prints to the process's own logging sink, level-for-level.
fn local_print(level: LogLevel, message: &str) {
    match level {
        LogLevel::Error => tracing::error!("{message}"),
        LogLevel::Warn => tracing::warn!("{message}"),
        LogLevel::Info => tracing::info!("{message}"),
        LogLevel::Log => tracing::debug!("{message}"),
    }
}
