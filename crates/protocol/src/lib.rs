//! Shared types for the overlay console relay.
//!
//! Everything that crosses a context boundary (server → client, client →
//! browser overlay, UI → client) is defined here: the execution platforms,
//! log levels, format tags, and the message shapes carried over the host's
//! event channels.

mod message;
mod types;

pub use message::{ForwardedLog, LogMessage};
pub use types::{FormatTag, LogLevel, Platform};

/// Event name for forwarding a log entry to the client context.
///
/// Emitted by UI-context loggers (one-hop event call) and by server-context
/// loggers (fan-out to all connected clients). The client bridge registers a
/// listener under this name.
pub const EVENT_FORWARD_LOG: &str = "overlog:forwardLog";

/// Browser-side event delivering a log entry to the rendered console.
pub const EVENT_ADD_LOG: &str = "overlog:addLog";

/// Browser-side event toggling console visibility.
pub const EVENT_SET_VIEW: &str = "overlog:setView";

/// URL of the bundled console overlay page, resolved by the host runtime.
pub const OVERLAY_URL: &str = "package://interface/console/index.html";

/// Default key code bound to the console visibility toggle (Delete).
pub const DEFAULT_TOGGLE_KEY: u32 = 46;
