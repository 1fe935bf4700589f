//! Per-context routing core for the overlay console.
//!
//! A [`Logger`] formats each value it is given and routes the result
//! according to the execution context it was constructed for: UI loggers
//! forward over the host's event channel, client loggers go through the
//! shared [`ClientBridge`], server loggers fan out to all connected clients,
//! and local loggers print to the process's own `tracing` sink.
//!
//! The host runtime is injected behind the [`HostApi`] trait; every host
//! call failure degrades to local printing or pending-buffer retry, never to
//! an error surfaced from a log method.

mod bridge;
mod host;
mod logger;

pub use bridge::ClientBridge;
pub use host::{BrowserId, HostApi, HostError};
pub use logger::{ConsoleContext, Logger};
