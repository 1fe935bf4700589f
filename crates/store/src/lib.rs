//! UI-side console store.
//!
//! Receives forwarded log entries from the relay, coalesces consecutive
//! duplicates, caps retained history, and exposes the visibility flag driven
//! by inbound toggle events. A 1-second flush task moves buffered entries
//! into the visible list, mirroring how the rendered view refreshes.

mod clipboard;
mod driver;
mod state;

pub use clipboard::{Clipboard, ClipboardError};
pub use driver::StoreHandle;
pub use state::{ConsoleStore, FLUSH_INTERVAL, MAX_MESSAGES};
