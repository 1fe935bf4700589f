/// Error raised by the host clipboard capability.
#[derive(Debug, thiserror::Error)]
#[error("clipboard access failed: {0}")]
pub struct ClipboardError(pub String);

/// Injected host clipboard capability.
///
/// Used by [`StoreHandle::copy_to_clipboard`](crate::StoreHandle::copy_to_clipboard);
/// failures are logged and swallowed, never surfaced to the caller.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}
