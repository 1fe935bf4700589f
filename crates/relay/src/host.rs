use overlog_protocol::ForwardedLog;

/// Opaque handle to a host-created browser overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrowserId(pub u64);

/// Errors produced by host capability calls.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host call failed: {0}")]
    CallFailed(String),

    #[error("browser overlay unavailable")]
    BrowserUnavailable,

    #[error("capability not supported in this context")]
    Unsupported,
}

/// Capability surface supplied by the embedding game runtime.
///
/// The relay never probes or sniffs this surface; the embedder constructs a
/// [`ConsoleContext`](crate::ConsoleContext) with the platform it knows it is
/// running in and an implementation of this trait. Operations that do not
/// apply to a given context may return [`HostError::Unsupported`].
pub trait HostApi: Send + Sync {
    /// Binds a key code to the console view toggle.
    fn bind_key(&self, key: u32) -> Result<(), HostError>;

    /// Releases a previously bound key code.
    fn unbind_key(&self, key: u32) -> Result<(), HostError>;

    /// Creates the browser overlay for the given page URL.
    fn create_browser(&self, url: &str) -> Result<BrowserId, HostError>;

    /// Delivers a log entry to the browser overlay.
    fn call_browser(
        &self,
        browser: BrowserId,
        event: &str,
        log: &ForwardedLog,
    ) -> Result<(), HostError>;

    /// Updates the overlay's visibility.
    fn set_browser_view(&self, browser: BrowserId, visible: bool) -> Result<(), HostError>;

    /// Destroys the browser overlay.
    fn destroy_browser(&self, browser: BrowserId) -> Result<(), HostError>;

    /// Registers interest in an inbound event channel.
    fn add_event_listener(&self, event: &str) -> Result<(), HostError>;

    /// Unregisters a previously added event listener.
    fn remove_event_listener(&self, event: &str) -> Result<(), HostError>;

    /// One-hop event call from the UI context to its owning client.
    fn call_event(&self, event: &str, log: &ForwardedLog) -> Result<(), HostError>;

    /// Fan-out call from the server to every connected client process.
    fn broadcast_to_clients(&self, event: &str, log: &ForwardedLog) -> Result<(), HostError>;
}
