use std::time::Duration;

use chrono::Utc;
use overlog_protocol::{FormatTag, ForwardedLog, LogMessage, Platform};

/// Maximum number of entries retained in the visible list.
pub const MAX_MESSAGES: usize = 200;

/// Period of the buffer-to-visible flush.
pub const FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Synchronous console store state.
///
/// Incoming entries land in a pending buffer; [`flush`](Self::flush) moves
/// them into the visible list and trims it to [`MAX_MESSAGES`] (oldest
/// dropped first). Duplicate coalescing is adjacent-only: an incoming message
/// is compared against the single most recently buffered entry, so bursts of
/// identical lines collapse while repeats separated by other messages do not.
#[derive(Debug, Default)]
pub struct ConsoleStore {
    view: bool,
    messages: Vec<LogMessage>,
    buffer: Vec<LogMessage>,
}

impl ConsoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingests a forwarded entry.
    ///
    /// Content equal to the most recently buffered entry increments its
    /// count in place; anything else appends a fresh entry. The visible list
    /// is trimmed immediately to bound memory between flushes.
    pub fn add_message(&mut self, platform: Platform, content: impl Into<String>, format: FormatTag) {
        let content = content.into();
        if let Some(last) = self.buffer.last_mut()
            && last.content == content
        {
            last.count += 1;
        } else {
            self.buffer.push(LogMessage {
                platform_origin: platform,
                content,
                format,
                count: 1,
                timestamp: Utc::now().timestamp_millis(),
            });
        }
        self.trim();
    }

    /// Ingests an entry straight off the relay wire.
    pub fn handle_forwarded(&mut self, log: &ForwardedLog) {
        self.add_message(log.platform, log.message.as_str(), log.format);
    }

    /// Moves the pending buffer into the visible list and trims it.
    pub fn flush(&mut self) {
        self.messages.append(&mut self.buffer);
        self.trim();
    }

    /// Empties the visible list immediately. Buffered entries are unaffected.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// Updates visibility from an inbound toggle event.
    pub fn set_view(&mut self, visible: bool) {
        self.view = visible;
    }

    /// Current visibility flag.
    pub fn view(&self) -> bool {
        self.view
    }

    /// Read-only view of the visible message list, oldest first.
    pub fn messages(&self) -> &[LogMessage] {
        &self.messages
    }

    /// Number of entries waiting in the pending buffer.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn trim(&mut self) {
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }
}
