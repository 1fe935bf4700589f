use serde::{Deserialize, Serialize};

use crate::types::{FormatTag, Platform};

/// A formatted log entry in flight between contexts.
///
/// This is the triple carried on every relay hop, and also the unit held in
/// the client bridge's pending buffer while the overlay is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardedLog {
    pub message: String,
    pub platform: Platform,
    pub format: FormatTag,
}

/// A console entry retained by the UI store.
///
/// Created when a distinct message arrives; `count` increments in place when
/// an incoming message matches the most recently buffered content
/// (adjacent-only coalescing). Evicted oldest-first by the retention cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessage {
    pub platform_origin: Platform,
    pub content: String,
    pub format: FormatTag,
    pub count: u32,
    pub timestamp: i64,
}
