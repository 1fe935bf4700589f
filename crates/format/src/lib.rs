//! Log value classification and display serialization.
//!
//! Script-facing log calls accept loosely typed values. This crate models
//! them as a closed tagged union ([`LogValue`]), assigns each value exactly
//! one [`FormatTag`](overlog_protocol::FormatTag) via [`classify`], and
//! renders it to a display string via [`serialize`]. Structured values may
//! contain shared or cyclic references through [`LogValue::Shared`] nodes;
//! serialization replaces any repeat visit with a `"[Circular]"` marker.

mod render;
mod value;

pub use render::{classify, serialize};
pub use value::LogValue;

/// Marker rendered in place of a repeated reference in structured output.
pub const CIRCULAR_MARKER: &str = "[Circular]";
