//! Marker framing around the encoded payload.
//!
//! ```text
//! MSG_START <payload> MSG_END
//! ```
//!
//! The carrier hands back exactly the embedded text, so markers are only
//! matched at its two ends, never searched for inside the payload.

/// Literal placed before the payload.
pub const MARKER_START: &str = "MSG_START";

/// Literal placed after the payload.
pub const MARKER_END: &str = "MSG_END";

/// Bytes the markers add to every framed message.
pub const MARKER_OVERHEAD: usize = MARKER_START.len() + MARKER_END.len();

/// Wrap an encoded payload in the start/end markers.
pub fn frame(payload: &str) -> String {
    let mut framed = String::with_capacity(MARKER_OVERHEAD + payload.len());
    framed.push_str(MARKER_START);
    framed.push_str(payload);
    framed.push_str(MARKER_END);
    framed
}

/// Return the payload between the markers, or `None` if the text is not a
/// framed message.
pub fn unframe(text: &str) -> Option<&str> {
    text.strip_prefix(MARKER_START)?.strip_suffix(MARKER_END)
}

/// Byte-level [`unframe`] for extracted data that may not be valid UTF-8.
pub fn unframe_bytes(data: &[u8]) -> Option<&[u8]> {
    data.strip_prefix(MARKER_START.as_bytes())?
        .strip_suffix(MARKER_END.as_bytes())
}
