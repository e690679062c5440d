use crate::types::{HttpMethod, HttpVersion};

// ---------------------------------------------------------------------------
// Known-token classification
// ---------------------------------------------------------------------------
//
// The classifier matches the common methods and versions in one anchored
// prefix pass so the hot path never runs the generic token scan. A match
// is only valid when the token is immediately followed by its separator
// (space after a method, CR after a version): a candidate such as
// `GETX /` must fall back to generic scanning.

/// Known methods with their trailing-space separator, ordered roughly by
/// how often each shows up on the wire.
const KNOWN_METHODS: [(&[u8], HttpMethod); 9] = [
    (b"GET ", HttpMethod::GET),
    (b"POST ", HttpMethod::POST),
    (b"PUT ", HttpMethod::PUT),
    (b"HEAD ", HttpMethod::HEAD),
    (b"DELETE ", HttpMethod::DELETE),
    (b"OPTIONS ", HttpMethod::OPTIONS),
    (b"PATCH ", HttpMethod::PATCH),
    (b"CONNECT ", HttpMethod::CONNECT),
    (b"TRACE ", HttpMethod::TRACE),
];

/// Match a known request method anchored at the start of `span`.
///
/// The returned length covers the token only; the caller skips the
/// separating space with `+ 1`. The whole candidate must already be
/// present in `span`: there is no partial-match state.
pub(crate) fn known_method(span: &[u8]) -> Option<(HttpMethod, usize)> {
    for (token, method) in KNOWN_METHODS {
        if span.starts_with(token) {
            return Some((method, token.len() - 1));
        }
    }
    None
}

/// Match a canonical HTTP version anchored at the start of `span`,
/// required to be immediately followed by CR. Same length convention as
/// [`known_method`].
pub(crate) fn known_version(span: &[u8]) -> Option<(HttpVersion, usize)> {
    if span.starts_with(b"HTTP/1.1\r") {
        Some((HttpVersion::Http11, 8))
    } else if span.starts_with(b"HTTP/1.0\r") {
        Some((HttpVersion::Http10, 8))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
