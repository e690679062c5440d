//! Shared grammar state machines.
//!
//! Both parsing strategies funnel into this module: once a candidate
//! line is available as one contiguous span (materialized by the caller
//! when it crossed segment boundaries), the same machines classify it.
//! Spans handed in here always include their terminating LF.

use std::ops::Range;

use crate::error::{Rejection, RejectionReason};
use crate::lookup;
use crate::types::{HttpMethod, RequestHandler, RequestLine};

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const SP: u8 = b' ';
pub(crate) const HTAB: u8 = b'\t';
const COLON: u8 = b':';
const QUESTION: u8 = b'?';
const PERCENT: u8 = b'%';

// ---------------------------------------------------------------------------
// Request-line machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartLineState {
    KnownMethod,
    UnknownMethod,
    Path,
    QueryString,
    KnownVersion,
    UnknownVersion,
    NewLine,
    Complete,
}

/// Run the start-line machine over one full line and emit the result
/// through `handler`.
///
/// Rejections fire the instant the offending byte is seen. `detailed`
/// controls whether they carry an escaped snippet of the line.
pub(crate) fn parse_request_line<H: RequestHandler>(
    handler: &mut H,
    span: &[u8],
    detailed: bool,
) -> Result<(), Rejection> {
    let len = span.len();

    let mut method = HttpMethod::Custom;
    let mut method_token: &[u8] = b"";
    let mut version = None;
    let mut path_start = None;
    let mut path_end = 0;
    let mut query_start = 0;
    let mut query_end = 0;
    let mut version_start = 0;

    let mut i = 0;
    let mut state = StartLineState::KnownMethod;

    loop {
        state = match state {
            StartLineState::KnownMethod => match lookup::known_method(span) {
                Some((known, token_len)) => {
                    method = known;
                    // Jump past the token and its separating space.
                    i = token_len + 1;
                    StartLineState::Path
                }
                None => StartLineState::UnknownMethod,
            },

            StartLineState::UnknownMethod => 'method: {
                while i < len {
                    let ch = span[i];
                    if ch == SP {
                        method_token = &span[..i];
                        if method_token.is_empty() {
                            return Err(Rejection::with_snippet(
                                RejectionReason::InvalidMethod,
                                span,
                                detailed,
                            ));
                        }
                        i += 1;
                        break 'method StartLineState::Path;
                    }
                    if !is_tchar(ch) {
                        return Err(Rejection::with_snippet(
                            RejectionReason::InvalidMethod,
                            span,
                            detailed,
                        ));
                    }
                    i += 1;
                }
                // Line ended before the method's separating space.
                return Err(invalid_request_line(span, detailed));
            },

            StartLineState::Path => 'path: {
                while i < len {
                    let ch = span[i];
                    if ch == SP {
                        path_end = i;
                        if path_start.is_none() {
                            // Empty path is illegal.
                            return Err(invalid_request_line(span, detailed));
                        }
                        // No query string: close the query region here.
                        query_start = i;
                        query_end = i;
                        i += 1;
                        break 'path StartLineState::KnownVersion;
                    }
                    if ch == QUESTION {
                        path_end = i;
                        if path_start.is_none() {
                            return Err(invalid_request_line(span, detailed));
                        }
                        // The query slice keeps its leading `?`.
                        query_start = i;
                        i += 1;
                        break 'path StartLineState::QueryString;
                    }
                    if ch == PERCENT && path_start.is_none() {
                        // Percent-encoding cannot appear before any path byte.
                        return Err(invalid_request_line(span, detailed));
                    }
                    if path_start.is_none() {
                        path_start = Some(i);
                    }
                    i += 1;
                }
                return Err(invalid_request_line(span, detailed));
            },

            StartLineState::QueryString => 'query: {
                while i < len {
                    if span[i] == SP {
                        query_end = i;
                        i += 1;
                        break 'query StartLineState::KnownVersion;
                    }
                    i += 1;
                }
                return Err(invalid_request_line(span, detailed));
            },

            StartLineState::KnownVersion => match lookup::known_version(&span[i..]) {
                Some((known, token_len)) => {
                    version = Some(known);
                    // Jump past the token and its CR.
                    i += token_len + 1;
                    StartLineState::NewLine
                }
                None => {
                    version_start = i;
                    StartLineState::UnknownVersion
                }
            },

            StartLineState::UnknownVersion => {
                while i < len {
                    if span[i] == CR {
                        let version_span = &span[version_start..i];
                        if version_span.is_empty() {
                            return Err(invalid_request_line(span, detailed));
                        }
                        return Err(Rejection::with_snippet(
                            RejectionReason::UnrecognizedHttpVersion,
                            version_span,
                            detailed,
                        ));
                    }
                    i += 1;
                }
                return Err(invalid_request_line(span, detailed));
            }

            StartLineState::NewLine => {
                if span.get(i) != Some(&LF) {
                    return Err(invalid_request_line(span, detailed));
                }
                i += 1;
                StartLineState::Complete
            }

            StartLineState::Complete => break,
        };
    }

    // Both are always set on the way to `Complete`; the fallback keeps
    // the machine honest without panicking.
    let (Some(path_start), Some(version)) = (path_start, version) else {
        return Err(invalid_request_line(span, detailed));
    };

    handler.on_request_line(RequestLine {
        method,
        method_token,
        version,
        target: &span[path_start..query_end],
        path: &span[path_start..path_end],
        query: &span[query_start..query_end],
    });
    Ok(())
}

fn invalid_request_line(span: &[u8], detailed: bool) -> Rejection {
    Rejection::with_snippet(RejectionReason::InvalidRequestLine, span, detailed)
}

// ---------------------------------------------------------------------------
// Header-field machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    Name,
    Whitespace,
    ExpectValue,
    ExpectNewLine,
    Complete,
}

/// Run the header-field machine over one full line. Returns the name and
/// value ranges within `span`; the value range already has trailing
/// optional whitespace trimmed.
pub(crate) fn take_single_header(span: &[u8]) -> Result<(Range<usize>, Range<usize>), Rejection> {
    let len = span.len();

    let mut name_end = 0;
    let mut value_start = None;
    let mut value_end = None;
    let mut name_has_whitespace = false;
    let mut previously_whitespace = false;

    let mut i = 0;
    let mut state = HeaderState::Name;

    loop {
        state = match state {
            HeaderState::Name => 'name: {
                while i < len {
                    let ch = span[i];
                    if ch == COLON {
                        if name_has_whitespace {
                            return Err(Rejection::new(RejectionReason::WhitespaceInHeaderName));
                        }
                        name_end = i;
                        i += 1;
                        break 'name HeaderState::Whitespace;
                    }
                    if ch == SP || ch == HTAB {
                        name_has_whitespace = true;
                    }
                    i += 1;
                }
                return Err(Rejection::new(RejectionReason::NoColonInHeaderLine));
            },

            HeaderState::Whitespace => 'ows: {
                while i < len {
                    let ch = span[i];
                    if ch == CR {
                        // No value bytes; the value state closes it out.
                        break 'ows HeaderState::ExpectValue;
                    }
                    if ch != SP && ch != HTAB {
                        value_start = Some(i);
                        break 'ows HeaderState::ExpectValue;
                    }
                    i += 1;
                }
                return Err(Rejection::new(RejectionReason::MissingCrInHeaderLine));
            },

            HeaderState::ExpectValue => 'value: {
                while i < len {
                    let ch = span[i];
                    let whitespace = ch == SP || ch == HTAB;
                    if whitespace {
                        if !previously_whitespace {
                            // Maybe the end of the value.
                            value_end = Some(i);
                        }
                    } else if ch == CR {
                        // The trimmed boundary, or the CR itself when the
                        // value never left whitespace.
                        if value_end.is_none() {
                            value_end = Some(i);
                        }
                        if value_start.is_none() {
                            value_start = value_end;
                        }
                        i += 1;
                        break 'value HeaderState::ExpectNewLine;
                    } else {
                        // Interior whitespace was not trailing after all.
                        value_end = None;
                    }
                    previously_whitespace = whitespace;
                    i += 1;
                }
                return Err(Rejection::new(RejectionReason::MissingCrInHeaderLine));
            },

            HeaderState::ExpectNewLine => {
                if span.get(i) != Some(&LF) {
                    return Err(Rejection::new(RejectionReason::CrInHeaderValue));
                }
                HeaderState::Complete
            }

            HeaderState::Complete => break,
        };
    }

    let (Some(value_start), Some(value_end)) = (value_start, value_end) else {
        return Err(Rejection::new(RejectionReason::MissingCrInHeaderLine));
    };
    Ok((0..name_end, value_start..value_end))
}

// ---------------------------------------------------------------------------
// Character classification (RFC 7230 §3.2.6)
// ---------------------------------------------------------------------------

/// `tchar` – characters allowed in HTTP tokens (method, header names).
///
/// ```text
/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." /
///         "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
/// ```
#[inline]
fn is_tchar(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
            | b'0'..=b'9'
            | b'a'..=b'z'
            | b'A'..=b'Z'
    )
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
