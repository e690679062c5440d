use std::fmt;

/// Upper bound on the number of input bytes rendered into a rejection
/// diagnostic before it is cut off.
const MAX_SNIPPET_BYTES: usize = 32;

/// The grammar violations that abort a parse call.
///
/// Every variant corresponds to exactly one way a request can break the
/// RFC 7230 start-line or header-field grammar. A rejection is fatal to
/// the parse call and, by convention, to the connection; "need more
/// data" is never reported through this type (see
/// [`ParseStatus`](crate::ParseStatus)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    /// The start line does not match `method SP target SP version CRLF`.
    InvalidRequestLine,
    /// The request method token is empty or contains a non-token byte.
    InvalidMethod,
    /// The version text is not `HTTP/1.1` or `HTTP/1.0`.
    UnrecognizedHttpVersion,
    /// A CR where the final CRLF was expected is not followed by LF.
    HeadersCorrupted,
    /// A header line begins with a space or tab.
    HeaderLineStartsWithWhitespace,
    /// A space or tab appears inside a header field name.
    WhitespaceInHeaderName,
    /// A header line contains no `:` separator.
    NoColonInHeaderLine,
    /// A header line reaches its LF without a preceding CR.
    MissingCrInHeaderLine,
    /// A CR inside a header value is not followed by LF.
    CrInHeaderValue,
    /// A header value is continued onto the next line with leading
    /// whitespace (obs-fold, RFC 7230 §3.2.4).
    ObsoleteLineFolding,
}

impl RejectionReason {
    /// Human-readable description of the violation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequestLine => "invalid request line",
            Self::InvalidMethod => "invalid or empty request method",
            Self::UnrecognizedHttpVersion => "unrecognized HTTP version",
            Self::HeadersCorrupted => "headers corrupted: invalid header sequence",
            Self::HeaderLineStartsWithWhitespace => {
                "header line must not start with whitespace"
            }
            Self::WhitespaceInHeaderName => "whitespace is not allowed in header name",
            Self::NoColonInHeaderLine => "no ':' character found in header line",
            Self::MissingCrInHeaderLine => "missing CR in header line",
            Self::CrInHeaderValue => "header value must not contain CR characters",
            Self::ObsoleteLineFolding => "header value line folding not supported",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected request: the violated grammar rule plus, when detailed
/// diagnostics are enabled, an escaped snippet of the offending bytes.
///
/// The snippet never affects parsing; it only makes the reported fault
/// easier to diagnose. It is bounded to 32 input bytes and rendered as
/// printable ASCII with `\xNN` escapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    reason: RejectionReason,
    detail: Option<String>,
}

impl Rejection {
    pub(crate) fn new(reason: RejectionReason) -> Self {
        Self {
            reason,
            detail: None,
        }
    }

    /// Attach an escaped snippet of `bytes` when `detailed` is set.
    pub(crate) fn with_snippet(reason: RejectionReason, bytes: &[u8], detailed: bool) -> Self {
        Self {
            reason,
            detail: detailed.then(|| escape_bytes(bytes, MAX_SNIPPET_BYTES)),
        }
    }

    /// Which grammar rule was violated.
    pub fn reason(&self) -> RejectionReason {
        self.reason
    }

    /// Escaped snippet of the offending bytes, if diagnostics were
    /// enabled for the parser that produced this rejection.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: '{detail}'", self.reason),
            None => f.write_str(self.reason.as_str()),
        }
    }
}

impl std::error::Error for Rejection {}

/// Render raw bytes as a bounded, printable diagnostic string.
///
/// Printable ASCII passes through unchanged; everything else becomes a
/// `\xNN` escape. At most `limit` input bytes are rendered, with `...`
/// appended when the input was longer.
fn escape_bytes(bytes: &[u8], limit: usize) -> String {
    let truncated = bytes.len() > limit;
    let visible = &bytes[..bytes.len().min(limit)];

    let mut out = String::with_capacity(visible.len() + 8);
    for &b in visible {
        if (0x20..0x7F).contains(&b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{b:02X}"));
        }
    }
    if truncated {
        out.push_str("...");
    }
    out
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------
