use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// HttpMethod
// ---------------------------------------------------------------------------

/// Request methods recognized by the fast-path classifier.
///
/// A method token outside this set is still accepted as long as it is a
/// valid RFC 7230 token; it is reported as [`HttpMethod::Custom`] with
/// the raw token bytes carried alongside in
/// [`RequestLine::method_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
    /// A syntactically valid token that is not one of the known methods.
    Custom,
}

impl HttpMethod {
    /// Canonical token for a known method. `Custom` has no fixed token;
    /// the wire bytes travel in [`RequestLine::method_token`].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::HEAD => "HEAD",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::CONNECT => "CONNECT",
            Self::OPTIONS => "OPTIONS",
            Self::TRACE => "TRACE",
            Self::PATCH => "PATCH",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HttpVersion
// ---------------------------------------------------------------------------

/// HTTP protocol version.
///
/// An unrecognized version text never reaches a handler: the request-line
/// parser rejects it outright, so there is no `Unknown` variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVersion {
    /// HTTP/1.0
    Http10,
    /// HTTP/1.1
    Http11,
}

impl HttpVersion {
    /// Return the version as a static string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RequestLine
// ---------------------------------------------------------------------------

/// Borrowed view of a parsed request line.
///
/// Every slice points into the parse call's line buffer and is valid
/// only for the duration of the handler callback; anything that must
/// survive the call has to be copied out.
#[derive(Debug, Clone, Copy)]
pub struct RequestLine<'a> {
    /// Classified method, or [`HttpMethod::Custom`].
    pub method: HttpMethod,
    /// Raw method token bytes; empty unless `method` is `Custom`.
    pub method_token: &'a [u8],
    /// Protocol version.
    pub version: HttpVersion,
    /// Path and query exactly as they appeared on the wire.
    pub target: &'a [u8],
    /// Path component of the target.
    pub path: &'a [u8],
    /// Query component including its leading `?`; empty when absent.
    pub query: &'a [u8],
}

// ---------------------------------------------------------------------------
// RequestHandler
// ---------------------------------------------------------------------------

/// Consumer of framing events.
///
/// The parser pushes one `on_request_line` per request followed by one
/// `on_header` per field. Byte views are invalidated when the callback
/// returns; retaining one is a use-after-invalidate hazard, so copy out
/// instead.
pub trait RequestHandler {
    /// A complete request line was parsed.
    fn on_request_line(&mut self, line: RequestLine<'_>);

    /// One header field was parsed. `value` has its surrounding optional
    /// whitespace already trimmed.
    fn on_header(&mut self, name: &[u8], value: &[u8]);
}

// ---------------------------------------------------------------------------
// Owned capture types
// ---------------------------------------------------------------------------

/// A single HTTP header field, copied out of the parse buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Header field name (original casing preserved).
    pub name: String,
    /// Header field value (leading/trailing OWS trimmed).
    pub value: String,
}

/// An owned snapshot of one parsed request frame (start line + headers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedRequest {
    /// The method token as it appeared on the wire.
    pub method: String,
    /// Path plus query string, unparsed.
    pub target: String,
    /// Path component of the target.
    pub path: String,
    /// Query component including its leading `?`; empty when absent.
    pub query: String,
    /// The HTTP version.
    pub version: HttpVersion,
    /// The list of header fields, in wire order.
    pub headers: Vec<Header>,
}

impl CollectedRequest {
    /// Look up the first header value by name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Return all values for headers matching `name` (case-insensitive).
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// RequestCollector
// ---------------------------------------------------------------------------

/// A [`RequestHandler`] that copies every event into owned storage.
///
/// This is the copy-out discipline made concrete: the collector is what
/// the CLI and tests consume, and a reasonable template for drivers that
/// need the frame to outlive the parse buffer.
#[derive(Debug, Default)]
pub struct RequestCollector {
    method: String,
    target: String,
    path: String,
    query: String,
    version: Option<HttpVersion>,
    headers: Vec<Header>,
}

impl RequestCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header fields collected so far, in wire order.
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Consume the collector and return the captured frame, or `None`
    /// when no start line was seen.
    pub fn into_request(self) -> Option<CollectedRequest> {
        let version = self.version?;
        Some(CollectedRequest {
            method: self.method,
            target: self.target,
            path: self.path,
            query: self.query,
            version,
            headers: self.headers,
        })
    }
}

impl RequestHandler for RequestCollector {
    fn on_request_line(&mut self, line: RequestLine<'_>) {
        self.method = if line.method == HttpMethod::Custom {
            String::from_utf8_lossy(line.method_token).into_owned()
        } else {
            line.method.as_str().to_string()
        };
        self.target = String::from_utf8_lossy(line.target).into_owned();
        self.path = String::from_utf8_lossy(line.path).into_owned();
        self.query = String::from_utf8_lossy(line.query).into_owned();
        self.version = Some(line.version);
    }

    fn on_header(&mut self, name: &[u8], value: &[u8]) {
        self.headers.push(Header {
            name: String::from_utf8_lossy(name).into_owned(),
            value: String::from_utf8_lossy(value).into_owned(),
        });
    }
}
