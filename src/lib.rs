//! # framely
//!
//! **HTTP/1.1 message framing**: an incremental request-line and
//! header-block parser built to sit on the hottest path of a server's
//! connection layer.
//!
//! framely turns raw transport bytes into structured start-line and
//! header events without allocating or copying, unless the buffer is
//! physically non-contiguous. It follows the **RFC 7230** start-line and
//! header-field grammar strictly: every violation is an immediate, typed
//! [`Rejection`], while running out of bytes mid-unit is the distinct,
//! non-error [`ParseStatus::NeedMoreData`] outcome.
//!
//! Two strategies implement the same grammar: [`SegmentedParser`] copes
//! with buffers split across discontiguous memory regions (copying a
//! line only when it actually straddles one), and [`ContiguousParser`]
//! is specialized for a single contiguous region.
//!
//! ## Quick start — one-shot parsing
//!
//! ```rust
//! use framely::parse_request;
//!
//! let raw = b"GET /hello?who=world HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let frame = parse_request(raw).expect("well-formed").expect("complete");
//! assert_eq!(frame.method, "GET");
//! assert_eq!(frame.path, "/hello");
//! assert_eq!(frame.query, "?who=world");
//! assert_eq!(frame.header_value("Host"), Some("example.com"));
//! ```
//!
//! ## Quick start — streaming over fragmented buffers
//!
//! ```rust
//! use framely::{
//!     HttpParse, ParseStatus, RequestCollector, SegmentedBytes, SegmentedParser,
//! };
//!
//! let mut parser = SegmentedParser::new();
//! let mut sink = RequestCollector::new();
//!
//! // The request line arrives split across two transport chunks.
//! let chunks: [&[u8]; 2] = [b"GET /plain", b"text HTTP/1.1\r\n"];
//! let buffer = SegmentedBytes::segmented(&chunks);
//!
//! let outcome = parser.parse_request_line(&mut sink, &buffer).expect("well-formed");
//! assert_eq!(outcome.status, ParseStatus::Complete);
//! assert_eq!(outcome.consumed.offset(), buffer.len());
//! ```

mod buffer;
mod engine;
mod error;
mod lookup;
mod output;
mod parser;
mod types;

// Re-export public API.
pub use buffer::{Cursor, SegmentSlice, SegmentedBytes};
pub use error::{Rejection, RejectionReason};
pub use output::{format_debug, format_headers_only, format_json};
pub use parser::{ContiguousParser, HttpParse, ParseOutcome, ParseStatus, SegmentedParser};
pub use types::{
    CollectedRequest, Header, HttpMethod, HttpVersion, RequestCollector, RequestHandler,
    RequestLine,
};

/// Parse a complete request frame (start line + full header block) from
/// one contiguous byte slice.
///
/// This is a convenience wrapper around [`ContiguousParser`] and
/// [`RequestCollector`]. Returns `Ok(None)` when the input ends before
/// the frame is complete; "need more data" is not an error even here.
/// Bytes past the header block (a request body, or a pipelined request)
/// are ignored.
///
/// # Errors
///
/// Returns [`Rejection`] on any grammar violation.
pub fn parse_request(data: &[u8]) -> Result<Option<CollectedRequest>, Rejection> {
    let mut parser = ContiguousParser::new();
    parse_with(&mut parser, data)
}

/// Same as [`parse_request`], but driving a caller-supplied strategy.
///
/// # Errors
///
/// Returns [`Rejection`] on any grammar violation.
pub fn parse_with<P: HttpParse>(
    parser: &mut P,
    data: &[u8],
) -> Result<Option<CollectedRequest>, Rejection> {
    let mut collector = RequestCollector::new();

    let buffer = SegmentedBytes::contiguous(data);
    let line = parser.parse_request_line(&mut collector, &buffer)?;
    if line.status == ParseStatus::NeedMoreData {
        return Ok(None);
    }

    // The driver contract: discard what was consumed, then continue
    // from the new start of the stream.
    let remainder = &data[line.consumed.offset()..];
    let buffer = SegmentedBytes::contiguous(remainder);
    let headers = parser.parse_headers(&mut collector, &buffer)?;
    if headers.status == ParseStatus::NeedMoreData {
        return Ok(None);
    }

    Ok(collector.into_request())
}
