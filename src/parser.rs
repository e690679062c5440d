//! The two parsing strategies.
//!
//! Both implement the same RFC 7230 grammar by funneling fully-buffered
//! lines into the shared grammar machines; they differ only in how a
//! logical line becomes one contiguous byte view:
//!
//! - [`SegmentedParser`] tolerates buffers split across multiple memory
//!   regions and copies a line into scratch only when it actually spans
//!   a boundary.
//! - [`ContiguousParser`] is specialized for a buffer that is already
//!   one region and scans it directly.
//!
//! Parsing is synchronous and non-blocking: each call does a bounded
//! scan of the bytes it was given and either completes a grammar unit
//! or reports [`ParseStatus::NeedMoreData`], in which case the driver
//! buffers more bytes and calls again from the last consumed position.
//! No mid-line progress survives a call; a line must be fully buffered
//! before it is processed.

use log::debug;
use memchr::memchr;

use crate::buffer::{Cursor, SegmentedBytes};
use crate::engine::{self, CR, HTAB, LF, SP};
use crate::error::{Rejection, RejectionReason};
use crate::types::RequestHandler;

// ---------------------------------------------------------------------------
// Parse outcome
// ---------------------------------------------------------------------------

/// Outcome status of a parse call.
///
/// `NeedMoreData` is not an error: it means the buffer ended before a
/// complete grammar unit, and the caller should retry with more bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// A complete grammar unit (request line, or full header block) was
    /// parsed and reported to the handler.
    Complete,
    /// The buffer ran out before a grammar unit could be completed.
    NeedMoreData,
}

/// Cursor bookkeeping returned by every parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOutcome {
    pub status: ParseStatus,
    /// Position up to which the stream is definitely used; the driver
    /// may discard everything before it.
    pub consumed: Cursor,
    /// Position up to which bytes have been inspected. Always at or past
    /// `consumed`; the driver should not re-invoke the parser until new
    /// bytes arrive beyond it.
    pub examined: Cursor,
    /// Number of bytes this call consumed (fully accepted grammar
    /// units, including their line terminators).
    pub consumed_bytes: usize,
}

impl ParseOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == ParseStatus::Complete
    }

    fn complete(at: Cursor, consumed_bytes: usize) -> Self {
        Self {
            status: ParseStatus::Complete,
            consumed: at,
            examined: at,
            consumed_bytes,
        }
    }

    fn need_more(consumed: Cursor, examined: Cursor, consumed_bytes: usize) -> Self {
        Self {
            status: ParseStatus::NeedMoreData,
            consumed,
            examined,
            consumed_bytes,
        }
    }
}

// ---------------------------------------------------------------------------
// HttpParse
// ---------------------------------------------------------------------------

/// Common contract of the two parsing strategies.
///
/// A parser value belongs to exactly one connection and is driven by one
/// reader at a time; no locking happens inside. Byte views handed to the
/// handler are valid only during the callback.
pub trait HttpParse {
    /// Try to parse one request line from the start of `buffer`.
    ///
    /// On success the handler's start-line callback has fired and
    /// `consumed`/`examined` sit one past the line's LF.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] on any grammar violation; the connection
    /// should be treated as failed.
    fn parse_request_line<H: RequestHandler>(
        &mut self,
        handler: &mut H,
        buffer: &SegmentedBytes<'_>,
    ) -> Result<ParseOutcome, Rejection>;

    /// Try to parse a complete header block from the start of `buffer`,
    /// invoking the handler once per field.
    ///
    /// Fully parsed header lines advance `consumed` even when the block
    /// terminator has not arrived yet, so the driver can release them;
    /// `examined` runs to the end of the buffer in that case.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] on any grammar violation.
    fn parse_headers<H: RequestHandler>(
        &mut self,
        handler: &mut H,
        buffer: &SegmentedBytes<'_>,
    ) -> Result<ParseOutcome, Rejection>;

    /// Clear per-request scratch state between requests. Observable
    /// behavior afterwards is identical to a freshly constructed parser.
    fn reset(&mut self);
}

/// Report a rejection through the log facade before propagating it.
fn noted(rejection: Rejection) -> Rejection {
    debug!("request rejected: {rejection}");
    rejection
}

// ---------------------------------------------------------------------------
// SegmentedParser
// ---------------------------------------------------------------------------

/// The general strategy: tolerant of buffers split across multiple
/// discontiguous memory regions.
///
/// Each candidate line is located with a cursor seek; if it lies within
/// one segment it is scanned in place, otherwise it is copied into an
/// internal scratch region first. The scratch is reused across calls, so
/// the copy path allocates only on growth.
pub struct SegmentedParser {
    scratch: Vec<u8>,
    detailed: bool,
}

impl SegmentedParser {
    pub fn new() -> Self {
        Self::with_detailed_rejections(true)
    }

    /// `detailed` controls whether rejections carry an escaped snippet
    /// of the offending bytes.
    pub fn with_detailed_rejections(detailed: bool) -> Self {
        Self {
            scratch: Vec::new(),
            detailed,
        }
    }
}

impl Default for SegmentedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpParse for SegmentedParser {
    fn parse_request_line<H: RequestHandler>(
        &mut self,
        handler: &mut H,
        buffer: &SegmentedBytes<'_>,
    ) -> Result<ParseOutcome, Rejection> {
        let start = buffer.start();
        let end = buffer.end();

        let Some(lf) = buffer.seek(start, end, LF) else {
            return Ok(ParseOutcome::need_more(start, end, 0));
        };
        let line_end = buffer.forward(lf, 1);

        let line = buffer.slice(start, line_end);
        let line_len = line.len();
        let span = line.materialize(&mut self.scratch);
        engine::parse_request_line(handler, span, self.detailed).map_err(noted)?;

        Ok(ParseOutcome::complete(line_end, line_len))
    }

    fn parse_headers<H: RequestHandler>(
        &mut self,
        handler: &mut H,
        buffer: &SegmentedBytes<'_>,
    ) -> Result<ParseOutcome, Rejection> {
        let end = buffer.end();
        let mut consumed = buffer.start();
        let mut consumed_bytes = 0;

        loop {
            // The final-CRLF check needs a two-byte peek.
            let (Some(ch1), Some(ch2)) = (
                buffer.byte_at(consumed),
                buffer.byte_at(buffer.forward(consumed, 1)),
            ) else {
                return Ok(ParseOutcome::need_more(consumed, end, consumed_bytes));
            };

            if ch1 == CR {
                if ch2 == LF {
                    let after = buffer.forward(consumed, 2);
                    return Ok(ParseOutcome::complete(after, consumed_bytes + 2));
                }
                return Err(noted(Rejection::new(RejectionReason::HeadersCorrupted)));
            }
            if ch1 == SP || ch1 == HTAB {
                return Err(noted(Rejection::new(
                    RejectionReason::HeaderLineStartsWithWhitespace,
                )));
            }

            let Some(lf) = buffer.seek(consumed, end, LF) else {
                return Ok(ParseOutcome::need_more(consumed, end, consumed_bytes));
            };
            let line_end = buffer.forward(lf, 1);

            let line = buffer.slice(consumed, line_end);
            let line_len = line.len();
            let span = line.materialize(&mut self.scratch);
            let (name, value) = engine::take_single_header(span).map_err(noted)?;

            // The first byte of the next line must be visible before the
            // header can be accepted: leading whitespace there would be
            // obsolete line folding.
            let Some(next) = buffer.byte_at(line_end) else {
                return Ok(ParseOutcome::need_more(consumed, end, consumed_bytes));
            };
            if next == SP || next == HTAB {
                return Err(noted(Rejection::new(RejectionReason::ObsoleteLineFolding)));
            }

            handler.on_header(&span[name], &span[value]);
            consumed_bytes += line_len;
            consumed = line_end;
        }
    }

    fn reset(&mut self) {
        self.scratch.clear();
    }
}

// ---------------------------------------------------------------------------
// ContiguousParser
// ---------------------------------------------------------------------------

/// The throughput strategy: specialized for a transport buffer that is
/// already one contiguous region, scanned directly with no per-line
/// bookkeeping.
///
/// Handing it a fragmented buffer still yields correct results (the
/// view is flattened into scratch wholesale first) but costs a copy of
/// the entire region; use [`SegmentedParser`] when fragmentation is the
/// norm.
pub struct ContiguousParser {
    scratch: Vec<u8>,
    detailed: bool,
}

impl ContiguousParser {
    pub fn new() -> Self {
        Self::with_detailed_rejections(true)
    }

    /// `detailed` controls whether rejections carry an escaped snippet
    /// of the offending bytes.
    pub fn with_detailed_rejections(detailed: bool) -> Self {
        Self {
            scratch: Vec::new(),
            detailed,
        }
    }
}

impl Default for ContiguousParser {
    fn default() -> Self {
        Self::new()
    }
}

/// The whole buffer as one span, flattening only if it is fragmented.
fn flatten<'s, 'a: 's>(buffer: &SegmentedBytes<'a>, scratch: &'s mut Vec<u8>) -> &'s [u8] {
    buffer.slice(buffer.start(), buffer.end()).materialize(scratch)
}

impl HttpParse for ContiguousParser {
    fn parse_request_line<H: RequestHandler>(
        &mut self,
        handler: &mut H,
        buffer: &SegmentedBytes<'_>,
    ) -> Result<ParseOutcome, Rejection> {
        let data = flatten(buffer, &mut self.scratch);

        let Some(lf) = memchr(LF, data) else {
            return Ok(ParseOutcome::need_more(buffer.start(), buffer.end(), 0));
        };
        let line = &data[..lf + 1];
        engine::parse_request_line(handler, line, self.detailed).map_err(noted)?;

        let after = buffer.forward(buffer.start(), line.len());
        Ok(ParseOutcome::complete(after, line.len()))
    }

    fn parse_headers<H: RequestHandler>(
        &mut self,
        handler: &mut H,
        buffer: &SegmentedBytes<'_>,
    ) -> Result<ParseOutcome, Rejection> {
        let start = buffer.start();
        let end = buffer.end();
        let data = flatten(buffer, &mut self.scratch);

        let mut offset = 0;
        let mut consumed_bytes = 0;

        loop {
            if data.len() - offset < 2 {
                let consumed = buffer.forward(start, offset);
                return Ok(ParseOutcome::need_more(consumed, end, consumed_bytes));
            }

            let ch1 = data[offset];
            let ch2 = data[offset + 1];

            if ch1 == CR {
                if ch2 == LF {
                    let after = buffer.forward(start, offset + 2);
                    return Ok(ParseOutcome::complete(after, consumed_bytes + 2));
                }
                return Err(noted(Rejection::new(RejectionReason::HeadersCorrupted)));
            }
            if ch1 == SP || ch1 == HTAB {
                return Err(noted(Rejection::new(
                    RejectionReason::HeaderLineStartsWithWhitespace,
                )));
            }

            let Some(lf) = memchr(LF, &data[offset..]) else {
                let consumed = buffer.forward(start, offset);
                return Ok(ParseOutcome::need_more(consumed, end, consumed_bytes));
            };
            let line_end = offset + lf + 1;

            let span = &data[offset..line_end];
            let (name, value) = engine::take_single_header(span).map_err(noted)?;

            // Obs-fold lookahead, same policy as the general strategy.
            if line_end >= data.len() {
                let consumed = buffer.forward(start, offset);
                return Ok(ParseOutcome::need_more(consumed, end, consumed_bytes));
            }
            let next = data[line_end];
            if next == SP || next == HTAB {
                return Err(noted(Rejection::new(RejectionReason::ObsoleteLineFolding)));
            }

            handler.on_header(&span[name], &span[value]);
            consumed_bytes += span.len();
            offset = line_end;
        }
    }

    fn reset(&mut self) {
        self.scratch.clear();
    }
}
