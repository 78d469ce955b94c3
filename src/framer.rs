//! Buffers partial chunks, splits on the line terminator, and hands
//! complete lines to the record parser, carrying any surplus to the next
//! call.

use std::borrow::Cow;

use tracing::{debug, trace, warn};

use crate::error::ParsingError;
use crate::record::{Record, parse_line};
use crate::rewrite::rewrite_line;

/// Accumulates byte chunks into lines and emits one [`Record`] per
/// complete line. Single-threaded: an instance owns its buffer exclusively,
/// and sharing one across threads is not supported (serialize externally).
///
/// The buffer holds raw bytes, not `str`: a transport chunk boundary may
/// split a multi-byte UTF-8 sequence (e.g. mid-write inside a console
/// stream record carrying a non-ASCII path), and such a split must not
/// prevent the two chunks from being handed to [`Self::parse`] separately.
/// UTF-8 validation happens once a complete line has been assembled, never
/// per chunk.
pub struct LineFramer {
    buffer: Vec<u8>,
    more_to_parse: bool,
    terminator: String,
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFramer {
    /// A framer using the default terminator, `"\n"`.
    pub fn new() -> Self {
        Self::with_terminator("\n")
    }

    /// A framer using a custom line terminator (e.g. `"\r\n"`).
    pub fn with_terminator(terminator: impl Into<String>) -> Self {
        let terminator = terminator.into();
        assert!(!terminator.is_empty(), "line terminator must not be empty");
        LineFramer {
            buffer: Vec::new(),
            more_to_parse: false,
            terminator,
        }
    }

    /// Whether a further complete line is already sitting in the buffer.
    /// The caller is expected to invoke `parse(&[])` (or equivalent no-op)
    /// to drain it.
    pub fn more_to_parse(&self) -> bool {
        self.more_to_parse
    }

    /// Feed one chunk of arbitrary size. Emits exactly one [`Record`] if a
    /// full line can now be assembled, or `None` if not. At most one call
    /// to the record parser happens per invocation, regardless of chunk
    /// size — large chunks containing several lines set [`Self::more_to_parse`]
    /// instead of emitting more than one record.
    pub fn parse(&mut self, chunk: &[u8]) -> Result<Option<Record>, ParsingError> {
        self.buffer.extend_from_slice(chunk);

        let terminator = self.terminator.as_bytes();
        let Some(term_pos) = find_subslice(&self.buffer, terminator) else {
            return Ok(None);
        };
        let line_end = term_pos + terminator.len();
        let line_bytes: Vec<u8> = self.buffer.drain(..line_end).collect();

        self.more_to_parse = find_subslice(&self.buffer, terminator).is_some();

        let line = match String::from_utf8(line_bytes) {
            Ok(s) => s,
            Err(e) => {
                let offset = e.utf8_error().valid_up_to();
                let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
                warn!(offset, "line was not valid UTF-8");
                return Err(ParsingError::invalid_utf8(&lossy, offset));
            }
        };

        let rewritten = rewrite_line(&line, &self.terminator);
        if let Cow::Owned(_) = &rewritten {
            debug!("bug-workaround rewriter changed the line before parsing");
        }

        match parse_line(&rewritten, &self.terminator) {
            Ok(record) => {
                trace!(?record, "parsed record");
                Ok(Some(record))
            }
            Err(e) => {
                warn!(%e, "failed to parse line");
                Err(e)
            }
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
