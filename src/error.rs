use thiserror::Error;

/// The part of the grammar a [`ParsingError`] was raised against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsingErrorKind {
    /// The parser needed more bytes than the line contained.
    EndOfInput,
    /// A byte was found where the grammar forbids it.
    UnexpectedToken,
    /// `=` not found while reading a variable name, or a closing
    /// `"`, `}`, `]` was never seen.
    MissingDelimiter,
    /// The line is longer than what the record parser consumed.
    LengthMismatch,
    /// The first non-token byte is not one of `~ @ & ^ * + =`.
    InvalidRecordStart,
    /// A complete, terminator-delimited line was not valid UTF-8.
    InvalidUtf8,
}

/// A recoverable parse failure, scoped to a single line.
///
/// Carries enough context to reproduce the message pygdbmi-style debuggers
/// print: the offending window, the absolute offset, and the original line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}. Found at position {offset}, near context:\n  {context}\n{dashes}")]
pub struct ParsingError {
    pub kind: ParsingErrorKind,
    pub message: String,
    /// Absolute offset into `line` where the error was detected.
    pub offset: usize,
    /// A window of up to 30 bytes on either side of `offset`.
    pub context: String,
    /// The complete line being parsed when the error occurred.
    pub line: String,
    dashes: String,
}

impl ParsingError {
    pub fn new(kind: ParsingErrorKind, message: impl Into<String>, line: &str, offset: usize) -> Self {
        let message = message.into();
        let begin = floor_char_boundary(line, offset.saturating_sub(30));
        let end = ceil_char_boundary(line, (offset + 30).min(line.len()));
        let context = line[begin..end].to_string();
        let dashes = " -".repeat(40);
        ParsingError {
            kind,
            message,
            offset,
            context,
            line: line.to_string(),
            dashes,
        }
    }

    pub fn end_of_input(line: &str, offset: usize) -> Self {
        Self::new(ParsingErrorKind::EndOfInput, "End of input", line, offset)
    }

    pub fn unexpected_token(token: u8, line: &str, offset: usize) -> Self {
        Self::new(
            ParsingErrorKind::UnexpectedToken,
            format!("Unexpected token '{}'", token as char),
            line,
            offset,
        )
    }

    pub fn missing_delimiter(message: impl Into<String>, line: &str, offset: usize) -> Self {
        Self::new(ParsingErrorKind::MissingDelimiter, message, line, offset)
    }

    pub fn length_mismatch(line: &str, consumed: usize, expected: usize) -> Self {
        Self::new(
            ParsingErrorKind::LengthMismatch,
            format!(
                "Line length {} differs from the last parsed offset {}",
                expected, consumed
            ),
            line,
            consumed,
        )
    }

    pub fn invalid_record_start(line: &str, offset: usize) -> Self {
        Self::new(
            ParsingErrorKind::InvalidRecordStart,
            "Invalid input. The debuggee's stdout may be interfering with the GDB/MI channel; \
             consider redirecting it elsewhere or running GDB's 'set new-console on'",
            line,
            offset,
        )
    }

    /// `lossy_line` is a best-effort rendering of the offending bytes
    /// (invalid sequences replaced) for display purposes only.
    pub fn invalid_utf8(lossy_line: &str, offset: usize) -> Self {
        Self::new(
            ParsingErrorKind::InvalidUtf8,
            "A complete line was not valid UTF-8",
            lossy_line,
            offset,
        )
    }
}

/// The largest char boundary `<= index`. Used so the error-context window
/// never splits a multi-byte UTF-8 character.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// The smallest char boundary `>= index`.
fn ceil_char_boundary(s: &str, index: usize) -> usize {
    let mut i = index.min(s.len());
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// A programming-error variant: a classification-predicate filter that does
/// not match the shape a predicate accepts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("usage error: {0}")]
pub struct UsageError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_window_start_landing_mid_char_does_not_panic() {
        // "é" (0xC3 0xA9) occupies bytes 40..42 of `line`; byte 41 is its
        // continuation byte and not a char boundary. offset=71 makes
        // begin = offset - 30 = 41: a naive slice would panic there.
        let line = format!("{}éllo{}", "x".repeat(40), "x".repeat(40));
        assert!(!line.is_char_boundary(41));
        let err = ParsingError::end_of_input(&line, 71);
        assert!(!err.context.is_empty());
    }

    #[test]
    fn context_window_end_landing_mid_char_does_not_panic() {
        // Same layout; offset=11 makes end = offset + 30 = 41, the same
        // non-boundary byte, this time as the window's upper edge.
        let line = format!("{}éllo{}", "x".repeat(40), "x".repeat(40));
        assert!(!line.is_char_boundary(41));
        let err = ParsingError::end_of_input(&line, 11);
        assert!(!err.context.is_empty());
    }

    #[test]
    fn floor_and_ceil_snap_to_char_boundaries() {
        let s = "éé";
        for i in 0..=s.len() {
            assert!(s.is_char_boundary(floor_char_boundary(s, i)));
            assert!(s.is_char_boundary(ceil_char_boundary(s, i)));
        }
    }
}
