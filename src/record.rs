//! Classifies a complete line into one of the four GDB/MI record variants
//! by dispatching on its leading byte, then verifies the line was consumed
//! exactly, down to the terminator.

use crate::error::ParsingError;
use crate::result::{MiResult, parse_result};
use crate::value::parse_word;

const WORD_DELIMITERS: &[u8] = b",\r\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Console,
    Target,
    Log,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncKind {
    Exec,
    Status,
    Notify,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamRecord {
    pub kind: StreamKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsyncRecord {
    pub token: Option<u64>,
    pub kind: AsyncKind,
    /// Free-form word; not validated against the GDB-documented class
    /// names.
    pub class: String,
    pub results: Vec<MiResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub token: Option<u64>,
    /// Free-form word; see [`AsyncRecord::class`].
    pub class: String,
    pub results: Vec<MiResult>,
}

/// The top-level output of a single parsed line.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Stream(StreamRecord),
    Async(AsyncRecord),
    Result(ResultRecord),
    /// The `(gdb) ` prompt marking the end of a response group.
    Termination,
}

/// Parse one complete line (already terminator-terminated, and already
/// passed through [`crate::rewrite::rewrite_line`]).
pub fn parse_line(line: &str, terminator: &str) -> Result<Record, ParsingError> {
    let termination_literal = format!("(gdb) {terminator}");
    if line == termination_literal {
        return Ok(Record::Termination);
    }

    let bytes = line.as_bytes();
    if bytes.is_empty() {
        return Err(ParsingError::end_of_input(line, 0));
    }

    // Stream records never carry a token.
    if let Some(kind) = stream_kind(bytes[0]) {
        let (offset, value) = crate::value::parse_cstring(line, 1)?;
        expect_exact_length(line, offset, terminator)?;
        return Ok(Record::Stream(StreamRecord { kind, value }));
    }

    let (token, offset) = parse_leading_token(line);

    if offset >= bytes.len() {
        return Err(ParsingError::end_of_input(line, offset));
    }

    if bytes[offset] == b'^' {
        let (offset, class, results) = parse_class_and_results(line, offset + 1)?;
        expect_exact_length(line, offset, terminator)?;
        return Ok(Record::Result(ResultRecord { token, class, results }));
    }

    if let Some(kind) = async_kind(bytes[offset]) {
        let (offset, class, results) = parse_class_and_results(line, offset + 1)?;
        expect_exact_length(line, offset, terminator)?;
        return Ok(Record::Async(AsyncRecord { token, kind, class, results }));
    }

    Err(ParsingError::invalid_record_start(line, offset))
}

fn stream_kind(byte: u8) -> Option<StreamKind> {
    match byte {
        b'~' => Some(StreamKind::Console),
        b'@' => Some(StreamKind::Target),
        b'&' => Some(StreamKind::Log),
        _ => None,
    }
}

fn async_kind(byte: u8) -> Option<AsyncKind> {
    match byte {
        b'*' => Some(AsyncKind::Exec),
        b'+' => Some(AsyncKind::Status),
        b'=' => Some(AsyncKind::Notify),
        _ => None,
    }
}

/// Optionally parse a leading `\d+(\.\d+)?` token; only the integer part is
/// kept. Returns the offset just past the consumed token (0 if none).
fn parse_leading_token(line: &str) -> (Option<u64>, usize) {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == 0 {
        return (None, 0);
    }
    let integer_part = &line[..i];
    let mut end = i;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut j = end + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > end + 1 {
            end = j;
        }
    }
    let token = integer_part.parse::<u64>().ok();
    (token, end)
}

/// Read the class word, then zero or more `,`-separated results.
fn parse_class_and_results(
    line: &str,
    offset: usize,
) -> Result<(usize, String, Vec<MiResult>), ParsingError> {
    let (mut offset, class) = parse_word(line, offset, WORD_DELIMITERS)?;
    let bytes = line.as_bytes();
    let mut results = Vec::new();
    while offset < bytes.len() && bytes[offset] == b',' {
        let (new_offset, result) = parse_result(line, offset + 1)?;
        results.push(result);
        offset = new_offset;
    }
    Ok((offset, class, results))
}

fn expect_exact_length(line: &str, consumed: usize, terminator: &str) -> Result<(), ParsingError> {
    let expected = consumed + terminator.len();
    if expected != line.len() {
        return Err(ParsingError::length_mismatch(line, consumed, line.len()));
    }
    Ok(())
}
