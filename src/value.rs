//! The GDB/MI value grammar: c-strings, tuples, lists, and the bare
//! identifiers ("words") used for class names.
//!
//! Each parser takes `(input, offset)` and returns the offset immediately
//! past what it consumed, threading position explicitly through a
//! recursive descent rather than consuming a slice as `nom` parsers do;
//! only the c-string escape decoder below reaches for `nom`, built out of
//! `escaped_char`/`fragment`/`fold` the way a combinator-based string
//! literal parser usually is.

use nom::branch::alt;
use nom::bytes::complete::{is_not, take_while_m_n};
use nom::character::complete::{anychar, char};
use nom::combinator::{map, map_opt, map_res, value};
use nom::multi::fold;
use nom::sequence::preceded;
use nom::{IResult, Parser};

use crate::error::ParsingError;
use crate::result::{MiResult, parse_result};

/// One parsed GDB/MI value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    CString(String),
    Tuple(Vec<MiResult>),
    List(ListItems),
}

/// The homogeneous shape of a parsed list: fixed by the first element. A
/// list is either entirely bare values or entirely named results; it never
/// mixes the two.
#[derive(Debug, Clone, PartialEq)]
pub enum ListItems {
    Empty,
    Values(Vec<Value>),
    Results(Vec<MiResult>),
}

/// Parse a c-string: `input[offset]` must be `"`.
///
/// Scans for the terminating quote using a single toggled escape flag
/// (reset on every non-backslash byte), then escape-decodes the enclosed
/// bytes.
pub fn parse_cstring(input: &str, offset: usize) -> Result<(usize, String), ParsingError> {
    let bytes = input.as_bytes();
    if offset >= bytes.len() {
        return Err(ParsingError::end_of_input(input, offset));
    }
    if bytes[offset] != b'"' {
        return Err(ParsingError::unexpected_token(bytes[offset], input, offset));
    }

    let mut escaped = false;
    let mut end = None;
    let mut i = offset + 1;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'"' && !escaped {
            end = Some(i);
            break;
        }
        escaped = c == b'\\' && !escaped;
        i += 1;
    }

    let end = end.ok_or_else(|| {
        ParsingError::missing_delimiter(
            "End of input found without closing the c-string, expected a '\"'",
            input,
            offset,
        )
    })?;

    let raw = &input[offset + 1..end];
    let decoded = decode_escapes(raw, input, offset)?;
    Ok((end + 1, decoded))
}

/// Parse a tuple: `input[offset]` must be `{`. Empty tuples are permitted.
pub fn parse_tuple(input: &str, offset: usize) -> Result<(usize, Vec<MiResult>), ParsingError> {
    let bytes = input.as_bytes();
    if offset >= bytes.len() {
        return Err(ParsingError::end_of_input(input, offset));
    }
    if bytes[offset] != b'{' {
        return Err(ParsingError::unexpected_token(bytes[offset], input, offset));
    }

    let mut results = Vec::new();
    let mut pos = offset + 1;
    loop {
        if pos >= bytes.len() {
            return Err(unterminated(input, offset, '}'));
        }
        if bytes[pos] == b'}' {
            pos += 1;
            break;
        }
        let (new_pos, result) = parse_result(input, pos)?;
        results.push(result);
        pos = new_pos;

        if pos >= bytes.len() {
            return Err(unterminated(input, offset, '}'));
        }
        match bytes[pos] {
            b',' => pos += 1,
            b'}' => {
                pos += 1;
                break;
            }
            other => return Err(ParsingError::unexpected_token(other, input, pos)),
        }
    }
    Ok((pos, results))
}

/// Parse a list: `input[offset]` must be `[`. Empty lists are permitted.
/// The byte immediately following `[` decides whether every element is a
/// bare [`Value`] or a named [`MiResult`]; that choice is fixed for the
/// remainder of the list.
pub fn parse_list(input: &str, offset: usize) -> Result<(usize, ListItems), ParsingError> {
    let bytes = input.as_bytes();
    if offset >= bytes.len() {
        return Err(ParsingError::end_of_input(input, offset));
    }
    if bytes[offset] != b'[' {
        return Err(ParsingError::unexpected_token(bytes[offset], input, offset));
    }

    let mut pos = offset + 1;
    if pos >= bytes.len() {
        return Err(unterminated(input, offset, ']'));
    }
    if bytes[pos] == b']' {
        return Ok((pos + 1, ListItems::Empty));
    }

    let elements_are_values = matches!(bytes[pos], b'"' | b'{' | b'[');
    if elements_are_values {
        let mut values = Vec::new();
        loop {
            let (new_pos, v) = parse_value(input, pos)?;
            values.push(v);
            pos = new_pos;
            match end_of_element(bytes, input, offset, pos)? {
                Continue::More(next) => pos = next,
                Continue::Done(next) => {
                    pos = next;
                    break;
                }
            }
        }
        Ok((pos, ListItems::Values(values)))
    } else {
        let mut results = Vec::new();
        loop {
            let (new_pos, r) = parse_result(input, pos)?;
            results.push(r);
            pos = new_pos;
            match end_of_element(bytes, input, offset, pos)? {
                Continue::More(next) => pos = next,
                Continue::Done(next) => {
                    pos = next;
                    break;
                }
            }
        }
        Ok((pos, ListItems::Results(results)))
    }
}

enum Continue {
    More(usize),
    Done(usize),
}

fn end_of_element(
    bytes: &[u8],
    input: &str,
    list_start: usize,
    pos: usize,
) -> Result<Continue, ParsingError> {
    if pos >= bytes.len() {
        return Err(unterminated(input, list_start, ']'));
    }
    match bytes[pos] {
        b',' => Ok(Continue::More(pos + 1)),
        b']' => Ok(Continue::Done(pos + 1)),
        other => Err(ParsingError::unexpected_token(other, input, pos)),
    }
}

/// Read bytes until one of `delimiters` (not consumed). An empty word is
/// legal once at least one byte remains to inspect.
pub fn parse_word(input: &str, offset: usize, delimiters: &[u8]) -> Result<(usize, String), ParsingError> {
    let bytes = input.as_bytes();
    if offset >= bytes.len() {
        return Err(ParsingError::end_of_input(input, offset));
    }
    let mut i = offset;
    while i < bytes.len() && !delimiters.contains(&bytes[i]) {
        i += 1;
    }
    Ok((i, input[offset..i].to_string()))
}

/// Inspect the first byte at `offset` and dispatch to the matching value
/// parser.
pub fn parse_value(input: &str, offset: usize) -> Result<(usize, Value), ParsingError> {
    let bytes = input.as_bytes();
    if offset >= bytes.len() {
        return Err(ParsingError::end_of_input(input, offset));
    }
    match bytes[offset] {
        b'"' => parse_cstring(input, offset).map(|(o, s)| (o, Value::CString(s))),
        b'{' => parse_tuple(input, offset).map(|(o, t)| (o, Value::Tuple(t))),
        b'[' => parse_list(input, offset).map(|(o, l)| (o, Value::List(l))),
        other => Err(ParsingError::unexpected_token(other, input, offset)),
    }
}

fn unterminated(input: &str, offset: usize, closer: char) -> ParsingError {
    ParsingError::missing_delimiter(
        format!(
            "End of input found before closing the value opened at position {}, expected '{}'",
            offset, closer
        ),
        input,
        input.len(),
    )
}

/// A fragment of c-string content: either a run of literal bytes, or one
/// decoded escape character.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Fragment<'a> {
    Literal(&'a str),
    Char(char),
}

fn hex_escape(input: &str) -> IResult<&str, char> {
    map_opt(
        map_res(
            preceded(char('x'), take_while_m_n(1, 2, |c: char| c.is_ascii_hexdigit())),
            |hex| u32::from_str_radix(hex, 16),
        ),
        std::char::from_u32,
    )
    .parse(input)
}

fn octal_escape(input: &str) -> IResult<&str, char> {
    map_opt(
        map_res(
            take_while_m_n(1, 3, |c: char| ('0'..='7').contains(&c)),
            |oct| u32::from_str_radix(oct, 8),
        ),
        std::char::from_u32,
    )
    .parse(input)
}

/// One `\`-prefixed escape: a known C escape, `\xHH`, `\ooo`, or an
/// unrecognized escape passed through with the backslash dropped.
fn escaped_char(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            hex_escape,
            octal_escape,
            value('\n', char('n')),
            value('\r', char('r')),
            value('\t', char('t')),
            value('\u{07}', char('a')),
            value('\u{08}', char('b')),
            value('\u{0C}', char('f')),
            value('\u{0B}', char('v')),
            value('\\', char('\\')),
            value('"', char('"')),
            value('\'', char('\'')),
            anychar,
        )),
    )
    .parse(input)
}

fn fragment(input: &str) -> IResult<&str, Fragment> {
    alt((
        map(is_not("\\"), Fragment::Literal),
        map(escaped_char, Fragment::Char),
    ))
    .parse(input)
}

fn decode_body(input: &str) -> IResult<&str, String> {
    fold(0.., fragment, String::new, |mut s, frag| {
        match frag {
            Fragment::Literal(lit) => s.push_str(lit),
            Fragment::Char(c) => s.push(c),
        }
        s
    })
    .parse(input)
}

fn decode_escapes(raw: &str, line: &str, value_offset: usize) -> Result<String, ParsingError> {
    match nom::sequence::terminated(decode_body, nom::combinator::eof).parse(raw) {
        Ok((_, decoded)) => Ok(decoded),
        Err(_) => Err(ParsingError::missing_delimiter(
            "Malformed escape sequence inside c-string",
            line,
            value_offset,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tuple() {
        let (offset, results) = parse_tuple("{}", 0).unwrap();
        assert_eq!(offset, 2);
        assert!(results.is_empty());
    }

    #[test]
    fn empty_list() {
        let (offset, items) = parse_list("[]", 0).unwrap();
        assert_eq!(offset, 2);
        assert_eq!(items, ListItems::Empty);
    }

    #[test]
    fn list_of_bare_values() {
        let (offset, items) = parse_list("[\"a\",\"b\"]", 0).unwrap();
        assert_eq!(offset, 9);
        match items {
            ListItems::Values(values) => {
                assert_eq!(values, vec![Value::CString("a".into()), Value::CString("b".into())]);
            }
            other => panic!("expected Values, got {:?}", other),
        }
    }

    #[test]
    fn list_of_results() {
        let (offset, items) = parse_list("[a=\"1\",b=\"2\"]", 0).unwrap();
        assert_eq!(offset, 13);
        match items {
            ListItems::Results(results) => assert_eq!(results.len(), 2),
            other => panic!("expected Results, got {:?}", other),
        }
    }

    #[test]
    fn cstring_decodes_c_escapes() {
        let (offset, s) = parse_cstring("\"Hello\\n\"", 0).unwrap();
        assert_eq!(offset, 9);
        assert_eq!(s, "Hello\n");
    }

    #[test]
    fn cstring_escaped_backslash_then_escaped_quote() {
        // The literal bytes are: " \ \ \ " " -> an escaped backslash followed
        // by an escaped quote, still inside the string.
        let (offset, s) = parse_cstring(r#""\\\"""#, 0).unwrap();
        assert_eq!(offset, 6);
        assert_eq!(s, "\\\"");
    }

    #[test]
    fn cstring_octal_and_hex_escapes() {
        let (_, s) = parse_cstring("\"\\101\\x42\"", 0).unwrap();
        assert_eq!(s, "AB");
    }

    #[test]
    fn unterminated_cstring_is_missing_delimiter() {
        let err = parse_cstring("\"abc", 0).unwrap_err();
        assert_eq!(err.kind, crate::error::ParsingErrorKind::MissingDelimiter);
    }

    #[test]
    fn tuple_missing_brace_is_missing_delimiter() {
        let err = parse_tuple("{a=\"1\"", 0).unwrap_err();
        assert_eq!(err.kind, crate::error::ParsingErrorKind::MissingDelimiter);
    }

    #[test]
    fn dispatcher_rejects_bad_lead_byte() {
        let err = parse_value("x", 0).unwrap_err();
        assert_eq!(err.kind, crate::error::ParsingErrorKind::UnexpectedToken);
    }

    #[test]
    fn word_may_be_empty() {
        let (offset, w) = parse_word(",rest", 0, b",\r\n").unwrap();
        assert_eq!(offset, 0);
        assert_eq!(w, "");
    }

    #[test]
    fn offset_monotonicity_on_nested_value() {
        let input = "{a=\"1\",b=[\"x\",\"y\"]}";
        let (offset, _) = parse_tuple(input, 0).unwrap();
        assert!(offset > 0);
        assert_eq!(offset, input.len());
    }
}
