//! `name "=" value` pairs.

use crate::error::ParsingError;
use crate::value::{Value, parse_value};

/// An ordered `(name, value)` pair. Variable names are bare identifiers:
/// any byte sequence up to the next `=`, with no quoting interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct MiResult {
    pub name: String,
    pub value: Value,
}

/// Read a variable name up to the first `=`, consume the `=`, then parse a
/// [`Value`]. The name scan does not interpret quoting, matching GDB/MI
/// where names are always bare identifiers.
pub fn parse_result(input: &str, offset: usize) -> Result<(usize, MiResult), ParsingError> {
    let bytes = input.as_bytes();
    if offset >= bytes.len() {
        return Err(ParsingError::end_of_input(input, offset));
    }

    let eq = input[offset..]
        .find('=')
        .ok_or_else(|| ParsingError::missing_delimiter("Token '=' not found", input, offset))?;
    let name = input[offset..offset + eq].to_string();

    let value_offset = offset + eq + 1;
    let (new_offset, value) = parse_value(input, value_offset)?;

    Ok((new_offset, MiResult { name, value }))
}
