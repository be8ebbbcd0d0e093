//! Value codec for match operands.
//!
//! Converts scalar values to and from their textual form. The conversion is
//! directed by the column's format tags, not by the token itself: `false`
//! and `null` both pack to `"0"` and the column decides which one comes
//! back.
//!
//! Percent-encoding is a separate layer ([`encode_component`] and
//! [`decode_component`]) applied by the serializer around every packed
//! value.

use chrono::DateTime;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use restmap_proto::Value;

use crate::catalog::{ColumnDescriptor, Format};
use crate::error::Error;

/// Characters escaped in a path component: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode text for use as a single path token.
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, COMPONENT).to_string()
}

/// Decode a percent-encoded path token.
pub fn decode_component(token: &str) -> Result<String, Error> {
    percent_decode_str(token)
        .decode_utf8()
        .map(|text| text.into_owned())
        .map_err(|_| Error::InvalidEncoding(token.to_string()))
}

/// Pack a value into its textual form.
///
/// The column is not consulted: packing is driven by the value alone.
pub fn pack_value(_column: &ColumnDescriptor, value: &Value) -> String {
    match value {
        Value::Date(date) => date.timestamp_millis().to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => "0".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => pack_float(*f),
        Value::String(s) => s.clone(),
    }
}

/// Unpack the textual form of a value according to the column's formats.
///
/// Formats are checked in this order: date, decimal/number,
/// integer/timestamp, boolean (only for `"1"` and `"0"`), null (only for
/// `"0"`). Text that matches none of them is returned as a string.
pub fn unpack_value(column: &ColumnDescriptor, text: &str) -> Result<Value, Error> {
    if column.has(Format::Date) {
        let millis = parse_integer(text, Format::Date)?;
        return DateTime::from_timestamp_millis(millis)
            .map(Value::Date)
            .ok_or_else(|| invalid_value(text, Format::Date));
    }
    if column.has(Format::Decimal) || column.has(Format::Number) {
        let format = if column.has(Format::Decimal) {
            Format::Decimal
        } else {
            Format::Number
        };
        return text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid_value(text, format));
    }
    if column.has(Format::Integer) || column.has(Format::Timestamp) {
        let format = if column.has(Format::Integer) {
            Format::Integer
        } else {
            Format::Timestamp
        };
        return parse_integer(text, format).map(Value::Integer);
    }
    if column.has(Format::Boolean) && (text == "1" || text == "0") {
        return Ok(Value::Bool(text == "1"));
    }
    if column.has(Format::Null) && text == "0" {
        return Ok(Value::Null);
    }
    Ok(Value::String(text.to_string()))
}

/// Write a float in the shortest form a JavaScript reader parses back to
/// the same number (`1e+21`, `1e-7`, `Infinity`).
fn pack_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "Infinity".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if f == 0.0 {
        // Also covers -0.
        "0".to_string()
    } else {
        ryu_js::Buffer::new().format_finite(f).to_string()
    }
}

/// Parse the leading integer of `text`, ignoring whatever follows it.
///
/// `"17.5"` reads as 17 and `"12px"` as 12; text without leading digits
/// is an invalid value.
fn parse_integer(text: &str, format: Format) -> Result<i64, Error> {
    let trimmed = text.trim_start();
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let sign_len = trimmed.len() - unsigned.len();
    if sign_len > 1 {
        return Err(invalid_value(text, format));
    }
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return Err(invalid_value(text, format));
    }
    trimmed[..sign_len + digits]
        .parse::<i64>()
        .map_err(|_| invalid_value(text, format))
}

fn invalid_value(text: &str, format: Format) -> Error {
    Error::InvalidValue {
        value: text.to_string(),
        format: format.name(),
    }
}
