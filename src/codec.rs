//! The value codec: conversion between typed scalars and their wire text.
//!
//! This is the only place where a missing value and the wire sentinel `?`
//! are mapped onto each other. All functions are pure.
//!
//! # Examples
//!
//! ```
//! use nmrstar::codec::{decode, encode};
//! use nmrstar::value::{Format, Value};
//!
//! assert_eq!(encode(None), "?");
//! assert_eq!(decode("?", Format::Float).unwrap(), None);
//! assert_eq!(decode("3.14", Format::Float).unwrap(), Some(Value::Float(3.14)));
//! ```

use crate::error::{Result, StarError};
use crate::value::{Format, Value};

/// The missing-value sentinel written for absent values.
pub const SENTINEL: &str = "?";

/// The STAR "inapplicable" marker, read back as a missing value.
///
/// Tables keep only the unquoted text of a value, so `'.'` and `'?'` cannot
/// be told apart from the markers. A string value of exactly `.` or `?`
/// therefore reads back as `None` in every format.
pub const INAPPLICABLE: &str = ".";

/// Encode an optional value into its wire text.
#[must_use]
pub fn encode(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => SENTINEL.to_string(),
    }
}

/// Encode a column of optional values.
#[must_use]
pub fn encode_column(values: &[Option<Value>]) -> Vec<String> {
    values.iter().map(|v| encode(v.as_ref())).collect()
}

/// Decode wire text into an optional typed value.
///
/// # Errors
///
/// Returns [`StarError::Format`] when `text` is not a valid `format` value.
pub fn decode(text: &str, format: Format) -> Result<Option<Value>> {
    if text == SENTINEL || text == INAPPLICABLE {
        return Ok(None);
    }
    let value = match format {
        Format::Str => Value::Str(text.to_string()),
        Format::Int => Value::Int(text.trim().parse().map_err(|_| format_error(text, format))?),
        Format::Float => {
            Value::Float(text.trim().parse().map_err(|_| format_error(text, format))?)
        },
    };
    Ok(Some(value))
}

/// Decode a column of wire text.
///
/// # Errors
///
/// Returns the first [`StarError::Format`] encountered.
pub fn decode_column(texts: &[String], format: Format) -> Result<Vec<Option<Value>>> {
    texts.iter().map(|t| decode(t, format)).collect()
}

fn format_error(text: &str, format: Format) -> StarError {
    StarError::Format {
        text: text.to_string(),
        format: format.name(),
    }
}
