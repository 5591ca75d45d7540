//! Typed scalar values and the shapes they are bound in.
//!
//! A saveframe entry stores its data in plain Rust fields (`Option<f64>`,
//! `Vec<Option<i64>>`, ...). The mapping engine never touches those fields
//! directly: it sees them through [`Bound`], a shape-tagged view produced and
//! consumed by the [`Bind`] trait.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire format of a field, governing decode conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Format {
    /// Pass-through text.
    #[default]
    Str,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
}

impl Format {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Format::Str => "string",
            Format::Int => "integer",
            Format::Float => "float",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed scalar.
///
/// `None` is never a `Value`: absence is always modelled with `Option`, and
/// only the codec maps it to the wire sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Text value.
    Str(String),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// A bound attribute value as seen by the mapping engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Bound {
    /// The attribute is not set.
    #[default]
    Absent,
    /// A single value, broadcast over the rows of a loop table.
    Scalar(Value),
    /// One value per row; elements may be missing.
    List(Vec<Option<Value>>),
}

impl Bound {
    /// Whether the attribute is unset.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Bound::Absent)
    }

    /// Length of a list-valued binding.
    #[must_use]
    pub fn list_len(&self) -> Option<usize> {
        match self {
            Bound::List(items) => Some(items.len()),
            _ => None,
        }
    }
}

/// Conversion between a Rust scalar type and [`Value`].
pub trait FromValue: Sized {
    /// Convert a decoded value into `Self`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value cannot represent `Self`.
    fn from_value(value: Value) -> std::result::Result<Self, String>;

    /// Convert `self` into a value for encoding.
    fn to_value(&self) -> Value;
}

impl FromValue for String {
    fn from_value(value: Value) -> std::result::Result<Self, String> {
        Ok(match value {
            Value::Str(s) => s,
            other => other.to_string(),
        })
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("'{s}' is not an integer")),
            Value::Float(x) => Err(format!("{x} is not an integer")),
        }
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl FromValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Float(x) => Ok(x),
            Value::Int(i) => Ok(i as f64),
            Value::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("'{s}' is not a number")),
        }
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

/// Conversion between an entry attribute and its [`Bound`] view.
///
/// Implemented for `Option<T>` (scalar attributes) and `Vec<Option<T>>`
/// (per-row attributes, where an empty vector means "not set"). A decoded
/// list with no values at all is returned as an empty vector.
pub trait Bind: Sized {
    /// View the attribute as a bound value.
    fn to_bound(&self) -> Bound;

    /// Rebuild the attribute from a decoded bound value.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the shape or element type does
    /// not fit the attribute.
    fn from_bound(bound: Bound) -> std::result::Result<Self, String>;
}

impl<T: FromValue> Bind for Option<T> {
    fn to_bound(&self) -> Bound {
        match self {
            Some(v) => Bound::Scalar(v.to_value()),
            None => Bound::Absent,
        }
    }

    fn from_bound(bound: Bound) -> std::result::Result<Self, String> {
        match bound {
            Bound::Absent => Ok(None),
            Bound::Scalar(v) => T::from_value(v).map(Some),
            // A scalar broadcast over several rows reads back from a uniform column.
            Bound::List(items) => {
                let mut items = items.into_iter();
                let first = items.next().flatten();
                if let Some(other) = items.find(|item| *item != first) {
                    return Err(format!(
                        "expected a single value, found {} and {}",
                        first.map_or_else(|| "?".to_string(), |v| v.to_string()),
                        other.map_or_else(|| "?".to_string(), |v| v.to_string())
                    ));
                }
                first.map(T::from_value).transpose()
            },
        }
    }
}

impl<T: FromValue> Bind for Vec<Option<T>> {
    fn to_bound(&self) -> Bound {
        if self.is_empty() {
            return Bound::Absent;
        }
        Bound::List(
            self.iter()
                .map(|item| item.as_ref().map(FromValue::to_value))
                .collect(),
        )
    }

    fn from_bound(bound: Bound) -> std::result::Result<Self, String> {
        match bound {
            Bound::Absent => Ok(Vec::new()),
            Bound::Scalar(v) => Ok(vec![Some(T::from_value(v)?)]),
            // A column of sentinels is indistinguishable from an unset attribute.
            Bound::List(items) if items.iter().all(Option::is_none) => Ok(Vec::new()),
            Bound::List(items) => items
                .into_iter()
                .map(|item| item.map(T::from_value).transpose())
                .collect(),
        }
    }
}
