//! Field descriptors: one declared field of a tag category.
//!
//! A [`FieldSpec`] is the version-independent declaration (key, value source,
//! format, default, required-ness, allowed set). A [`FieldDescriptor`] is a
//! spec paired with the wire tag a particular dictionary version gives it.
//! Versions can only rename or drop a field, never change how it validates.

use crate::error::Result;
use crate::value::{Bound, Format, Value};
use std::fmt;

/// Reads an attribute off an entry.
pub type Getter<E> = fn(&E) -> Bound;

/// Stores a decoded attribute on an entry.
pub type Setter<E> = fn(&mut E, Bound) -> Result<()>;

/// Typed access to one attribute of an entry struct.
///
/// Usually produced by the [`bind!`](crate::bind) macro.
pub struct Accessor<E> {
    /// Attribute name, used in error messages.
    pub attribute: &'static str,
    /// Reads the attribute.
    pub get: Getter<E>,
    /// Writes the attribute.
    pub set: Setter<E>,
}

impl<E> Clone for Accessor<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Accessor<E> {}

impl<E> fmt::Debug for Accessor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("attribute", &self.attribute)
            .finish_non_exhaustive()
    }
}

/// Where the value of a field comes from on write.
pub enum Source<E> {
    /// An attribute of the entry.
    Attr(Accessor<E>),
    /// The saveframe's category marker.
    Marker,
    /// The saveframe framecode.
    Framecode,
    /// The per-saveframe sequence number (cross-reference ID).
    ListId,
    /// Row numbers `1..=N`.
    RowIds,
    /// Derived from the entry on write, ignored on read.
    Computed(Getter<E>),
    /// Declared by the dictionary but not produced by this library.
    Unbound,
}

impl<E> Clone for Source<E> {
    fn clone(&self) -> Self {
        match self {
            Source::Attr(a) => Source::Attr(*a),
            Source::Marker => Source::Marker,
            Source::Framecode => Source::Framecode,
            Source::ListId => Source::ListId,
            Source::RowIds => Source::RowIds,
            Source::Computed(f) => Source::Computed(*f),
            Source::Unbound => Source::Unbound,
        }
    }
}

impl<E> fmt::Debug for Source<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Attr(a) => write!(f, "Attr({})", a.attribute),
            Source::Marker => f.write_str("Marker"),
            Source::Framecode => f.write_str("Framecode"),
            Source::ListId => f.write_str("ListId"),
            Source::RowIds => f.write_str("RowIds"),
            Source::Computed(_) => f.write_str("Computed"),
            Source::Unbound => f.write_str("Unbound"),
        }
    }
}

/// Version-independent declaration of a field.
pub struct FieldSpec<E> {
    /// Stable key, unique within a category.
    pub key: &'static str,
    /// Value source on write, and target on read.
    pub source: Source<E>,
    /// Decode format.
    pub format: Format,
    /// Substituted when the bound attribute is absent.
    pub default: Option<Value>,
    /// Whether a missing value is a validation error.
    pub required: bool,
    /// Legal wire values, checked on write.
    pub allowed: Option<&'static [&'static str]>,
}

impl<E> FieldSpec<E> {
    /// A string field with the given source.
    #[must_use]
    pub fn new(key: &'static str, source: Source<E>) -> Self {
        FieldSpec {
            key,
            source,
            format: Format::Str,
            default: None,
            required: false,
            allowed: None,
        }
    }

    /// A field bound to an entry attribute.
    #[must_use]
    pub fn attr(key: &'static str, accessor: Accessor<E>) -> Self {
        Self::new(key, Source::Attr(accessor))
    }

    /// A write-only field derived from the whole entry.
    #[must_use]
    pub fn computed(key: &'static str, derive: Getter<E>) -> Self {
        Self::new(key, Source::Computed(derive))
    }

    /// A dictionary field this library does not fill.
    #[must_use]
    pub fn unbound(key: &'static str) -> Self {
        Self::new(key, Source::Unbound)
    }

    /// Decode as integer.
    #[must_use]
    pub fn int(mut self) -> Self {
        self.format = Format::Int;
        self
    }

    /// Decode as float.
    #[must_use]
    pub fn float(mut self) -> Self {
        self.format = Format::Float;
        self
    }

    /// Set the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Mark the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict the field to a set of legal values.
    #[must_use]
    pub fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = Some(values);
        self
    }

    /// The attribute name, for fields bound to the entry.
    #[must_use]
    pub fn attribute(&self) -> Option<&'static str> {
        match &self.source {
            Source::Attr(a) => Some(a.attribute),
            _ => None,
        }
    }

    /// The name used in error messages: the attribute if bound, else the key.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.attribute().unwrap_or(self.key)
    }
}

impl<E> Clone for FieldSpec<E> {
    fn clone(&self) -> Self {
        FieldSpec {
            key: self.key,
            source: self.source.clone(),
            format: self.format,
            default: self.default.clone(),
            required: self.required,
            allowed: self.allowed,
        }
    }
}

impl<E> fmt::Debug for FieldSpec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("key", &self.key)
            .field("source", &self.source)
            .field("format", &self.format)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("allowed", &self.allowed)
            .finish()
    }
}

/// A field spec resolved against one dictionary version.
#[derive(Debug)]
pub struct FieldDescriptor<E> {
    /// The version-independent declaration.
    pub spec: FieldSpec<E>,
    /// Local wire tag, or `None` if the field does not exist in this version.
    pub wire_tag: Option<&'static str>,
}

impl<E> FieldDescriptor<E> {
    /// Compose the full wire tag: `_` + label + `.` + local tag, or `_` + tag
    /// when the category has no label (v2.1 style).
    ///
    /// Returns `None` when the field is suppressed in this version.
    #[must_use]
    pub fn resolve_wire_tag(&self, label: Option<&str>) -> Option<String> {
        self.wire_tag.map(|tag| compose_tag(label, tag))
    }
}

/// Separator between the category label and the local tag.
pub const SEPARATOR: char = '.';

/// Compose a full wire tag from an optional category label and a local tag.
#[must_use]
pub fn compose_tag(label: Option<&str>, tag: &str) -> String {
    match label {
        Some(label) => format!("_{label}{SEPARATOR}{tag}"),
        None => format!("_{tag}"),
    }
}
