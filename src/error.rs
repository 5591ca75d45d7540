//! Error types for NMR-STAR operations.
//!
//! This module provides the [`StarError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all NMR-STAR library operations.
///
/// The first seven variants are the mapping-engine error kinds. `add` wraps
/// write-side validation failures in [`StarError::Validation`] so callers can
/// tell which saveframe rejected the entry.
#[derive(Error, Debug)]
pub enum StarError {
    /// A required field is absent or `None` after defaulting and broadcast.
    #[error("Missing field '{field}' in {category}")]
    MissingField {
        /// Wire category label the field belongs to.
        category: String,
        /// Field key.
        field: String,
    },

    /// Per-element arrays of one table disagree in length.
    #[error("Length mismatch for '{field}' in {category}: expected {expected}, found {found}")]
    LengthMismatch {
        /// Wire category label the field belongs to.
        category: String,
        /// Field key.
        field: String,
        /// Row count the table was sized to.
        expected: usize,
        /// Length of the offending value.
        found: usize,
    },

    /// A value outside the declared allowed set, or a malformed shape.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Field key or attribute name.
        field: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// A wire string could not be parsed into the declared format.
    #[error("Format error: cannot read '{text}' as {format}")]
    Format {
        /// The offending wire text.
        text: String,
        /// Name of the expected format.
        format: &'static str,
    },

    /// An expected wire tag is absent from a table being read.
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// A matched block's tables do not line up with the declared categories.
    #[error("Structural mismatch in saveframe '{saveframe}': {reason}")]
    StructuralMismatch {
        /// Saveframe label.
        saveframe: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// A category marker belongs to a different dictionary version, or the
    /// configured version has no definition for the requested saveframe.
    #[error("Version mismatch for '{saveframe}': {reason}")]
    VersionMismatch {
        /// Saveframe label.
        saveframe: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// Write-side validation failure raised by `add` before any block is appended.
    #[error("Validation failed for saveframe '{saveframe}': {source}")]
    Validation {
        /// Saveframe label.
        saveframe: String,
        /// The underlying missing-field, length or invalid-value error.
        #[source]
        source: Box<StarError>,
    },

    /// Inconsistent dictionary configuration tables.
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// Syntax error in STAR text.
    #[error("Parse error at byte {offset}: {message}")]
    Parse {
        /// Byte offset into the input.
        offset: usize,
        /// What the parser expected.
        message: String,
    },

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StarError {
    /// Wrap a write-side error in [`StarError::Validation`].
    ///
    /// Errors that are not validation failures are passed through unchanged.
    #[must_use]
    pub fn into_validation(self, saveframe: &str) -> Self {
        match self {
            err @ (StarError::MissingField { .. }
            | StarError::LengthMismatch { .. }
            | StarError::InvalidValue { .. }) => StarError::Validation {
                saveframe: saveframe.to_string(),
                source: Box::new(err),
            },
            other => other,
        }
    }

    /// The innermost error, looking through [`StarError::Validation`].
    #[must_use]
    pub fn root(&self) -> &StarError {
        match self {
            StarError::Validation { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Convenience type alias for [`std::result::Result`] with [`StarError`].
pub type Result<T> = std::result::Result<T, StarError>;
