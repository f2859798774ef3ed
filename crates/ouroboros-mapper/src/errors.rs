//! Error types for validation, loading and schema declaration
//!
//! Every failure is raised at the point of detection. `MapperError` is the
//! single kind callers can match on for pass/fail; its variants keep the
//! individual failure kinds testable.

use std::fmt;
use thiserror::Error;

// ============================================================================
// Result Aliases
// ============================================================================

/// Result of a single-value validation
pub type ConstraintResult<T> = Result<T, ConstraintError>;

/// Result of loading or constructing objects
pub type MapperResult<T> = Result<T, MapperError>;

// ============================================================================
// Path helpers
// ============================================================================

/// Prefix `path` with `segment`, keeping index segments (`[3]`) glued on
fn prefix_path(segment: &str, path: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else if path.starts_with('[') {
        format!("{}{}", segment, path)
    } else {
        format!("{}.{}", segment, path)
    }
}

// ============================================================================
// Constraint Error
// ============================================================================

/// Classification of constraint failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Wrong value type (e.g. expected string, got integer)
    Type,
    /// Numeric bound violated
    Bound,
    /// Length bound violated
    Length,
    /// Value is not integral
    Integral,
    /// Nested instance lacks a declared field
    Missing,
    /// User-supplied validator rejected the value
    Custom,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "type_error"),
            Self::Bound => write!(f, "bound_error"),
            Self::Length => write!(f, "length_error"),
            Self::Integral => write!(f, "integral_error"),
            Self::Missing => write!(f, "missing"),
            Self::Custom => write!(f, "custom_error"),
        }
    }
}

/// A single value failed one constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintError {
    /// Location of the value (e.g. "user.tags[2]"); empty at the root
    pub path: String,
    /// What kind of rule failed
    pub kind: ConstraintKind,
    /// Human-readable message
    pub message: String,
}

impl ConstraintError {
    /// Create a new constraint error at the root path
    pub fn new(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            path: String::new(),
            kind,
            message: message.into(),
        }
    }

    /// Create a type error
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ConstraintKind::Type, message)
    }

    /// Create an error for a user-supplied validator
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ConstraintKind::Custom, message)
    }

    /// Attribute the error to an enclosing field or index
    pub fn at(mut self, segment: &str) -> Self {
        self.path = prefix_path(segment, &self.path);
        self
    }
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for ConstraintError {}

/// Shorthand for building a custom validator failure
pub fn custom_error(message: impl Into<String>) -> ConstraintError {
    ConstraintError::custom(message)
}

// ============================================================================
// Mapper Error
// ============================================================================

/// Failure of a structural load or a direct construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapperError {
    /// A value failed one of its field's constraints
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// A required field is absent from the load input
    #[error("Missing field '{path}'")]
    MissingField { field: String, path: String },

    /// The load input holds a key no field maps to
    #[error("Excess element '{path}' in data")]
    ExcessField { key: String, path: String },

    /// More positional arguments than declared fields
    #[error("Number of args ({given}) exceeds number of fields ({expected}) of '{schema}'")]
    Arity {
        schema: String,
        given: usize,
        expected: usize,
    },

    /// Direct construction left a required field without a value
    #[error("No value or default for field '{field}'")]
    MissingValue { field: String },

    /// Direct construction received a keyword that names no field
    #[error("'{keyword}' is an invalid keyword argument for '{schema}'")]
    UnexpectedKeyword { schema: String, keyword: String },
}

impl MapperError {
    pub(crate) fn missing_field(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
            path: field.to_string(),
        }
    }

    pub(crate) fn excess_field(key: &str) -> Self {
        Self::ExcessField {
            key: key.to_string(),
            path: key.to_string(),
        }
    }

    /// Attribute the error to an enclosing field or index
    pub fn at(self, segment: &str) -> Self {
        match self {
            Self::Constraint(err) => Self::Constraint(err.at(segment)),
            Self::MissingField { field, path } => Self::MissingField {
                field,
                path: prefix_path(segment, &path),
            },
            Self::ExcessField { key, path } => Self::ExcessField {
                key,
                path: prefix_path(segment, &path),
            },
            other => other,
        }
    }

    /// True for both the load-path and the construction-path "required field absent"
    pub fn is_missing_required(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::MissingValue { .. })
    }

    /// The constraint failure, if this is one
    pub fn as_constraint(&self) -> Option<&ConstraintError> {
        match self {
            Self::Constraint(err) => Some(err),
            _ => None,
        }
    }
}

// ============================================================================
// Schema Error
// ============================================================================

/// Failure while declaring a schema
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field '{field}' declared twice in schema '{schema}'")]
    DuplicateField { schema: String, field: String },

    #[error("Schema '{schema}' declares a field with an empty name")]
    EmptyFieldName { schema: String },

    #[error("Option '{option}' does not apply to {kind} field '{field}' in schema '{schema}'")]
    InvalidOption {
        schema: String,
        field: String,
        option: String,
        kind: String,
    },

    #[error("Default of field '{field}' in schema '{schema}' is invalid: {source}")]
    InvalidDefault {
        schema: String,
        field: String,
        source: ConstraintError,
    },
}
