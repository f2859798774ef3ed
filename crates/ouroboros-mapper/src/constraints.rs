//! Atomic validation rules
//!
//! A field descriptor owns an ordered chain of [`Constraint`]s and evaluates
//! them fail-fast. User predicates plug in through the [`Validator`] trait.

use crate::errors::{ConstraintError, ConstraintKind, ConstraintResult};
use crate::fields::FieldDescriptor;
use crate::schema::Schema;
use crate::types::{Number, Value};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Validator Trait
// ============================================================================

/// User-supplied predicate appended to a field's chain
///
/// Closures of the form `Fn(&Value) -> Result<(), ConstraintError>` implement
/// this trait directly.
///
/// ```rust
/// use ouroboros_mapper::{custom_error, FieldDescriptor, Value};
///
/// let field = FieldDescriptor::any().validator(|value: &Value| {
///     if *value == Value::Int(42) {
///         return Err(custom_error("42 is reserved"));
///     }
///     Ok(())
/// });
/// assert!(field.validate(&Value::Int(1)).is_ok());
/// assert!(field.validate(&Value::Int(42)).is_err());
/// ```
pub trait Validator: Send + Sync {
    /// Check the value, failing with a constraint error
    fn check(&self, value: &Value) -> ConstraintResult<()>;

    /// Name used in debug output
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> Validator for F
where
    F: Fn(&Value) -> ConstraintResult<()> + Send + Sync,
{
    fn check(&self, value: &Value) -> ConstraintResult<()> {
        self(value)
    }
}

/// Type alias for shared validators
pub type BoxedValidator = Arc<dyn Validator>;

// ============================================================================
// Constraint
// ============================================================================

/// One atomic rule in a field's chain
#[derive(Clone)]
pub enum Constraint {
    /// Value must be an integer or a float
    Numeric,
    /// Value must equal its own truncation
    Integral,
    /// Value must be text; unicode text is rejected unless allowed
    Text { allow_unicode: bool },
    /// Value must be a list
    Sequence,
    /// Value must be a raw mapping
    Mapping,
    /// Inclusive numeric minimum
    MinValue(Number),
    /// Inclusive numeric maximum
    MaxValue(Number),
    /// Inclusive minimum length
    MinLength(usize),
    /// Inclusive maximum length
    MaxLength(usize),
    /// Every list element or mapping value satisfies the element descriptor
    Elements(Arc<FieldDescriptor>),
    /// Value is an instance satisfying every field of the schema
    Conforms(Schema),
    /// User-supplied predicate
    Custom(BoxedValidator),
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "Numeric"),
            Self::Integral => write!(f, "Integral"),
            Self::Text { allow_unicode } => {
                write!(f, "Text {{ allow_unicode: {} }}", allow_unicode)
            }
            Self::Sequence => write!(f, "Sequence"),
            Self::Mapping => write!(f, "Mapping"),
            Self::MinValue(n) => write!(f, "MinValue({})", n),
            Self::MaxValue(n) => write!(f, "MaxValue({})", n),
            Self::MinLength(n) => write!(f, "MinLength({})", n),
            Self::MaxLength(n) => write!(f, "MaxLength({})", n),
            Self::Elements(elem) => write!(f, "Elements({:?})", elem.kind()),
            Self::Conforms(schema) => write!(f, "Conforms({})", schema.name()),
            Self::Custom(validator) => write!(f, "Custom({})", validator.name()),
        }
    }
}

impl Constraint {
    /// Check a value against this rule
    pub fn check(&self, value: &Value) -> ConstraintResult<()> {
        match self {
            Self::Numeric => check_numeric(value),
            Self::Integral => check_integral(value),
            Self::Text { allow_unicode } => check_text(value, *allow_unicode),
            Self::Sequence => match value {
                Value::List(_) => Ok(()),
                _ => Err(ConstraintError::type_error(format!(
                    "Value {} is not a valid array",
                    value
                ))),
            },
            Self::Mapping => match value {
                Value::Object(_) => Ok(()),
                _ => Err(ConstraintError::type_error(format!(
                    "Value {} is not a valid dict",
                    value
                ))),
            },
            Self::MinValue(min) => {
                let n = require_number(value)?;
                if n < *min || n.partial_cmp(min).is_none() {
                    return Err(ConstraintError::new(
                        ConstraintKind::Bound,
                        format!("Value {} less than minimum {}", n, min),
                    ));
                }
                Ok(())
            }
            Self::MaxValue(max) => {
                let n = require_number(value)?;
                if n > *max || n.partial_cmp(max).is_none() {
                    return Err(ConstraintError::new(
                        ConstraintKind::Bound,
                        format!("Value {} exceeds maximum {}", n, max),
                    ));
                }
                Ok(())
            }
            Self::MinLength(min) => {
                let len = require_length(value)?;
                if len < *min {
                    return Err(ConstraintError::new(
                        ConstraintKind::Length,
                        format!("Length {} less than minimum {}", len, min),
                    ));
                }
                Ok(())
            }
            Self::MaxLength(max) => {
                let len = require_length(value)?;
                if len > *max {
                    return Err(ConstraintError::new(
                        ConstraintKind::Length,
                        format!("Length {} exceeds maximum {}", len, max),
                    ));
                }
                Ok(())
            }
            Self::Elements(elem) => check_elements(value, elem),
            Self::Conforms(schema) => check_conforms(value, schema),
            Self::Custom(validator) => validator.check(value),
        }
    }
}

// ============================================================================
// Rule Implementations
// ============================================================================

fn require_number(value: &Value) -> ConstraintResult<Number> {
    value.as_number().ok_or_else(|| {
        ConstraintError::type_error(format!("Value {} is not numeric", value))
    })
}

fn require_length(value: &Value) -> ConstraintResult<usize> {
    value.length().ok_or_else(|| {
        ConstraintError::type_error(format!("Value {} has no length", value))
    })
}

fn check_numeric(value: &Value) -> ConstraintResult<()> {
    require_number(value).map(|_| ())
}

fn check_integral(value: &Value) -> ConstraintResult<()> {
    match require_number(value)? {
        Number::Int(_) => Ok(()),
        Number::Float(f) if f.is_finite() && f.trunc() == f => Ok(()),
        Number::Float(_) => Err(ConstraintError::new(
            ConstraintKind::Integral,
            format!("Value {} is not integral", value),
        )),
    }
}

fn check_text(value: &Value, allow_unicode: bool) -> ConstraintResult<()> {
    match value {
        Value::Bytes(_) => Ok(()),
        Value::String(_) if allow_unicode => Ok(()),
        Value::String(_) => Err(ConstraintError::type_error(format!(
            "Value {} is not a byte string",
            value
        ))),
        _ => Err(ConstraintError::type_error(format!(
            "Value {} is not a string",
            value
        ))),
    }
}

fn check_elements(value: &Value, elem: &FieldDescriptor) -> ConstraintResult<()> {
    match value {
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                elem.validate(item).map_err(|e| e.at(&format!("[{}]", i)))?;
            }
            Ok(())
        }
        Value::Object(pairs) => {
            for (key, item) in pairs {
                elem.validate(item).map_err(|e| e.at(key))?;
            }
            Ok(())
        }
        _ => Err(ConstraintError::type_error(format!(
            "Value {} has no elements",
            value
        ))),
    }
}

fn check_conforms(value: &Value, schema: &Schema) -> ConstraintResult<()> {
    let instance = match value {
        Value::Instance(instance) => instance,
        _ => {
            return Err(ConstraintError::type_error(format!(
                "Value {} is not a '{}' instance",
                value,
                schema.name()
            )))
        }
    };

    for field in schema.fields() {
        let name = field.name().unwrap_or_default();
        match instance.get(name) {
            Some(field_value) => field.validate(field_value)?,
            None => {
                return Err(ConstraintError::new(
                    ConstraintKind::Missing,
                    format!("Missing field {}", name),
                )
                .at(name))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric() {
        assert!(Constraint::Numeric.check(&Value::Int(1)).is_ok());
        assert!(Constraint::Numeric.check(&Value::Float(1.5)).is_ok());
        let err = Constraint::Numeric.check(&Value::from("1")).unwrap_err();
        assert_eq!(err.kind, ConstraintKind::Type);
        assert!(Constraint::Numeric.check(&Value::Bool(true)).is_err());
    }

    #[test]
    fn test_integral() {
        assert!(Constraint::Integral.check(&Value::Int(2)).is_ok());
        assert!(Constraint::Integral.check(&Value::Float(2.0)).is_ok());
        assert!(Constraint::Integral.check(&Value::Float(-3.0)).is_ok());

        let err = Constraint::Integral.check(&Value::Float(2.5)).unwrap_err();
        assert_eq!(err.kind, ConstraintKind::Integral);
        assert!(Constraint::Integral.check(&Value::Float(f64::NAN)).is_err());
        assert!(Constraint::Integral.check(&Value::Float(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let min = Constraint::MinValue(Number::Int(0));
        let max = Constraint::MaxValue(Number::Int(10));

        assert!(min.check(&Value::Int(0)).is_ok());
        assert!(max.check(&Value::Int(10)).is_ok());
        assert!(max.check(&Value::Float(10.0)).is_ok());
        assert!(min.check(&Value::Float(-0.001)).is_err());

        let err = max.check(&Value::Int(11)).unwrap_err();
        assert_eq!(err.kind, ConstraintKind::Bound);
        assert_eq!(err.message, "Value 11 exceeds maximum 10");
    }

    #[test]
    fn test_nan_fails_bounds() {
        let min = Constraint::MinValue(Number::Float(0.0));
        assert!(min.check(&Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn test_lengths() {
        let max = Constraint::MaxLength(5);
        assert!(max.check(&Value::from("12345")).is_ok());
        let err = max.check(&Value::from("123456")).unwrap_err();
        assert_eq!(err.kind, ConstraintKind::Length);
        assert_eq!(err.message, "Length 6 exceeds maximum 5");

        let err = max.check(&Value::Int(3)).unwrap_err();
        assert_eq!(err.kind, ConstraintKind::Type);
    }

    #[test]
    fn test_text_modes() {
        let unicode = Constraint::Text { allow_unicode: true };
        let bytes_only = Constraint::Text { allow_unicode: false };

        assert!(unicode.check(&Value::from("hi")).is_ok());
        assert!(unicode.check(&Value::bytes(b"hi")).is_ok());
        assert!(bytes_only.check(&Value::bytes(b"hi")).is_ok());
        assert!(bytes_only.check(&Value::from("hi")).is_err());
        assert!(unicode.check(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_container_types() {
        assert!(Constraint::Sequence.check(&Value::List(vec![])).is_ok());
        assert!(Constraint::Sequence.check(&Value::Object(vec![])).is_err());
        assert!(Constraint::Mapping.check(&Value::Object(vec![])).is_ok());
        assert!(Constraint::Mapping.check(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_custom_validator() {
        let rule = Constraint::Custom(Arc::new(|value: &Value| {
            if value.is_null() {
                Err(ConstraintError::custom("null not allowed"))
            } else {
                Ok(())
            }
        }));
        assert!(rule.check(&Value::Int(1)).is_ok());
        assert_eq!(rule.check(&Value::Null).unwrap_err().kind, ConstraintKind::Custom);
        assert_eq!(format!("{:?}", rule), "Custom(custom)");
    }
}
