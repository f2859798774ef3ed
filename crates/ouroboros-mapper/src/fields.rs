//! Field descriptors
//!
//! A [`FieldDescriptor`] is a reusable validation and decoding rule for one
//! slot of a schema. It owns an ordered constraint chain compiled from its
//! kind and options, plus an optional default value.
//!
//! # Example
//!
//! ```rust
//! use ouroboros_mapper::{FieldDescriptor, Value};
//!
//! let age = FieldDescriptor::integer().min_val(0).max_val(150);
//! assert!(age.validate(&Value::Int(30)).is_ok());
//! assert!(age.validate(&Value::Float(30.0)).is_ok());
//! assert!(age.validate(&Value::Float(30.5)).is_err());
//! assert!(age.validate(&Value::Int(151)).is_err());
//! ```

use crate::constraints::{BoxedValidator, Constraint, Validator};
use crate::errors::{ConstraintError, ConstraintResult, MapperError, MapperResult};
use crate::schema::Schema;
use crate::types::{to_json, Number, Value};
use std::sync::Arc;

// ============================================================================
// Field Kind
// ============================================================================

/// Shape of the values a descriptor accepts
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Any value; only user validators apply
    Any,
    /// Integer or float
    Numeric,
    /// Number equal to its own truncation
    Integer,
    /// Text or byte string
    String,
    /// List whose elements follow the element descriptor
    Array(Arc<FieldDescriptor>),
    /// Mapping whose values follow the element descriptor
    Dict(Arc<FieldDescriptor>),
    /// Nested object loaded through its schema
    Object(Schema),
}

impl FieldKind {
    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Numeric => "numeric",
            Self::Integer => "integer",
            Self::String => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Object(_) => "object",
        }
    }

    /// Whether a builder option applies to this kind
    fn supports(&self, option: &str) -> bool {
        match option {
            "min_val" | "max_val" => matches!(self, Self::Numeric | Self::Integer),
            "min_len" | "max_len" => matches!(self, Self::String | Self::Array(_) | Self::Dict(_)),
            "allow_unicode" => matches!(self, Self::String),
            _ => true,
        }
    }
}

/// Construction-time options a descriptor was configured with
#[derive(Clone, Default)]
struct FieldOptions {
    min_val: Option<Number>,
    max_val: Option<Number>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    bytes_only: bool,
    validators: Vec<BoxedValidator>,
    /// Options given that the kind does not take; reported at schema build
    unsupported: Vec<&'static str>,
}

// ============================================================================
// Field Descriptor
// ============================================================================

/// Typed validation rule for one schema slot
#[derive(Clone)]
pub struct FieldDescriptor {
    name: Option<String>,
    kind: FieldKind,
    options: FieldOptions,
    constraints: Vec<Constraint>,
    default: Option<Value>,
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("constraints", &self.constraints)
            .field("default", &self.default)
            .finish()
    }
}

impl FieldDescriptor {
    fn with_kind(kind: FieldKind) -> Self {
        let mut field = Self {
            name: None,
            kind,
            options: FieldOptions::default(),
            constraints: Vec::new(),
            default: None,
        };
        field.compile();
        field
    }

    /// Field accepting any value
    pub fn any() -> Self {
        Self::with_kind(FieldKind::Any)
    }

    /// Field accepting integers and floats
    pub fn numeric() -> Self {
        Self::with_kind(FieldKind::Numeric)
    }

    /// Field accepting integral numbers (`2` and `2.0`, not `2.5`)
    pub fn integer() -> Self {
        Self::with_kind(FieldKind::Integer)
    }

    /// Field accepting text and byte strings
    pub fn string() -> Self {
        Self::with_kind(FieldKind::String)
    }

    /// Field accepting a list of `elem`-shaped values
    pub fn array(elem: FieldDescriptor) -> Self {
        Self::with_kind(FieldKind::Array(Arc::new(elem)))
    }

    /// Field accepting a mapping of string keys to `elem`-shaped values
    pub fn dict(elem: FieldDescriptor) -> Self {
        Self::with_kind(FieldKind::Dict(Arc::new(elem)))
    }

    /// Field holding a nested object of `schema`
    pub fn object(schema: Schema) -> Self {
        Self::with_kind(FieldKind::Object(schema))
    }

    // ========================================================================
    // Options
    // ========================================================================

    /// Set default value; a field without one is required
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Append a user validator to the chain
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.options.validators.push(Arc::new(validator));
        self.compile();
        self
    }

    /// Inclusive numeric minimum
    #[must_use]
    pub fn min_val(mut self, min: impl Into<Number>) -> Self {
        if self.accepts("min_val") {
            self.options.min_val = Some(min.into());
            self.compile();
        }
        self
    }

    /// Inclusive numeric maximum
    #[must_use]
    pub fn max_val(mut self, max: impl Into<Number>) -> Self {
        if self.accepts("max_val") {
            self.options.max_val = Some(max.into());
            self.compile();
        }
        self
    }

    /// Inclusive minimum length
    #[must_use]
    pub fn min_len(mut self, min: usize) -> Self {
        if self.accepts("min_len") {
            self.options.min_len = Some(min);
            self.compile();
        }
        self
    }

    /// Inclusive maximum length
    #[must_use]
    pub fn max_len(mut self, max: usize) -> Self {
        if self.accepts("max_len") {
            self.options.max_len = Some(max);
            self.compile();
        }
        self
    }

    /// Whether unicode text is accepted; byte strings always are
    #[must_use]
    pub fn allow_unicode(mut self, allow: bool) -> Self {
        if self.accepts("allow_unicode") {
            self.options.bytes_only = !allow;
            self.compile();
        }
        self
    }

    /// Record `option` as unsupported unless the kind takes it
    fn accepts(&mut self, option: &'static str) -> bool {
        if self.kind.supports(option) {
            return true;
        }
        if !self.options.unsupported.contains(&option) {
            self.options.unsupported.push(option);
        }
        false
    }

    /// Rebuild the chain in canonical order: type, integral, bounds,
    /// elements/nested schema, then user validators.
    fn compile(&mut self) {
        let mut chain = Vec::new();

        match &self.kind {
            FieldKind::Any | FieldKind::Object(_) => {}
            FieldKind::Numeric => chain.push(Constraint::Numeric),
            FieldKind::Integer => {
                chain.push(Constraint::Numeric);
                chain.push(Constraint::Integral);
            }
            FieldKind::String => chain.push(Constraint::Text {
                allow_unicode: !self.options.bytes_only,
            }),
            FieldKind::Array(_) => chain.push(Constraint::Sequence),
            FieldKind::Dict(_) => chain.push(Constraint::Mapping),
        }

        if let Some(min) = self.options.min_val {
            chain.push(Constraint::MinValue(min));
        }
        if let Some(max) = self.options.max_val {
            chain.push(Constraint::MaxValue(max));
        }
        if let Some(min) = self.options.min_len {
            chain.push(Constraint::MinLength(min));
        }
        if let Some(max) = self.options.max_len {
            chain.push(Constraint::MaxLength(max));
        }

        match &self.kind {
            FieldKind::Array(elem) | FieldKind::Dict(elem) => {
                chain.push(Constraint::Elements(Arc::clone(elem)));
            }
            FieldKind::Object(schema) => chain.push(Constraint::Conforms(schema.clone())),
            _ => {}
        }

        chain.extend(
            self.options
                .validators
                .iter()
                .map(|v| Constraint::Custom(Arc::clone(v))),
        );

        self.constraints = chain;
    }

    /// Name the descriptor when it joins a schema
    pub(crate) fn attach(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Field name; `None` until attached to a schema
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Shape of accepted values
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Default value, if declared (`Some(Value::Null)` is a real default)
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Check if a default was declared
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// First option given that this kind (or an element kind) does not take
    ///
    /// Unsupported options never enter the chain; [`SchemaBuilder::build`]
    /// rejects descriptors that carry one.
    ///
    /// [`SchemaBuilder::build`]: crate::schema::SchemaBuilder::build
    pub fn unsupported_option(&self) -> Option<(&'static str, &'static str)> {
        if let Some(option) = self.options.unsupported.first() {
            return Some((*option, self.kind.name()));
        }
        match &self.kind {
            FieldKind::Array(elem) | FieldKind::Dict(elem) => elem.unsupported_option(),
            _ => None,
        }
    }

    /// The compiled constraint chain in evaluation order
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    // ========================================================================
    // Validate / Load / Encode
    // ========================================================================

    /// Run the chain against `value`, failing with the first error
    pub fn validate(&self, value: &Value) -> ConstraintResult<()> {
        self.constraints
            .iter()
            .try_for_each(|constraint| constraint.check(value))
            .map_err(|e| self.attribute(e))
    }

    /// Validate `raw` and decode it
    ///
    /// Scalars come back unchanged. Lists and mappings load each element
    /// through the element descriptor, and object fields delegate to the
    /// nested schema's load.
    pub fn load(&self, raw: &Value) -> MapperResult<Value> {
        self.load_chain(raw).map_err(|e| match &self.name {
            Some(name) => e.at(name),
            None => e,
        })
    }

    fn load_chain(&self, raw: &Value) -> MapperResult<Value> {
        let mut value = raw.clone();
        for constraint in &self.constraints {
            match constraint {
                Constraint::Elements(elem) => value = load_elements(&value, elem)?,
                Constraint::Conforms(schema) if !matches!(value, Value::Instance(_)) => {
                    value = Value::Instance(schema.load(&value)?);
                }
                other => other.check(&value)?,
            }
        }
        Ok(value)
    }

    /// Plain JSON rendering of a value held by this field
    pub fn json_encode(&self, value: &Value) -> serde_json::Value {
        match (&self.kind, value) {
            (FieldKind::Array(elem), Value::List(items)) => {
                serde_json::Value::Array(items.iter().map(|item| elem.json_encode(item)).collect())
            }
            (FieldKind::Dict(elem), Value::Object(pairs)) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(key, item)| (key.clone(), elem.json_encode(item)))
                    .collect(),
            ),
            (FieldKind::Object(_), Value::Instance(instance)) => instance.json_equivalent(),
            _ => to_json(value),
        }
    }

    fn attribute(&self, err: ConstraintError) -> ConstraintError {
        match &self.name {
            Some(name) => err.at(name),
            None => err,
        }
    }
}

fn load_elements(value: &Value, elem: &FieldDescriptor) -> MapperResult<Value> {
    match value {
        Value::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| elem.load(item).map_err(|e| e.at(&format!("[{}]", i))))
            .collect::<MapperResult<Vec<_>>>()
            .map(Value::List),
        Value::Object(pairs) => pairs
            .iter()
            .map(|(key, item)| {
                elem.load(item)
                    .map(|loaded| (key.clone(), loaded))
                    .map_err(|e| e.at(key))
            })
            .collect::<MapperResult<Vec<_>>>()
            .map(Value::Object),
        _ => Err(MapperError::Constraint(ConstraintError::type_error(format!(
            "Value {} has no elements",
            value
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{custom_error, ConstraintKind};

    #[test]
    fn test_integer_field() {
        let f = FieldDescriptor::integer();

        assert!(f.validate(&Value::Int(1)).is_ok());
        assert!(f.validate(&Value::Float(1.0)).is_ok());
        assert!(f.validate(&Value::from("")).is_err());
        assert!(f.validate(&Value::Float(1.1)).is_err());

        assert_eq!(f.load(&Value::Int(10)).unwrap(), Value::Int(10));
        assert_eq!(f.load(&Value::Float(11.0)).unwrap(), Value::Float(11.0));
        assert!(f.load(&Value::Float(1.21)).is_err());
        assert!(!f.has_default());
    }

    #[test]
    fn test_integer_field_bounds_and_default() {
        let f = FieldDescriptor::integer().min_val(0).max_val(10).default(1);

        assert_eq!(f.default_value(), Some(&Value::Int(1)));
        assert!(f.validate(&Value::Int(2)).is_ok());
        assert!(f.validate(&Value::Int(0)).is_ok());
        assert!(f.validate(&Value::Int(10)).is_ok());
        assert!(f.validate(&Value::Int(-1)).is_err());
        assert!(f.validate(&Value::Int(11)).is_err());

        assert_eq!(f.load(&Value::Int(5)).unwrap(), Value::Int(5));
        assert!(f.load(&Value::Int(-1)).is_err());
        assert!(f.load(&Value::Int(11)).is_err());
    }

    #[test]
    fn test_null_default_differs_from_no_default() {
        let f = FieldDescriptor::any().default(Value::Null);
        assert!(f.has_default());
        assert_eq!(f.default_value(), Some(&Value::Null));
    }

    #[test]
    fn test_string_field() {
        let f = FieldDescriptor::string();
        assert!(f.validate(&Value::from("")).is_ok());
        assert!(f.validate(&Value::bytes(b"")).is_ok());
        assert!(f.validate(&Value::from("Hello, World!")).is_ok());
        assert!(f.validate(&Value::Int(1)).is_err());

        let f = FieldDescriptor::string().allow_unicode(false);
        assert!(f.validate(&Value::bytes(b"")).is_ok());
        assert!(f.validate(&Value::bytes(b"Hello, World!")).is_ok());
        assert!(f.validate(&Value::from("")).is_err());
        assert!(f.validate(&Value::from("Hello, World!")).is_err());
    }

    #[test]
    fn test_string_length() {
        let f = FieldDescriptor::string().default(" ").max_len(5).min_len(1);

        assert_eq!(f.default_value(), Some(&Value::from(" ")));
        assert!(f.validate(&Value::from("")).is_err());
        for s in ["1", "12", "123", "1234", "12345"] {
            assert!(f.validate(&Value::from(s)).is_ok(), "{s} should pass");
        }
        assert!(f.validate(&Value::from("123456")).is_err());
    }

    #[test]
    fn test_array_field() {
        let f = FieldDescriptor::array(FieldDescriptor::integer());

        assert!(f.validate(&Value::List(vec![1.into(), 2.into(), 3.into()])).is_ok());
        assert!(f.validate(&Value::List(vec![])).is_ok());
        assert!(f.validate(&Value::List(vec![1.into(), 2.into(), "3".into()])).is_err());
        assert!(f.validate(&Value::List(vec!["1".into(), 2.into(), 3.into()])).is_err());
    }

    #[test]
    fn test_array_field_with_bounds() {
        let f = FieldDescriptor::array(FieldDescriptor::numeric().min_val(0.0).max_val(1.0))
            .min_len(1)
            .max_len(3);

        assert!(f.validate(&Value::List(vec![0.into()])).is_ok());
        assert!(f
            .validate(&Value::List(vec![0.0.into(), 0.5.into(), 1.0.into()]))
            .is_ok());

        assert!(f.validate(&Value::List(vec![(-1).into()])).is_err());
        assert!(f.validate(&Value::List(vec![1.1.into()])).is_err());
        assert!(f.validate(&Value::List(vec![])).is_err());
        assert!(f
            .validate(&Value::List(vec![0.into(), 1.into(), 2.into(), 3.into()]))
            .is_err());
        assert!(f
            .validate(&Value::Object(vec![("a".into(), 1.into())]))
            .is_err());
    }

    #[test]
    fn test_array_element_error_path() {
        let f = FieldDescriptor::array(FieldDescriptor::integer()).attach("scores");
        let err = f
            .validate(&Value::List(vec![1.into(), 2.5.into()]))
            .unwrap_err();
        assert_eq!(err.path, "scores[1]");
        assert_eq!(err.kind, ConstraintKind::Integral);
    }

    #[test]
    fn test_dict_field() {
        let f = FieldDescriptor::dict(FieldDescriptor::integer());
        let good = Value::Object(vec![("a".into(), 1.into()), ("b".into(), 2.into())]);
        assert!(f.validate(&good).is_ok());

        let bad = Value::Object(vec![("a".into(), 1.into()), ("b".into(), "x".into())]);
        let err = f.validate(&bad).unwrap_err();
        assert_eq!(err.path, "b");

        assert!(f.validate(&Value::List(vec![])).is_err());
    }

    #[test]
    fn test_dict_length_bounds() {
        let f = FieldDescriptor::dict(FieldDescriptor::any()).max_len(1);
        assert!(f.validate(&Value::Object(vec![("a".into(), 1.into())])).is_ok());
        assert!(f
            .validate(&Value::Object(vec![
                ("a".into(), 1.into()),
                ("b".into(), 2.into())
            ]))
            .is_err());
    }

    #[test]
    fn test_validator() {
        let f = FieldDescriptor::any().validator(|value: &Value| {
            if *value == Value::Int(42) {
                return Err(custom_error(
                    "You can't just throw the meaning of life the universe and everything around",
                ));
            }
            Ok(())
        });

        assert!(f.validate(&Value::Float(1.0)).is_ok());
        assert_eq!(
            f.validate(&Value::Int(42)).unwrap_err().kind,
            ConstraintKind::Custom
        );
        assert_eq!(f.load(&Value::Float(1.21)).unwrap(), Value::Float(1.21));
        assert!(f.load(&Value::Int(42)).is_err());
    }

    #[test]
    fn test_chain_order_is_canonical() {
        let f = FieldDescriptor::integer()
            .validator(|_: &Value| Ok::<(), ConstraintError>(()))
            .max_val(10)
            .min_val(0);
        let names: Vec<String> = f.constraints().iter().map(|c| format!("{:?}", c)).collect();
        assert_eq!(
            names,
            vec!["Numeric", "Integral", "MinValue(0)", "MaxValue(10)", "Custom(custom)"]
        );
    }

    #[test]
    fn test_fail_fast_reports_first_error() {
        let f = FieldDescriptor::integer()
            .min_val(0)
            .validator(|_: &Value| -> ConstraintResult<()> { Err(custom_error("never reached")) });
        let err = f.validate(&Value::Float(-1.5)).unwrap_err();
        assert_eq!(err.kind, ConstraintKind::Integral);
    }

    #[test]
    fn test_json_encode_scalars_pass_through() {
        let f = FieldDescriptor::array(FieldDescriptor::string());
        let value = Value::List(vec!["a".into(), Value::bytes(b"b")]);
        assert_eq!(f.json_encode(&value), serde_json::json!(["a", "b"]));
        assert_eq!(
            FieldDescriptor::integer().json_encode(&Value::Int(4)),
            serde_json::json!(4)
        );
    }

    #[test]
    fn test_options_outside_kind_are_recorded_not_compiled() {
        let f = FieldDescriptor::string().min_val(0);
        assert!(f.validate(&Value::from("a")).is_ok());
        assert_eq!(f.unsupported_option(), Some(("min_val", "string")));

        let f = FieldDescriptor::integer().allow_unicode(false);
        assert_eq!(f.unsupported_option(), Some(("allow_unicode", "integer")));
        assert_eq!(f.constraints().len(), 2);

        let f = FieldDescriptor::any().max_len(3).max_val(1);
        assert_eq!(f.unsupported_option(), Some(("max_len", "any")));
        assert!(f.constraints().is_empty());
    }

    #[test]
    fn test_element_options_are_checked() {
        let f = FieldDescriptor::dict(FieldDescriptor::numeric().min_len(1));
        assert_eq!(f.unsupported_option(), Some(("min_len", "numeric")));

        let f = FieldDescriptor::array(FieldDescriptor::string().max_len(4))
            .min_len(1)
            .default(Value::List(vec![]));
        assert_eq!(f.unsupported_option(), None);
    }

    #[test]
    fn test_unattached_name_is_none() {
        assert!(FieldDescriptor::string().name().is_none());
        assert_eq!(FieldDescriptor::string().attach("title").name(), Some("title"));
    }
}
