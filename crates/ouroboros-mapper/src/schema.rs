//! Schemas: ordered, named field descriptors bound to one object type
//!
//! A schema is declared once through [`SchemaBuilder`] and is immutable
//! afterwards. [`Schema`] is a cheap handle; clones share the same
//! declaration and can be used from any thread.
//!
//! # Example
//!
//! ```rust
//! use ouroboros_mapper::{FieldDescriptor, MapperError, Schema, Value};
//! use serde_json::json;
//!
//! let schema = Schema::builder("S")
//!     .field("a", FieldDescriptor::integer().min_val(0).max_val(10).default(1))
//!     .field("b", FieldDescriptor::string())
//!     .build()
//!     .unwrap();
//!
//! let obj = schema.load(&Value::from(json!({"b": "hi"}))).unwrap();
//! assert_eq!(obj.get_int("a"), Some(1));
//! assert_eq!(obj.get_str("b"), Some("hi"));
//!
//! let err = schema.load(&Value::from(json!({"b": "hi", "c": 1}))).unwrap_err();
//! assert!(matches!(err, MapperError::ExcessField { .. }));
//! ```

use crate::config::{ExtraFields, SchemaConfig};
use crate::errors::{ConstraintError, MapperError, MapperResult, SchemaError};
use crate::fields::FieldDescriptor;
use crate::instance::Instance;
use crate::types::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// Schema
// ============================================================================

struct SchemaDef {
    name: String,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
    config: SchemaConfig,
}

/// Shared handle to an immutable schema declaration
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaDef>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.inner.name)
            .field("fields", &self.inner.fields)
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Two handles are equal when they point at the same declaration
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Schema {
    /// Start declaring a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Declared schema name
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.inner.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.position(name).map(|i| &self.inner.fields[i])
    }

    /// Declaration index of a field
    pub fn position(&self, name: &str) -> Option<usize> {
        self.inner.index.get(name).copied()
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.inner.fields.iter().map(|f| f.name().unwrap_or_default())
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    /// Check if the schema declares no fields
    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Load behavior settings
    pub fn config(&self) -> &SchemaConfig {
        &self.inner.config
    }

    // ========================================================================
    // Structural load
    // ========================================================================

    /// Build an instance from a raw mapping
    ///
    /// Fields are visited in declaration order: a present key is loaded
    /// through its descriptor, an absent one falls back to the default, and
    /// a required field without either fails with
    /// [`MapperError::MissingField`]. Unknown keys are checked only after
    /// every field was handled.
    pub fn load(&self, raw: &Value) -> MapperResult<Instance> {
        let pairs = match raw {
            Value::Object(pairs) => pairs,
            _ => {
                return Err(ConstraintError::type_error(format!(
                    "Expected mapping for '{}', got {}",
                    self.name(),
                    raw.type_name()
                ))
                .into())
            }
        };

        trace!(schema = %self.name(), keys = pairs.len(), "loading");

        let mut values = Vec::with_capacity(self.len());
        for field in self.fields() {
            let name = field.name().unwrap_or_default();
            match raw.get(name) {
                Some(value) => values.push(field.load(value)?),
                None => match field.default_value() {
                    Some(default) => {
                        trace!(schema = %self.name(), field = name, "using default");
                        values.push(default.clone());
                    }
                    None => return Err(MapperError::missing_field(name)),
                },
            }
        }

        for (key, _) in pairs {
            if self.position(key).is_none() {
                match self.inner.config.extra {
                    ExtraFields::Forbid => return Err(MapperError::excess_field(key)),
                    ExtraFields::Ignore => {
                        debug!(schema = %self.name(), key = %key, "ignoring excess element");
                    }
                }
            }
        }

        Ok(Instance::from_parts(self.clone(), values))
    }

    // ========================================================================
    // Direct construction
    // ========================================================================

    /// Build an instance from positional and keyword arguments
    ///
    /// Positional values bind to fields in declaration order; a keyword for
    /// the same field overrides the positional value. Every supplied value
    /// is validated. Fields left unbound take their default.
    pub fn construct(&self, args: Args) -> MapperResult<Instance> {
        let Args {
            positional,
            mut keywords,
        } = args;

        if positional.len() > self.len() {
            return Err(MapperError::Arity {
                schema: self.name().to_string(),
                given: positional.len(),
                expected: self.len(),
            });
        }

        let mut positional = positional.into_iter();
        let mut values = Vec::with_capacity(self.len());

        for field in self.fields() {
            let name = field.name().unwrap_or_default();

            let mut slot = match positional.next() {
                Some(value) => {
                    field.validate(&value)?;
                    Some(value)
                }
                None => None,
            };

            if let Some(idx) = keywords.iter().position(|(k, _)| k == name) {
                let (_, value) = keywords.remove(idx);
                field.validate(&value)?;
                slot = Some(value);
            }

            let value = match slot {
                Some(value) => value,
                None => match field.default_value() {
                    Some(default) => default.clone(),
                    None => {
                        return Err(MapperError::MissingValue {
                            field: name.to_string(),
                        })
                    }
                },
            };
            values.push(value);
        }

        if let Some((keyword, _)) = keywords.into_iter().next() {
            return Err(MapperError::UnexpectedKeyword {
                schema: self.name().to_string(),
                keyword,
            });
        }

        Ok(Instance::from_parts(self.clone(), values))
    }
}

// ============================================================================
// Schema Builder
// ============================================================================

/// Declares a schema's fields in order
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, FieldDescriptor)>,
    config: SchemaConfig,
}

impl SchemaBuilder {
    /// Start an empty declaration named `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            config: SchemaConfig::default(),
        }
    }

    /// Attach a field under `name`
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
        self.fields.push((name.into(), field));
        self
    }

    /// Replace the load behavior settings
    #[must_use]
    pub fn config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    /// Finish the declaration
    ///
    /// Fails on empty or duplicate field names, on options a field's kind
    /// does not take, and on invalid defaults when `validate_defaults` is set.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut index = HashMap::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());

        for (name, field) in self.fields {
            if name.is_empty() {
                return Err(SchemaError::EmptyFieldName { schema: self.name });
            }
            if index.contains_key(&name) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name,
                    field: name,
                });
            }

            if let Some((option, kind)) = field.unsupported_option() {
                return Err(SchemaError::InvalidOption {
                    schema: self.name,
                    field: name,
                    option: option.to_string(),
                    kind: kind.to_string(),
                });
            }

            let field = field.attach(&name);
            if self.config.validate_defaults {
                if let Some(default) = field.default_value() {
                    if let Err(source) = field.validate(default) {
                        return Err(SchemaError::InvalidDefault {
                            schema: self.name,
                            field: name,
                            source,
                        });
                    }
                }
            }

            index.insert(name, fields.len());
            fields.push(field);
        }

        debug!(schema = %self.name, fields = fields.len(), "schema declared");

        Ok(Schema {
            inner: Arc::new(SchemaDef {
                name: self.name,
                fields,
                index,
                config: self.config,
            }),
        })
    }
}

// ============================================================================
// Construction Arguments
// ============================================================================

/// Positional and keyword arguments for [`Schema::construct`]
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    keywords: Vec<(String, Value)>,
}

impl Args {
    /// Empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument; repeating a keyword replaces its value
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.keywords.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.keywords.push((name, value)),
        }
        self
    }

    /// Positional arguments in order
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments in first-given order
    pub fn keywords(&self) -> &[(String, Value)] {
        &self.keywords
    }
}
