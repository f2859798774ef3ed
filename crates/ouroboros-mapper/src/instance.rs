//! Loadable objects
//!
//! An [`Instance`] holds one validated value per field of its schema, stored
//! in declaration order and looked up by name.

use crate::schema::Schema;
use crate::types::Value;
use serde::{Serialize, Serializer};

/// A constructed object conforming to a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    schema: Schema,
    values: Vec<Value>,
}

impl Instance {
    pub(crate) fn from_parts(schema: Schema, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// The schema this object was built from
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).and_then(|i| self.values.get(i))
    }

    /// `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema.field_names().zip(self.values.iter())
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    /// Integer field value; integral floats convert
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.is_finite() && f.trunc() == *f => Some(*f as i64),
            _ => None,
        }
    }

    /// Numeric field value as f64
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_number().map(|n| n.as_f64())
    }

    /// Text field value; byte strings are returned when valid UTF-8
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::String(s) => Some(s),
            Value::Bytes(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Boolean field value
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Nested object held by an object field
    pub fn get_instance(&self, name: &str) -> Option<&Instance> {
        match self.get(name)? {
            Value::Instance(instance) => Some(instance),
            _ => None,
        }
    }

    /// List field value
    pub fn get_list(&self, name: &str) -> Option<&[Value]> {
        match self.get(name)? {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    // ========================================================================
    // JSON output
    // ========================================================================

    /// Plain JSON mapping of field names to encoded values
    ///
    /// Each value is encoded by its own field descriptor, so nested objects
    /// and containers of objects recurse.
    pub fn json_equivalent(&self) -> serde_json::Value {
        let map = self
            .schema
            .fields()
            .iter()
            .zip(self.values.iter())
            .map(|(field, value)| {
                (
                    field.name().unwrap_or_default().to_string(),
                    field.json_encode(value),
                )
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.json_equivalent().serialize(serializer)
    }
}
