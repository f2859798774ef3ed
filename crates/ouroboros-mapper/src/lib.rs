//! Ouroboros Mapper
//!
//! Declarative schemas that map decoded JSON-like trees onto validated
//! objects.
//!
//! A [`Schema`] is an ordered set of named [`FieldDescriptor`]s. Each
//! descriptor owns a fail-fast chain of [`Constraint`]s (type, integral,
//! bounds, element shape, user validators) and an optional default.
//! [`Schema::load`] reconciles a raw mapping against the schema, recursing
//! into nested schemas through object, array and dict fields, and produces an
//! [`Instance`]. [`Schema::construct`] builds instances from positional and
//! keyword arguments instead.
//!
//! # Example
//!
//! ```rust
//! use ouroboros_mapper::{FieldDescriptor, Schema, Value};
//! use serde_json::json;
//!
//! let point = Schema::builder("Point")
//!     .field("x", FieldDescriptor::integer())
//!     .field("y", FieldDescriptor::integer().default(0))
//!     .build()
//!     .unwrap();
//!
//! let path = Schema::builder("Path")
//!     .field("name", FieldDescriptor::string().max_len(32))
//!     .field("points", FieldDescriptor::array(FieldDescriptor::object(point)).min_len(1))
//!     .build()
//!     .unwrap();
//!
//! let raw = json!({"name": "diagonal", "points": [{"x": 0, "y": 0}, {"x": 1, "y": 1}]});
//! let loaded = path.load(&Value::from(raw.clone())).unwrap();
//!
//! assert_eq!(loaded.get_list("points").unwrap().len(), 2);
//! assert_eq!(loaded.json_equivalent(), raw);
//! ```

// Public modules
pub mod config;
pub mod constraints;
pub mod errors;
pub mod fields;
pub mod instance;
pub mod schema;
pub mod types;

// Re-export commonly used types
pub use config::{ExtraFields, SchemaConfig};
pub use constraints::{BoxedValidator, Constraint, Validator};
pub use errors::{
    custom_error, ConstraintError, ConstraintKind, ConstraintResult, MapperError, MapperResult,
    SchemaError,
};
pub use fields::{FieldDescriptor, FieldKind};
pub use instance::Instance;
pub use schema::{Args, Schema, SchemaBuilder};
pub use types::{Number, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_schema_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schema>();
        assert_send_sync::<FieldDescriptor>();
        assert_send_sync::<Instance>();
    }
}
