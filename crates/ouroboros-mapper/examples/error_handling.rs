//! Error Handling Example
//!
//! Shows the error kinds raised by loading and construction.
//!
//! Run with:
//! ```bash
//! cargo run -p ouroboros-mapper --example error_handling
//! ```

use ouroboros_mapper::{Args, FieldDescriptor, MapperError, Schema, Value};
use serde_json::json;

fn describe(result: Result<ouroboros_mapper::Instance, MapperError>) {
    match result {
        Ok(instance) => println!("  ok: {}", instance.json_equivalent()),
        Err(MapperError::Constraint(e)) => {
            println!("  constraint [{}] at '{}': {}", e.kind, e.path, e.message)
        }
        Err(e) if e.is_missing_required() => println!("  missing: {}", e),
        Err(e) => println!("  other: {}", e),
    }
}

fn main() -> anyhow::Result<()> {
    println!("Error Handling Example");
    println!("======================\n");

    let point = Schema::builder("Point")
        .field("x", FieldDescriptor::integer())
        .field("y", FieldDescriptor::integer().default(0))
        .build()?;
    let shape = Schema::builder("Shape")
        .field(
            "points",
            FieldDescriptor::array(FieldDescriptor::object(point.clone())).min_len(1),
        )
        .build()?;

    println!("1. Load errors");
    describe(shape.load(&Value::from(json!({"points": [{"x": 1}, {"x": 1.5}]}))));
    describe(shape.load(&Value::from(json!({"points": [{"y": 1}]}))));
    describe(shape.load(&Value::from(json!({"points": [], "closed": true}))));
    describe(shape.load(&Value::from(json!({"points": [{"x": 1, "z": 2}]}))));
    println!();

    println!("2. Construction errors");
    describe(point.construct(Args::new().arg(1).arg(2).arg(3)));
    describe(point.construct(Args::new().kwarg("y", 2)));
    describe(point.construct(Args::new().arg(1).kwarg("z", 2)));

    Ok(())
}
