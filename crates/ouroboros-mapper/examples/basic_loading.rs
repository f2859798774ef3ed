//! Basic Loading Example
//!
//! Declares two schemas, loads a nested document and prints its JSON
//! equivalent.
//!
//! Run with:
//! ```bash
//! RUST_LOG=trace cargo run -p ouroboros-mapper --example basic_loading
//! ```

use ouroboros_mapper::{Args, FieldDescriptor, Schema, Value};
use serde_json::json;

/// Initialize logging, preferring RUST_LOG over the given level
fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .ok();
}

fn main() -> anyhow::Result<()> {
    init_logging("debug");

    println!("Basic Loading Example");
    println!("=====================\n");

    let limits = Schema::builder("Limits")
        .field("cpu", FieldDescriptor::numeric().min_val(0.1).max_val(64.0))
        .field("memory_mb", FieldDescriptor::integer().min_val(16).default(256))
        .build()?;

    let service = Schema::builder("Service")
        .field("name", FieldDescriptor::string().min_len(1).max_len(63))
        .field("replicas", FieldDescriptor::integer().min_val(0).default(1))
        .field("limits", FieldDescriptor::object(limits.clone()))
        .field(
            "ports",
            FieldDescriptor::array(FieldDescriptor::integer().min_val(1).max_val(65535)),
        )
        .field(
            "labels",
            FieldDescriptor::dict(FieldDescriptor::string()).default(Value::Object(vec![])),
        )
        .build()?;

    // 1. Structural load
    println!("1. Structural load");
    let raw = json!({
        "name": "api",
        "limits": {"cpu": 0.5},
        "ports": [80, 443]
    });
    let api = service.load(&Value::from(raw))?;
    println!("  replicas (default): {:?}", api.get_int("replicas"));
    println!(
        "  limits.memory_mb (default): {:?}",
        api.get_instance("limits").and_then(|l| l.get_int("memory_mb"))
    );
    println!("  json: {}\n", serde_json::to_string(&api)?);

    // 2. Direct construction
    println!("2. Direct construction");
    let small = limits.construct(Args::new().arg(0.25).kwarg("memory_mb", 64))?;
    let worker = service.construct(
        Args::new()
            .arg("worker")
            .arg(3)
            .arg(small)
            .arg(Value::List(vec![])),
    )?;
    println!("  json: {}\n", worker.json_equivalent());

    // 3. Rejected input
    println!("3. Rejected input");
    let bad = json!({"name": "api", "limits": {"cpu": 0.5}, "ports": [80, 70000]});
    match service.load(&Value::from(bad)) {
        Ok(_) => println!("  unexpected success"),
        Err(e) => println!("  error: {}", e),
    }

    Ok(())
}
