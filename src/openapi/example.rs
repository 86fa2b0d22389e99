//! Example payload synthesis.
//!
//! Produces a deterministic, illustrative value for a schema node:
//! literal `example`/`examples` entries win over everything, then the
//! declared type drives a fixed fallback. References are expanded
//! against the definitions map, with an in-progress set guarding
//! against cyclic schemas.

use std::collections::HashSet;

use serde_json::{json, Map, Value};

/// Synthesize an example value for `schema`. Returns `Value::Null` when
/// no example can be produced (unrecognized type, empty schema node).
pub fn synthesize_example(schema: &Value, definitions: &Map<String, Value>) -> Value {
    let mut in_progress = HashSet::new();
    synthesize(schema, definitions, &mut in_progress)
}

fn synthesize(
    schema: &Value,
    definitions: &Map<String, Value>,
    in_progress: &mut HashSet<String>,
) -> Value {
    // Nothing to work with: no example at all
    if schema.is_null() || schema.as_object().is_some_and(Map::is_empty) {
        return Value::Null;
    }

    if let Some(ref_str) = schema.get("$ref").and_then(Value::as_str) {
        if in_progress.contains(ref_str) {
            // Cycle: stop expanding and leave a marker instead
            return json!({"$ref": ref_str});
        }
        let name = ref_str.rsplit('/').next().unwrap_or(ref_str);
        let Some(definition) = definitions.get(name) else {
            return json!({"$ref": name});
        };
        in_progress.insert(ref_str.to_string());
        let example = synthesize(definition, definitions, in_progress);
        in_progress.remove(ref_str);
        return example;
    }

    // A literal sample beats type-driven synthesis, whatever the type says.
    if let Some(literal) = literal_example(schema) {
        return literal;
    }

    let schema_type = schema.get("type").and_then(Value::as_str).unwrap_or("object");
    match schema_type {
        "object" => {
            let mut result = Map::new();
            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                for (name, prop) in properties {
                    let value = literal_example(prop)
                        .unwrap_or_else(|| synthesize(prop, definitions, in_progress));
                    result.insert(name.clone(), value);
                }
            }
            Value::Object(result)
        }
        "array" => {
            let items = schema.get("items").unwrap_or(&Value::Null);
            let item_example = synthesize(items, definitions, in_progress);
            if item_example.is_null() {
                json!([])
            } else {
                json!([item_example])
            }
        }
        "string" => {
            if let Some(first) = schema
                .get("enum")
                .and_then(Value::as_array)
                .and_then(|e| e.first())
            {
                return first.clone();
            }
            match schema.get("format").and_then(Value::as_str) {
                Some("date-time") => json!("2023-01-01T00:00:00Z"),
                Some("date") => json!("2023-01-01"),
                _ => json!("string"),
            }
        }
        "integer" | "number" => match schema.get("format").and_then(Value::as_str) {
            Some("float") | Some("double") => json!(0.0),
            _ => json!(0),
        },
        "boolean" => json!(false),
        _ => Value::Null,
    }
}

fn literal_example(schema: &Value) -> Option<Value> {
    if let Some(first) = schema
        .get("examples")
        .and_then(Value::as_array)
        .and_then(|e| e.first())
    {
        return Some(first.clone());
    }
    schema.get("example").cloned()
}
