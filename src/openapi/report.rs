//! Human-readable API report rendering.
//!
//! Renders a resolved document as an indented text report: operations
//! grouped by their first tag, parameter lines, request/response schema
//! structure listings and synthesized example payloads.

use std::collections::HashSet;
use std::fmt::Write;

use serde_json::{Map, Value};

use crate::openapi::document::ApiDocument;
use crate::openapi::example::synthesize_example;
use crate::openapi::operations::{extract_operations, OperationSummary};

/// Render the full report for a (preferably resolved) document.
pub fn render_api_info(doc: &ApiDocument) -> String {
    let mut out = String::new();
    let definitions = doc.definitions();

    let _ = writeln!(out, "======== API document ========");
    let _ = writeln!(out, "Title: {}", doc.title().unwrap_or("unknown"));
    let _ = writeln!(out, "Version: {}", doc.version().unwrap_or("unknown"));
    let _ = writeln!(
        out,
        "Description: {}",
        doc.description().unwrap_or("no description")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "======== Operations ========");

    let operations = extract_operations(doc);
    if operations.is_empty() {
        let _ = writeln!(out, "No operations found");
        return out;
    }

    // Group by first tag, de-duplicating repeated operations, keeping
    // encounter order for both tags and members.
    let mut seen = HashSet::new();
    let mut groups: Vec<(&str, Vec<&OperationSummary>)> = Vec::new();
    for op in &operations {
        let key = format!("{}:{}:{}", op.method, op.path, op.operation_id);
        if !seen.insert(key) {
            continue;
        }
        let Some(tag) = op.tags.first() else {
            continue;
        };
        match groups.iter_mut().find(|(t, _)| *t == tag.as_str()) {
            Some((_, members)) => members.push(op),
            None => groups.push((tag.as_str(), vec![op])),
        }
    }

    for (tag, members) in &groups {
        let _ = writeln!(out, "\n=== {tag} ===\n");
        for op in members {
            render_operation(&mut out, op, &definitions);
        }
    }

    out
}

fn render_operation(out: &mut String, op: &OperationSummary, definitions: &Map<String, Value>) {
    let _ = writeln!(out, "{} {}", op.method, op.path);
    if !op.summary.is_empty() {
        let _ = writeln!(out, "Summary: {}", op.summary);
    }
    if !op.description.is_empty() {
        let _ = writeln!(out, "Description: {}", op.description);
    }
    if !op.operation_id.is_empty() {
        let _ = writeln!(out, "Operation ID: {}", op.operation_id);
    }

    if !op.parameters.is_empty() {
        let _ = writeln!(out, "\nParameters:");
        for param in &op.parameters {
            let required = if param.required { "required" } else { "optional" };
            let description = if param.description.is_empty() {
                "no description"
            } else {
                &param.description
            };
            let _ = writeln!(
                out,
                "  - {} ({}, {}, type: {}): {}",
                param.name, param.location, required, param.param_type, description
            );
            if param.location == "body" {
                render_named_schema(out, &param.schema, definitions, "    ");
            }
        }
    }

    if let Some(body) = &op.request_body {
        let _ = writeln!(out, "\nRequest body:");
        let required = if body.get("required").and_then(Value::as_bool).unwrap_or(false) {
            "required"
        } else {
            "optional"
        };
        let description = body
            .get("description")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .unwrap_or("no description");
        let _ = writeln!(out, "  Description: {description} ({required})");

        if let Some(content) = body.get("content").and_then(Value::as_object) {
            for (media_type, media) in content {
                let _ = writeln!(out, "  Content type: {media_type}");
                if let Some(schema) = media.get("schema") {
                    render_named_schema(out, schema, definitions, "  ");
                    render_example(out, "Request example", schema, definitions, "  ");
                }
            }
        }
    }

    if !op.responses.is_empty() {
        let _ = writeln!(out, "\nResponses:");
        for (status, response) in &op.responses {
            let description = response
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("no description");
            let _ = writeln!(out, "  - {status}: {description}");

            // Swagger 2.0 keeps the schema on the response itself,
            // OpenAPI 3 nests it under content.<media-type>.
            if let Some(schema) = response.get("schema") {
                render_named_schema(out, schema, definitions, "    ");
                render_example(out, "Response example", schema, definitions, "    ");
            } else if let Some(content) = response.get("content").and_then(Value::as_object) {
                for (media_type, media) in content {
                    let _ = writeln!(out, "    Content type: {media_type}");
                    if let Some(schema) = media.get("schema") {
                        render_named_schema(out, schema, definitions, "    ");
                        render_example(out, "Response example", schema, definitions, "    ");
                    }
                }
            }
        }
    }

    let _ = writeln!(out, "----------------------------");
}

/// Print a schema structure, resolving one level of `$ref` by name so
/// unresolved documents still render something useful.
fn render_named_schema(
    out: &mut String,
    schema: &Value,
    definitions: &Map<String, Value>,
    indent: &str,
) {
    if let Some(ref_str) = schema.get("$ref").and_then(Value::as_str) {
        let name = ref_str.rsplit('/').next().unwrap_or(ref_str);
        if let Some(definition) = definitions.get(name) {
            let _ = writeln!(out, "{indent}Structure: {name}");
            render_schema_structure(out, definition, indent);
        }
        return;
    }
    render_schema_structure(out, schema, indent);
}

/// Indented property/type/required/description lines for a schema.
fn render_schema_structure(out: &mut String, schema: &Value, indent: &str) {
    let schema_type = schema.get("type").and_then(Value::as_str).unwrap_or("object");
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    match schema_type {
        "object" => {
            let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
                return;
            };
            for (name, prop) in properties {
                let prop_type = prop.get("type").and_then(Value::as_str).unwrap_or("object");
                let requiredness = if required.contains(&name.as_str()) {
                    "required"
                } else {
                    "optional"
                };
                let description = prop
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{indent}- {name} ({prop_type}, {requiredness}): {description}"
                );

                if prop_type == "object" && prop.get("properties").is_some() {
                    render_schema_structure(out, prop, &format!("{indent}  "));
                } else if prop_type == "array" {
                    if let Some(items) = prop.get("items") {
                        render_items(out, items, &format!("{indent}  "));
                    }
                }
            }
        }
        "array" => {
            if let Some(items) = schema.get("items") {
                render_items(out, items, indent);
            }
        }
        _ => {}
    }
}

fn render_items(out: &mut String, items: &Value, indent: &str) {
    let items_type = items.get("type").and_then(Value::as_str).unwrap_or("object");
    let _ = writeln!(out, "{indent}Array item type: {items_type}");
    if items_type == "object" && items.get("properties").is_some() {
        render_schema_structure(out, items, &format!("{indent}  "));
    }
}

fn render_example(
    out: &mut String,
    label: &str,
    schema: &Value,
    definitions: &Map<String, Value>,
    indent: &str,
) {
    let example = synthesize_example(schema, definitions);
    if !is_displayable(&example) {
        return;
    }
    let _ = writeln!(out, "{indent}{label}:");
    let pretty = serde_json::to_string_pretty(&example).unwrap_or_default();
    for line in pretty.lines() {
        let _ = writeln!(out, "{indent}  {line}");
    }
}

fn is_displayable(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        _ => true,
    }
}
