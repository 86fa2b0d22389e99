//! `$ref` resolution over a normalized document.
//!
//! Resolution is total: it never fails the document. A reference to an
//! unknown definition degrades to an empty schema, and re-entering a
//! reference that is already being expanded (a cycle of any depth)
//! substitutes a placeholder object. Both degradations only warn.
//!
//! The caller's document is never mutated; resolution works on a clone.

use std::collections::HashSet;

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::openapi::document::{definitions_of, ApiDocument, SpecFlavor};
use crate::openapi::operations::HttpMethod;

/// Placeholder substituted where following a reference would loop.
fn cycle_placeholder() -> Value {
    json!({"type": "object", "description": "self-referencing object"})
}

/// Return a copy of the document with every reachable schema reference
/// replaced by its resolved structural content.
///
/// References are resolved in three positions per operation: parameter
/// schemas, OpenAPI-3 request body content schemas, and response schemas
/// (`schema` for Swagger 2.0, `content.*.schema` for OpenAPI 3).
pub fn resolve(doc: &ApiDocument) -> ApiDocument {
    let mut api = doc.json().clone();
    let definitions = definitions_of(&api);
    let is_openapi3 = doc.flavor() == SpecFlavor::OpenApi3;

    if let Some(paths) = api.get_mut("paths").and_then(Value::as_object_mut) {
        for (path, path_item) in paths.iter_mut() {
            let Some(path_item) = path_item.as_object_mut() else {
                continue;
            };
            for method in HttpMethod::all() {
                let Some(operation) = path_item
                    .get_mut(method.as_str())
                    .and_then(Value::as_object_mut)
                else {
                    continue;
                };
                tracing::debug!(path = %path, method = %method, "resolving operation references");
                resolve_operation(operation, &definitions, is_openapi3);
            }
        }
    }

    ApiDocument::from_parts(api, doc.flavor())
}

fn resolve_operation(
    operation: &mut Map<String, Value>,
    definitions: &Map<String, Value>,
    is_openapi3: bool,
) {
    if let Some(params) = operation.get_mut("parameters").and_then(Value::as_array_mut) {
        for param in params {
            if let Some(schema) = param.get_mut("schema") {
                resolve_in_place(schema, definitions);
            }
        }
    }

    if is_openapi3 {
        if let Some(content) = operation
            .get_mut("requestBody")
            .and_then(|rb| rb.get_mut("content"))
            .and_then(Value::as_object_mut)
        {
            for media in content.values_mut() {
                if let Some(schema) = media.get_mut("schema") {
                    resolve_in_place(schema, definitions);
                }
            }
        }
    }

    if let Some(responses) = operation.get_mut("responses").and_then(Value::as_object_mut) {
        for response in responses.values_mut() {
            if is_openapi3 {
                if let Some(content) = response.get_mut("content").and_then(Value::as_object_mut) {
                    for media in content.values_mut() {
                        if let Some(schema) = media.get_mut("schema") {
                            resolve_in_place(schema, definitions);
                        }
                    }
                }
            } else if let Some(schema) = response.get_mut("schema") {
                resolve_in_place(schema, definitions);
            }
        }
    }
}

/// Replace `node` with its resolved content when it is a reference.
fn resolve_in_place(node: &mut Value, definitions: &Map<String, Value>) {
    if let Some(ref_str) = node.get("$ref").and_then(Value::as_str) {
        let ref_str = ref_str.to_string();
        let mut in_progress = HashSet::new();
        *node = resolve_ref(&ref_str, definitions, &mut in_progress);
    }
}

/// Resolve a single reference string against the definitions map.
///
/// `in_progress` holds the references currently being expanded on this
/// call chain; re-entry substitutes the cycle placeholder. Entries are
/// removed on exit so a definition reused in several places (a diamond,
/// not a cycle) still resolves everywhere.
fn resolve_ref(
    ref_str: &str,
    definitions: &Map<String, Value>,
    in_progress: &mut HashSet<String>,
) -> Value {
    // The definition name is the final path segment of the reference
    // (e.g. "User" out of "#/definitions/User").
    let name = ref_str.rsplit('/').next().unwrap_or(ref_str);

    let Some(definition) = definitions.get(name) else {
        warn!(reference = %ref_str, "reference not found, substituting empty schema");
        return json!({});
    };

    in_progress.insert(ref_str.to_string());
    let mut resolved = definition.clone();

    if let Some(properties) = resolved
        .get_mut("properties")
        .and_then(Value::as_object_mut)
    {
        for prop in properties.values_mut() {
            resolve_nested(prop, definitions, in_progress);
        }
    }

    if let Some(items) = resolved.get_mut("items") {
        resolve_nested(items, definitions, in_progress);
    }

    in_progress.remove(ref_str);
    resolved
}

fn resolve_nested(
    node: &mut Value,
    definitions: &Map<String, Value>,
    in_progress: &mut HashSet<String>,
) {
    let Some(nested_ref) = node.get("$ref").and_then(Value::as_str) else {
        return;
    };
    if in_progress.contains(nested_ref) {
        warn!(reference = %nested_ref, "cyclic reference, substituting placeholder");
        *node = cycle_placeholder();
    } else {
        let nested_ref = nested_ref.to_string();
        *node = resolve_ref(&nested_ref, definitions, in_progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::document::ApiDocument;
    use serde_json::json;

    fn document(value: Value) -> ApiDocument {
        ApiDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_resolve_inlines_response_schema() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "paths": {
                "/items": {
                    "get": {
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Item"}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Item": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer"},
                            "name": {"type": "string", "example": "widget"}
                        }
                    }
                }
            }
        }));

        let resolved = resolve(&doc);
        let schema = &resolved.json()["paths"]["/items"]["get"]["responses"]["200"]["content"]
            ["application/json"]["schema"];
        assert!(schema.get("$ref").is_none());
        assert_eq!(schema["type"], json!("object"));
        assert_eq!(schema["properties"]["id"]["type"], json!("integer"));
        assert_eq!(schema["properties"]["name"]["example"], json!("widget"));
    }

    #[test]
    fn test_resolve_does_not_mutate_input() {
        let doc = document(json!({
            "swagger": "2.0",
            "paths": {
                "/u": {
                    "get": {
                        "responses": {
                            "200": {"schema": {"$ref": "#/definitions/User"}}
                        }
                    }
                }
            },
            "definitions": {"User": {"type": "object"}}
        }));
        let before = doc.json().clone();

        let resolved = resolve(&doc);
        assert_eq!(doc.json(), &before);
        assert_eq!(
            resolved.json()["paths"]["/u"]["get"]["responses"]["200"]["schema"]["type"],
            json!("object")
        );
    }

    #[test]
    fn test_unknown_reference_degrades_to_empty_schema() {
        let doc = document(json!({
            "swagger": "2.0",
            "paths": {
                "/g": {
                    "get": {
                        "responses": {"200": {"schema": {"$ref": "#/definitions/Ghost"}}}
                    }
                }
            },
            "definitions": {}
        }));

        let resolved = resolve(&doc);
        assert_eq!(
            resolved.json()["paths"]["/g"]["get"]["responses"]["200"]["schema"],
            json!({})
        );
    }

    #[test]
    fn test_direct_self_reference_property_is_broken() {
        let doc = document(json!({
            "swagger": "2.0",
            "paths": {
                "/a": {
                    "get": {
                        "responses": {"200": {"schema": {"$ref": "#/definitions/A"}}}
                    }
                }
            },
            "definitions": {
                "A": {
                    "type": "object",
                    "properties": {"self": {"$ref": "#/definitions/A"}}
                }
            }
        }));

        let resolved = resolve(&doc);
        let schema = &resolved.json()["paths"]["/a"]["get"]["responses"]["200"]["schema"];
        assert_eq!(schema["properties"]["self"], cycle_placeholder());
    }

    #[test]
    fn test_self_referencing_array_items_are_broken() {
        let doc = document(json!({
            "swagger": "2.0",
            "paths": {
                "/t": {
                    "get": {
                        "responses": {"200": {"schema": {"$ref": "#/definitions/Tree"}}}
                    }
                }
            },
            "definitions": {
                "Tree": {
                    "type": "array",
                    "items": {"$ref": "#/definitions/Tree"}
                }
            }
        }));

        let resolved = resolve(&doc);
        let schema = &resolved.json()["paths"]["/t"]["get"]["responses"]["200"]["schema"];
        assert_eq!(schema["items"], cycle_placeholder());
    }

    #[test]
    fn test_indirect_cycle_terminates() {
        // A -> B -> A: the single-equality check of naive resolvers loops here
        let doc = document(json!({
            "swagger": "2.0",
            "paths": {
                "/ab": {
                    "get": {
                        "responses": {"200": {"schema": {"$ref": "#/definitions/A"}}}
                    }
                }
            },
            "definitions": {
                "A": {
                    "type": "object",
                    "properties": {"b": {"$ref": "#/definitions/B"}}
                },
                "B": {
                    "type": "object",
                    "properties": {"a": {"$ref": "#/definitions/A"}}
                }
            }
        }));

        let resolved = resolve(&doc);
        let schema = &resolved.json()["paths"]["/ab"]["get"]["responses"]["200"]["schema"];
        assert_eq!(schema["properties"]["b"]["properties"]["a"], cycle_placeholder());
    }

    #[test]
    fn test_diamond_reuse_resolves_both_branches() {
        let doc = document(json!({
            "swagger": "2.0",
            "paths": {
                "/d": {
                    "get": {
                        "responses": {"200": {"schema": {"$ref": "#/definitions/Pair"}}}
                    }
                }
            },
            "definitions": {
                "Pair": {
                    "type": "object",
                    "properties": {
                        "left": {"$ref": "#/definitions/Leaf"},
                        "right": {"$ref": "#/definitions/Leaf"}
                    }
                },
                "Leaf": {"type": "string"}
            }
        }));

        let resolved = resolve(&doc);
        let props = &resolved.json()["paths"]["/d"]["get"]["responses"]["200"]["schema"]
            ["properties"];
        assert_eq!(props["left"], json!({"type": "string"}));
        assert_eq!(props["right"], json!({"type": "string"}));
    }

    #[test]
    fn test_resolve_parameter_and_request_body_schemas() {
        let doc = document(json!({
            "openapi": "3.0.0",
            "paths": {
                "/pets": {
                    "post": {
                        "parameters": [{
                            "name": "hint",
                            "in": "query",
                            "schema": {"$ref": "#/components/schemas/Hint"}
                        }],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": {"$ref": "#/components/schemas/Pet"}
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Hint": {"type": "string"},
                    "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
                }
            }
        }));

        let resolved = resolve(&doc);
        let op = &resolved.json()["paths"]["/pets"]["post"];
        assert_eq!(op["parameters"][0]["schema"], json!({"type": "string"}));
        assert_eq!(
            op["requestBody"]["content"]["application/json"]["schema"]["properties"]["name"],
            json!({"type": "string"})
        );
    }

    #[test]
    fn test_swagger2_response_schema_position() {
        let doc = document(json!({
            "swagger": "2.0",
            "paths": {
                "/s": {
                    "get": {
                        "responses": {"200": {"schema": {"$ref": "#/definitions/Out"}}}
                    }
                }
            },
            "definitions": {"Out": {"type": "object"}}
        }));

        let resolved = resolve(&doc);
        assert_eq!(
            resolved.json()["paths"]["/s"]["get"]["responses"]["200"]["schema"],
            json!({"type": "object"})
        );
    }
}
