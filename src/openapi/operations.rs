//! Flat per-operation summary extraction.
//!
//! Walks every path/method pair of a (typically already resolved)
//! document and produces serializable summaries suitable for reporting
//! or machine consumption. Swagger 2.0 `in: body` parameters are
//! surfaced as an OpenAPI-3-shaped `requestBody` so consumers only deal
//! with one shape.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::openapi::document::{ApiDocument, SpecFlavor};

/// HTTP methods recognized inside a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Get all HTTP methods as an array
    pub fn all() -> &'static [HttpMethod] {
        &[
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
            HttpMethod::Patch,
            HttpMethod::Options,
            HttpMethod::Head,
        ]
    }

    /// Lowercase method name as used for path item keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parameter of an operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSummary {
    pub name: String,
    /// Parameter location: `query|path|header|body|formData`
    #[serde(rename = "in")]
    pub location: String,
    pub description: String,
    pub required: bool,
    /// The parameter schema, or `{"type": ...}` built from the scalar
    /// fallback for Swagger 2.0 non-body parameters.
    pub schema: Value,
    /// Scalar type fallback: `type`, then `schema.type`, then `string`.
    #[serde(rename = "type")]
    pub param_type: String,
}

/// One operation of the document, flattened out of the paths tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSummary {
    pub path: String,
    /// Uppercase HTTP method name
    pub method: String,
    pub summary: String,
    pub description: String,
    pub operation_id: String,
    pub parameters: Vec<ParameterSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    /// Status-code string → response object
    pub responses: Map<String, Value>,
    pub tags: Vec<String>,
}

/// Extract a flat ordered sequence of per-operation summaries.
pub fn extract_operations(doc: &ApiDocument) -> Vec<OperationSummary> {
    let is_openapi3 = doc.flavor() == SpecFlavor::OpenApi3;

    let Some(paths) = doc.json().get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut operations = Vec::new();
    for (path, path_item) in paths {
        let Some(path_item) = path_item.as_object() else {
            continue;
        };
        for method in HttpMethod::all() {
            let Some(operation) = path_item.get(method.as_str()).and_then(Value::as_object)
            else {
                continue;
            };
            operations.push(build_summary(path, *method, operation, is_openapi3));
        }
    }
    operations
}

fn build_summary(
    path: &str,
    method: HttpMethod,
    operation: &Map<String, Value>,
    is_openapi3: bool,
) -> OperationSummary {
    let parameters = operation
        .get("parameters")
        .and_then(Value::as_array)
        .map(|params| params.iter().map(parameter_summary).collect())
        .unwrap_or_default();

    let request_body = if is_openapi3 {
        operation.get("requestBody").cloned()
    } else {
        // Swagger 2.0 models the body as a parameter; lift it into the
        // OpenAPI 3 requestBody shape.
        operation
            .get("parameters")
            .and_then(Value::as_array)
            .and_then(|params| {
                params
                    .iter()
                    .find(|p| p.get("in").and_then(Value::as_str) == Some("body"))
            })
            .map(|body_param| {
                json!({
                    "description": str_field(body_param, "description"),
                    "required": bool_field(body_param, "required"),
                    "content": {
                        "application/json": {
                            "schema": body_param.get("schema").cloned().unwrap_or(json!({}))
                        }
                    }
                })
            })
    };

    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let tags = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    OperationSummary {
        path: path.to_string(),
        method: method.as_str().to_uppercase(),
        summary: str_field_map(operation, "summary"),
        description: str_field_map(operation, "description"),
        operation_id: str_field_map(operation, "operationId"),
        parameters,
        request_body,
        responses,
        tags,
    }
}

fn parameter_summary(param: &Value) -> ParameterSummary {
    let schema = param.get("schema").cloned().filter(|s| !s.is_null());

    // Scalar fallback chain: `type`, then `schema.type`, then "string".
    let param_type = param
        .get("type")
        .and_then(Value::as_str)
        .or_else(|| {
            schema
                .as_ref()
                .and_then(|s| s.get("type"))
                .and_then(Value::as_str)
        })
        .unwrap_or("string")
        .to_string();

    let schema = schema.unwrap_or_else(|| {
        json!({"type": param.get("type").and_then(Value::as_str).unwrap_or("string")})
    });

    ParameterSummary {
        name: str_field(param, "name"),
        location: str_field(param, "in"),
        description: str_field(param, "description"),
        required: bool_field(param, "required"),
        schema,
        param_type,
    }
}

fn str_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn str_field_map(map: &Map<String, Value>, field: &str) -> String {
    map.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn bool_field(value: &Value, field: &str) -> bool {
    value
        .get(field)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
