//! API description document: parsing, validation, normalization.
//!
//! A document is kept as a raw `serde_json::Value` tree (YAML input is
//! converted to the same representation). Construction validates the
//! version marker and normalizes the structure so downstream code can
//! index `paths`, `tags` and the definitions container without existence
//! checks.

use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::openapi::operations::HttpMethod;

/// Tag assigned to operations that declare none.
pub const DEFAULT_TAG: &str = "默认";

/// Which flavor of API description a document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFlavor {
    /// Swagger 2.0 (`swagger` version marker, `definitions` container)
    Swagger2,
    /// OpenAPI 3.x (`openapi` version marker, `components.schemas` container)
    OpenApi3,
}

impl SpecFlavor {
    /// The top-level key that marks this flavor.
    pub fn marker(&self) -> &'static str {
        match self {
            SpecFlavor::Swagger2 => "swagger",
            SpecFlavor::OpenApi3 => "openapi",
        }
    }
}

/// A normalized Swagger/OpenAPI document.
#[derive(Debug, Clone)]
pub struct ApiDocument {
    json: Value,
    flavor: SpecFlavor,
}

impl ApiDocument {
    /// Parse raw file content into a normalized document.
    ///
    /// The content is tried as JSON first, then as YAML. Anything else is
    /// a fatal [`Error::Format`].
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .or_else(|_| serde_yaml::from_str(content))
            .map_err(|_| Error::format("content is neither valid JSON nor YAML"))?;
        Self::from_value(value)
    }

    /// Build a normalized document from an already-parsed value.
    ///
    /// The value must be a mapping carrying a `swagger` or `openapi`
    /// version marker; `openapi` wins when both are present.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| Error::document("top-level value is not a mapping"))?;

        let flavor = if obj.contains_key("openapi") {
            SpecFlavor::OpenApi3
        } else if obj.contains_key("swagger") {
            SpecFlavor::Swagger2
        } else {
            return Err(Error::document(
                "missing 'swagger' or 'openapi' version marker",
            ));
        };

        normalize(&mut value, flavor);
        Ok(Self { json: value, flavor })
    }

    /// The normalized document tree.
    pub fn json(&self) -> &Value {
        &self.json
    }

    pub fn flavor(&self) -> SpecFlavor {
        self.flavor
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Get the version of the API
    pub fn version(&self) -> Option<&str> {
        self.json.get("info")?.get("version")?.as_str()
    }

    /// Get the description of the API
    pub fn description(&self) -> Option<&str> {
        self.json.get("info")?.get("description")?.as_str()
    }

    /// The schema definitions map this document resolves references
    /// against: Swagger-2 `definitions` when present and non-empty,
    /// otherwise `components.schemas`, otherwise empty.
    pub fn definitions(&self) -> Map<String, Value> {
        definitions_of(&self.json)
    }

    pub(crate) fn from_parts(json: Value, flavor: SpecFlavor) -> Self {
        Self { json, flavor }
    }
}

/// Extract the definitions map from a document tree.
pub(crate) fn definitions_of(doc: &Value) -> Map<String, Value> {
    if let Some(defs) = doc.get("definitions").and_then(Value::as_object) {
        if !defs.is_empty() {
            return defs.clone();
        }
    }
    doc.get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

/// Fill in missing optional structure with empty defaults. Idempotent.
fn normalize(doc: &mut Value, flavor: SpecFlavor) {
    let root = doc.as_object_mut().expect("validated as mapping");

    root.entry("paths").or_insert_with(|| json!({}));
    root.entry("tags").or_insert_with(|| json!([]));

    match flavor {
        SpecFlavor::OpenApi3 => {
            let components = root
                .entry("components")
                .or_insert_with(|| json!({}));
            if let Some(components) = components.as_object_mut() {
                components.entry("schemas").or_insert_with(|| json!({}));
            }
        }
        SpecFlavor::Swagger2 => {
            root.entry("definitions").or_insert_with(|| json!({}));
        }
    }

    let Some(paths) = root.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };
    for path_item in paths.values_mut() {
        // Skip empty or malformed path items
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
            operation.entry("responses").or_insert_with(|| json!({}));
            operation.entry("parameters").or_insert_with(|| json!([]));
            let tags = operation.entry("tags").or_insert_with(|| json!([]));
            if let Some(tags) = tags.as_array_mut() {
                if tags.is_empty() {
                    tags.push(json!(DEFAULT_TAG));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_document() {
        let doc = ApiDocument::parse(r#"{"openapi": "3.0.0", "paths": {}}"#).unwrap();
        assert_eq!(doc.flavor(), SpecFlavor::OpenApi3);
        assert!(doc.json().get("components").is_some());
    }

    #[test]
    fn test_parse_yaml_document() {
        let doc = ApiDocument::parse("swagger: '2.0'\npaths: {}\n").unwrap();
        assert_eq!(doc.flavor(), SpecFlavor::Swagger2);
        assert_eq!(doc.json()["definitions"], json!({}));
    }

    #[test]
    fn test_parse_malformed_content_is_format_error() {
        // Unbalanced braces with a tab make this invalid YAML as well
        let result = ApiDocument::parse("{\"openapi\": \"3.0.0\",\n\t{{");
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_missing_version_marker_is_document_error() {
        let result = ApiDocument::from_value(json!({"paths": {}}));
        assert!(matches!(result, Err(Error::Document(_))));
    }

    #[test]
    fn test_non_mapping_is_document_error() {
        let result = ApiDocument::from_value(json!(["openapi"]));
        assert!(matches!(result, Err(Error::Document(_))));
    }

    #[test]
    fn test_openapi_marker_wins_over_swagger() {
        let doc =
            ApiDocument::from_value(json!({"openapi": "3.0.0", "swagger": "2.0"})).unwrap();
        assert_eq!(doc.flavor(), SpecFlavor::OpenApi3);
    }

    #[test]
    fn test_normalization_defaults() {
        let doc = ApiDocument::from_value(json!({
            "swagger": "2.0",
            "paths": {
                "/users": {
                    "get": {"summary": "List users"},
                    "description": "not a method"
                },
                "/empty": null
            }
        }))
        .unwrap();

        let get = &doc.json()["paths"]["/users"]["get"];
        assert_eq!(get["responses"], json!({}));
        assert_eq!(get["parameters"], json!([]));
        assert_eq!(get["tags"], json!([DEFAULT_TAG]));
        assert_eq!(doc.json()["tags"], json!([]));
        assert_eq!(doc.json()["definitions"], json!({}));
    }

    #[test]
    fn test_normalization_keeps_existing_tags() {
        let doc = ApiDocument::from_value(json!({
            "openapi": "3.0.0",
            "paths": {"/p": {"post": {"tags": ["billing"]}}}
        }))
        .unwrap();
        assert_eq!(doc.json()["paths"]["/p"]["post"]["tags"], json!(["billing"]));
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let value = json!({
            "openapi": "3.0.0",
            "paths": {"/p": {"get": {}}},
        });
        let once = ApiDocument::from_value(value).unwrap();
        let twice = ApiDocument::from_value(once.json().clone()).unwrap();
        assert_eq!(once.json(), twice.json());
    }

    #[test]
    fn test_definitions_prefers_non_empty_swagger2_map() {
        let doc = ApiDocument::from_value(json!({
            "swagger": "2.0",
            "definitions": {"User": {"type": "object"}},
            "components": {"schemas": {"Ignored": {}}}
        }))
        .unwrap();
        assert!(doc.definitions().contains_key("User"));
        assert!(!doc.definitions().contains_key("Ignored"));
    }

    #[test]
    fn test_definitions_falls_back_to_components() {
        let doc = ApiDocument::from_value(json!({
            "openapi": "3.0.0",
            "components": {"schemas": {"Item": {"type": "object"}}}
        }))
        .unwrap();
        assert!(doc.definitions().contains_key("Item"));
    }
}
