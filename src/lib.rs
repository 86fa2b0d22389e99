//! oasdoc — Swagger 2.0 / OpenAPI 3.0 document inspection.
//!
//! The library normalizes raw API description documents (JSON or YAML),
//! resolves `$ref` schema references without looping on cycles, extracts
//! flat per-operation summaries, and synthesizes deterministic example
//! payloads from JSON Schema fragments.
//!
//! The pipeline is: raw text → [`ApiDocument`] → [`resolve`] → extraction
//! ([`extract_operations`]) and rendering ([`render_api_info`]).

#![deny(unsafe_code)]

pub mod error;
pub mod openapi;

pub use error::{Error, Result};
pub use openapi::document::{ApiDocument, SpecFlavor, DEFAULT_TAG};
pub use openapi::example::synthesize_example;
pub use openapi::loader::{
    CompositeDocumentLoader, DocumentLoader, FileDocumentLoader, HttpDocumentLoader,
};
pub use openapi::operations::{extract_operations, HttpMethod, OperationSummary, ParameterSummary};
pub use openapi::report::render_api_info;
pub use openapi::resolver::resolve;
