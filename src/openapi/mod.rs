//! Swagger/OpenAPI document handling.
//!
//! - [`document`] — parsing, validation and structural normalization
//! - [`loader`] — file/HTTP loading strategies behind one trait
//! - [`resolver`] — `$ref` resolution with cycle breaking
//! - [`example`] — example payload synthesis
//! - [`operations`] — flat per-operation summary extraction
//! - [`report`] — human-readable report rendering

pub mod document;
pub mod example;
pub mod loader;
pub mod operations;
pub mod report;
pub mod resolver;
