//! Document loading strategies.
//!
//! Loaders only move bytes; parsing, validation and normalization live
//! in [`ApiDocument`](crate::openapi::document::ApiDocument).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::fs;

use crate::error::{Error, Result};
use crate::openapi::document::ApiDocument;

/// A source of normalized API documents.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load and normalize the document at `source`.
    async fn load(&self, source: &str) -> Result<ApiDocument>;
}

/// Loads documents from local files
pub struct FileDocumentLoader;

impl FileDocumentLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileDocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for FileDocumentLoader {
    async fn load(&self, source: &str) -> Result<ApiDocument> {
        let content = fs::read_to_string(source).await.map_err(Error::Io)?;
        ApiDocument::parse(&content)
    }
}

/// Loads documents from HTTP/HTTPS URLs
pub struct HttpDocumentLoader {
    client: Client,
}

impl HttpDocumentLoader {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

impl Default for HttpDocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for HttpDocumentLoader {
    async fn load(&self, source: &str) -> Result<ApiDocument> {
        if !source.starts_with("http://") && !source.starts_with("https://") {
            return Err(Error::load(format!(
                "HttpDocumentLoader only handles HTTP(S) URLs, got: {source}"
            )));
        }

        let response = self
            .client
            .get(source)
            .send()
            .await
            .map_err(|e| Error::load(format!("Failed to fetch document from {source}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::load(format!("HTTP {status} when fetching {source}")));
        }

        let content = response
            .text()
            .await
            .map_err(|e| Error::load(format!("Failed to read response body: {e}")))?;

        ApiDocument::parse(&content)
    }
}

/// Composite loader that picks a strategy based on the source string
pub struct CompositeDocumentLoader {
    http: HttpDocumentLoader,
    file: FileDocumentLoader,
}

impl CompositeDocumentLoader {
    pub fn new() -> Self {
        Self {
            http: HttpDocumentLoader::new(),
            file: FileDocumentLoader::new(),
        }
    }
}

impl Default for CompositeDocumentLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for CompositeDocumentLoader {
    async fn load(&self, source: &str) -> Result<ApiDocument> {
        if source.starts_with("http://") || source.starts_with("https://") {
            tracing::debug!("CompositeDocumentLoader: using HTTP loader for {source}");
            self.http.load(source).await
        } else {
            tracing::debug!("CompositeDocumentLoader: using file loader for {source}");
            self.file.load(source).await
        }
    }
}
