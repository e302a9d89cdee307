use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Raw document as returned by the store. Attribute names are not known
/// until the function configuration has been read.
pub type Document = Value;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Unavailable(String),
}

/// Read access to a paginated document collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_page(
        &self,
        database_id: &str,
        collection_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Document>, StoreError>;

    async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Document, StoreError>;
}
