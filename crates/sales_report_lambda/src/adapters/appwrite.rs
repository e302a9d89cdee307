use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::adapters::document_store::{Document, DocumentStore, StoreError};

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    total: u64,
    documents: Vec<Value>,
}

/// Appwrite databases REST client, built once per invocation.
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project: String,
    api_key: String,
}

impl std::fmt::Debug for AppwriteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.endpoint)
            .field("project", &self.project)
            .finish_non_exhaustive()
    }
}

impl AppwriteClient {
    pub fn new(
        endpoint: impl Into<String>,
        project: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| StoreError::Unavailable(format!("failed to build http client: {error}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project: project.into(),
            api_key: api_key.into(),
        })
    }

    fn documents_url(&self, database_id: &str, collection_id: &str) -> String {
        format!(
            "{}/databases/{database_id}/collections/{collection_id}/documents",
            self.endpoint
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        queries: &[(&str, String)],
    ) -> Result<T, StoreError> {
        let response = self
            .http
            .get(&url)
            .header(PROJECT_HEADER, &self.project)
            .header(KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .query(queries)
            .send()
            .await
            .map_err(|source| StoreError::Request {
                endpoint: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                endpoint: url,
                status: status.as_u16(),
                message: error_message(&body, status),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| StoreError::Decode {
                endpoint: url,
                source,
            })
    }
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn list_page(
        &self,
        database_id: &str,
        collection_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let queries = [
            ("queries[]", query("limit", limit)),
            ("queries[]", query("offset", offset)),
        ];
        let list: DocumentList = self
            .get_json(self.documents_url(database_id, collection_id), &queries)
            .await?;
        tracing::debug!(
            component = "appwrite_client",
            collection_id,
            offset,
            returned = list.documents.len(),
            total = list.total,
            "listed documents"
        );
        Ok(list.documents)
    }

    async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<Document, StoreError> {
        let url = format!(
            "{}/{document_id}",
            self.documents_url(database_id, collection_id)
        );
        self.get_json(url, &[]).await
    }
}

fn query(method: &str, value: usize) -> String {
    json!({ "method": method, "values": [value] }).to_string()
}

fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string())
}
