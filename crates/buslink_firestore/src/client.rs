// --- File: crates/buslink_firestore/src/client.rs ---
//! Minimal Firestore REST client.
//!
//! Covers exactly the operations this system needs: document get, paged
//! listing, atomic preconditioned commits, and non-atomic batched writes.

use crate::auth::get_firestore_auth_token;
use crate::value::Fields;
use buslink_common::HTTP_CLIENT;
use buslink_config::FirestoreConfig;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::warn;

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com";

/// The store's per-request write-count limit; one commit or batchWrite must
/// never carry more writes than this.
pub const MAX_WRITES_PER_BATCH: usize = 500;

/// Errors that can occur when talking to the Firestore REST API
#[derive(Error, Debug)]
pub enum FirestoreError {
    /// Error during authentication
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error during the HTTP request
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// Error returned by the Firestore API
    #[error("Firestore API error: {0}")]
    ApiError(String),

    /// A write precondition did not hold; nothing was written
    #[error("Write precondition failed (document changed concurrently)")]
    Contention,

    /// Response was not the expected shape
    #[error("Failed to parse Firestore response: {0}")]
    ParseError(String),
}

impl From<FirestoreError> for buslink_common::BuslinkError {
    fn from(err: FirestoreError) -> Self {
        match err {
            FirestoreError::Contention => buslink_common::BuslinkError::FailedPrecondition(
                "document changed concurrently".to_string(),
            ),
            other => buslink_common::upstream_error("Firestore", other),
        }
    }
}

/// A document as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, `projects/.../documents/{collection}/{id}`.
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
    pub update_time: Option<String>,
}

impl Document {
    /// The last path segment of the resource name.
    pub fn doc_id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    next_page_token: Option<String>,
}

/// Precondition attached to a single write.
#[derive(Debug, Clone)]
pub enum Precondition {
    /// The document must (not) exist.
    Exists(bool),
    /// The document must still be at this update time.
    UpdateTime(String),
}

/// Builds an `update` write, optionally masked and preconditioned.
///
/// With a mask, only the named field paths are written; paths in the mask
/// but absent from `fields` are deleted from the document.
pub fn update_write(
    name: &str,
    fields: &Fields,
    mask: Option<&[&str]>,
    precondition: Option<Precondition>,
) -> Value {
    let mut write = json!({
        "update": { "name": name, "fields": fields }
    });
    if let Some(paths) = mask {
        write["updateMask"] = json!({ "fieldPaths": paths });
    }
    match precondition {
        Some(Precondition::Exists(exists)) => {
            write["currentDocument"] = json!({ "exists": exists });
        }
        Some(Precondition::UpdateTime(t)) => {
            write["currentDocument"] = json!({ "updateTime": t });
        }
        None => {}
    }
    write
}

/// Builds a `delete` write.
pub fn delete_write(name: &str) -> Value {
    json!({ "delete": name })
}

/// Client for the Firestore REST API.
pub struct FirestoreClient {
    http: Client,
    base_url: String,
    project_id: String,
    config: FirestoreConfig,
}

impl FirestoreClient {
    /// Builds a client from config. When `key_path` is absent, requests go
    /// out unauthenticated (emulator / test mode).
    pub fn from_config(config: &FirestoreConfig) -> Result<Self, FirestoreError> {
        let project_id = config
            .project_id
            .clone()
            .ok_or_else(|| FirestoreError::ConfigError("Missing project_id".to_string()))?;
        let base_url = config
            .api_base_url
            .clone()
            .unwrap_or_else(|| FIRESTORE_API_BASE.to_string());
        Ok(Self {
            http: HTTP_CLIENT.clone(),
            base_url,
            project_id,
            config: config.clone(),
        })
    }

    /// Client against an explicit base URL with no auth, used in tests.
    pub fn new(base_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            http: HTTP_CLIENT.clone(),
            base_url: base_url.into(),
            project_id: project_id.clone(),
            config: FirestoreConfig {
                project_id: Some(project_id),
                key_path: None,
                api_base_url: None,
            },
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents",
            self.base_url, self.project_id
        )
    }

    /// Full resource name for a document.
    pub fn doc_name(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}/{}",
            self.project_id, collection, doc_id
        )
    }

    async fn auth_header(&self) -> Result<Option<String>, FirestoreError> {
        if self.config.key_path.is_none() {
            return Ok(None);
        }
        let token = get_firestore_auth_token(&self.config)
            .await
            .map_err(|e| FirestoreError::AuthError(e.to_string()))?;
        Ok(Some(format!("Bearer {}", token)))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, FirestoreError> {
        let request = match self.auth_header().await? {
            Some(bearer) => request.header(header::AUTHORIZATION, bearer),
            None => request,
        };
        Ok(request.send().await?)
    }

    /// Fetches a document; absent documents come back as `None`.
    pub async fn get_document(
        &self,
        collection: &str,
        doc_id: &str,
    ) -> Result<Option<Document>, FirestoreError> {
        let url = format!("{}/{}/{}", self.documents_root(), collection, doc_id);
        let response = self.send(self.http.get(&url)).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let doc = response
            .json::<Document>()
            .await
            .map_err(|e| FirestoreError::ParseError(e.to_string()))?;
        Ok(Some(doc))
    }

    /// Lists every document of a collection, following page tokens.
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, FirestoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let url = format!("{}/{}", self.documents_root(), collection);
            let mut request = self.http.get(&url).query(&[("pageSize", "300")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let response = check_status(self.send(request).await?).await?;
            let page: ListDocumentsResponse = response
                .json()
                .await
                .map_err(|e| FirestoreError::ParseError(e.to_string()))?;
            documents.extend(page.documents);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(documents)
    }

    /// Fetches a single page of documents; the wipe loop uses the empty page
    /// as its exit condition.
    pub async fn list_document_page(
        &self,
        collection: &str,
        page_size: usize,
    ) -> Result<Vec<Document>, FirestoreError> {
        let url = format!("{}/{}", self.documents_root(), collection);
        let request = self
            .http
            .get(&url)
            .query(&[("pageSize", page_size.to_string())]);
        let response = check_status(self.send(request).await?).await?;
        let page: ListDocumentsResponse = response
            .json()
            .await
            .map_err(|e| FirestoreError::ParseError(e.to_string()))?;
        Ok(page.documents)
    }

    /// Commits a write set atomically. A failed precondition on any write
    /// rolls the whole commit back and surfaces as [`FirestoreError::Contention`].
    pub async fn commit(&self, writes: Vec<Value>) -> Result<(), FirestoreError> {
        debug_assert!(writes.len() <= MAX_WRITES_PER_BATCH);
        let url = format!("{}:commit", self.documents_root());
        let response = self
            .send(self.http.post(&url).json(&json!({ "writes": writes })))
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body_text = response.text().await.unwrap_or_default();
        if body_text.contains("FAILED_PRECONDITION") || body_text.contains("ABORTED") {
            return Err(FirestoreError::Contention);
        }
        Err(FirestoreError::ApiError(format!("{}: {}", status, body_text)))
    }

    /// Applies writes non-atomically. Per-write precondition failures are
    /// expected (create-if-absent writes against existing documents) and are
    /// ignored; any other per-write failure is logged and counted, never
    /// fatal to the batch.
    pub async fn batch_write(&self, writes: Vec<Value>) -> Result<(), FirestoreError> {
        debug_assert!(writes.len() <= MAX_WRITES_PER_BATCH);
        let url = format!("{}:batchWrite", self.documents_root());
        let response = self
            .send(self.http.post(&url).json(&json!({ "writes": writes })))
            .await?;
        let response = check_status(response).await?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| FirestoreError::ParseError(e.to_string()))?;
        if let Some(statuses) = body.get("status").and_then(Value::as_array) {
            for status in statuses {
                let code = status.get("code").and_then(Value::as_i64).unwrap_or(0);
                // 0 OK, 6 ALREADY_EXISTS, 9 FAILED_PRECONDITION
                if code != 0 && code != 6 && code != 9 {
                    warn!("[Firestore] batchWrite entry failed: {}", status);
                }
            }
        }
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FirestoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body_text = response.text().await.unwrap_or_default();
        Err(FirestoreError::ApiError(format!("{}: {}", status, body_text)))
    }
}
