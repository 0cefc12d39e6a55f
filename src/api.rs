use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A new document for a knowledge collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDoc {
    pub collection_name: String,
    pub filename: String,
    pub name: String,
    pub title: String,
    /// Sent as a JSON-encoded string, not as nested JSON.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "stringified"
    )]
    pub content: Option<Value>,
}

impl NewDoc {
    pub fn new(
        collection_name: impl Into<String>,
        filename: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            filename: filename.into(),
            name: name.into(),
            title: title.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }
}

/// A paginated search over knowledge files. Field order is the query string order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeQuery {
    pub myself: String,
    #[serde(rename = "filename")]
    pub search: String,
    pub skip: u64,
    pub limit: u64,
}

/// An in-memory file to upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Operations of the knowledge file store.
#[async_trait]
pub trait KnowledgeApi: Send + Sync + 'static {
    /// Creates a document in a collection. Returns the server's response body.
    async fn create_doc(&self, doc: &NewDoc) -> Result<Value>;

    /// Lists knowledge files matching the query. Returns the `data` field of the
    /// response, or an empty object when there is none.
    async fn search(&self, query: &KnowledgeQuery) -> Result<Value>;

    /// Uploads a file as the multipart part `file`.
    async fn upload_file(&self, upload: Upload) -> Result<Value>;

    /// Reads a file from disk and uploads it, refusing unsupported file types.
    async fn upload_path(&self, path: &Path) -> Result<Value>;

    /// Deletes a stored file by id.
    async fn delete_by_id(&self, id: &str) -> Result<Value>;
}

mod stringified {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<Value>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&v.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|s| serde_json::from_str(&s).map_err(D::Error::custom))
            .transpose()
    }
}
