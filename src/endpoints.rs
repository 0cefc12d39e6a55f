use reqwest::Url;

use crate::error::{KnowledgeError, Result};

/// Base URLs of the web UI's subservices, all derived from one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| KnowledgeError::Config(format!("invalid base url {base:?}: {e}")))?;

        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(KnowledgeError::Config(format!(
                "base url must be http(s), got {base}"
            )));
        }

        if base.query().is_some() || base.fragment().is_some() {
            return Err(KnowledgeError::Config(format!(
                "base url can't carry a query or fragment, got {base}"
            )));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> String {
        self.base.as_str().trim_end_matches('/').to_string()
    }

    pub fn hostname(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    pub fn api(&self) -> String {
        self.join("/api/v1")
    }

    pub fn qa(&self) -> String {
        self.join("/qa")
    }

    pub fn store(&self) -> String {
        self.join("/store")
    }

    pub fn ollama(&self) -> String {
        self.join("/ollama")
    }

    pub fn openai(&self) -> String {
        self.join("/openai")
    }

    pub fn audio(&self) -> String {
        self.join("/audio/api/v1")
    }

    pub fn images(&self) -> String {
        self.join("/images/api/v1")
    }

    pub fn rag(&self) -> String {
        self.join("/rag/api/v1")
    }

    /// Collection endpoint of the knowledge store, used for create, search and upload.
    pub fn knowledge(&self) -> Url {
        self.store_url(&["api", "v1", "files", "knowledge"])
    }

    /// A single stored file. The id is percent-encoded as one path segment.
    pub fn file(&self, id: &str) -> Url {
        self.store_url(&["api", "v1", "files", id])
    }

    fn join(&self, path: &str) -> String {
        format!("{}{path}", self.base())
    }

    fn store_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("store").extend(segments);
        }
        url
    }
}
