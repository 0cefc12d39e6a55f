use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KnowledgeError>;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The server answered with a non-2xx status. `detail` is the `detail` field
    /// of the JSON error body, if there was one.
    #[error("knowledge api returned {status}: {}", describe(.detail))]
    Api {
        status: StatusCode,
        detail: Option<Value>,
    },

    #[error("knowledge api request failed")]
    Request(#[from] reqwest::Error),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl KnowledgeError {
    /// The server's `detail` rendered as text. Strings are returned as-is, other
    /// JSON (e.g. validation error lists) is compacted.
    pub fn detail_message(&self) -> Option<String> {
        match self {
            Self::Api { detail, .. } => render_detail(detail.as_ref()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(e) => e.status(),
            _ => None,
        }
    }
}

fn render_detail(detail: Option<&Value>) -> Option<String> {
    match detail? {
        Value::String(s) => Some(s.clone()),
        v => Some(v.to_string()),
    }
}

fn describe(detail: &Option<Value>) -> String {
    render_detail(detail.as_ref()).unwrap_or_else(|| "no detail".into())
}
