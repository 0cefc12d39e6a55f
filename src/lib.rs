pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod endpoints;
pub mod error;

pub use api::{KnowledgeApi, KnowledgeQuery, NewDoc, Upload};
pub use client::KnowledgeClient;
pub use config::Config;
pub use endpoints::Endpoints;
pub use error::{KnowledgeError, Result};
