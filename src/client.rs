use std::path::Path;

use async_trait::async_trait;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::{
    api::{KnowledgeApi, KnowledgeQuery, NewDoc, Upload},
    config::Config,
    constants::{is_supported_file, mime_for_extension},
    endpoints::Endpoints,
    error::{KnowledgeError, Result},
};

const JSON: &str = "application/json";

/// HTTP client for the knowledge store. Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct KnowledgeClient {
    client: Client,
    endpoints: Endpoints,
    token: String,
}

impl KnowledgeClient {
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoints: config.endpoints,
            token: config.token,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(ACCEPT, JSON).bearer_auth(&self.token)
    }

    /// A request with a JSON (or empty) body.
    fn json_request(&self, req: RequestBuilder) -> RequestBuilder {
        self.authorized(req).header(CONTENT_TYPE, JSON)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Value> {
        let res = req.send().await.map_err(request_failed)?;
        read_body(res).await
    }
}

/// Turns a response into its JSON body, or into an [`KnowledgeError::Api`] carrying
/// the `detail` of the error body on a non-2xx status.
async fn read_body(res: Response) -> Result<Value> {
    let status = res.status();
    if status.is_success() {
        return res.json().await.map_err(request_failed);
    }

    let detail = match res.json::<Value>().await {
        Ok(mut body) => body.get_mut("detail").map(Value::take),
        Err(e) => {
            debug!("error body is not json: {e}");
            None
        }
    };
    let err = KnowledgeError::Api { status, detail };
    error!("{err}");

    Err(err)
}

fn request_failed(e: reqwest::Error) -> KnowledgeError {
    error!("knowledge api request failed: {e}");
    KnowledgeError::Request(e)
}

/// The `data` field of a search response, `{}` when missing or null.
fn search_data(mut body: Value) -> Value {
    match body.get_mut("data").map(Value::take) {
        Some(Value::Null) | None => Value::Object(Default::default()),
        Some(data) => data,
    }
}

#[async_trait]
impl KnowledgeApi for KnowledgeClient {
    #[instrument(skip_all, fields(collection = %doc.collection_name, filename = %doc.filename))]
    async fn create_doc(&self, doc: &NewDoc) -> Result<Value> {
        debug!("creating knowledge doc");
        let req = self
            .json_request(self.client.post(self.endpoints.knowledge()))
            .json(doc);
        self.send(req).await
    }

    #[instrument(skip_all, fields(search = %query.search, skip = query.skip, limit = query.limit))]
    async fn search(&self, query: &KnowledgeQuery) -> Result<Value> {
        debug!("searching knowledge");
        let req = self
            .json_request(self.client.get(self.endpoints.knowledge()))
            .query(query);
        self.send(req).await.map(search_data)
    }

    #[instrument(skip_all, fields(file = %upload.file_name, bytes = upload.bytes.len()))]
    async fn upload_file(&self, upload: Upload) -> Result<Value> {
        debug!("uploading knowledge file");
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime)?;
        let req = self
            .authorized(self.client.post(self.endpoints.knowledge()))
            .multipart(Form::new().part("file", part));
        self.send(req).await
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    async fn upload_path(&self, path: &Path) -> Result<Value> {
        if !is_supported_file(path) {
            return Err(KnowledgeError::UnsupportedFile(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| KnowledgeError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        self.upload_file(Upload {
            file_name,
            mime: mime_for_extension(ext).to_string(),
            bytes,
        })
        .await
    }

    #[instrument(skip_all, fields(id = %id))]
    async fn delete_by_id(&self, id: &str) -> Result<Value> {
        debug!("deleting knowledge file");
        let req = self.json_request(self.client.delete(self.endpoints.file(id)));
        self.send(req).await
    }
}
