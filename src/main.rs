use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::*;
use knowledge_client::{
    config::{parse_timeout, DEFAULT_BASE_URL},
    constants::*,
    Config, KnowledgeApi, KnowledgeClient, KnowledgeQuery, NewDoc,
};
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Root URL of the web UI
    #[arg(long, global = true, env = "WEBUI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token sent with every request
    #[arg(long, global = true, env = "WEBUI_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "WEBUI_TIMEOUT_SECS")]
    timeout: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a document in a knowledge collection
    Create {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        filename: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        title: String,
        /// Document content as JSON
        #[arg(long)]
        content: Option<String>,
    },
    /// Search knowledge files by filename
    Search {
        #[arg(long, default_value = "")]
        myself: String,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 0)]
        skip: u64,
        #[arg(long, default_value_t = 30)]
        limit: u64,
    },
    /// Upload a file to the knowledge store
    Upload { path: PathBuf },
    /// Delete a knowledge file by id
    Delete { id: String },
    /// Print the subservice base URLs
    Urls {},
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if dotenv::dotenv().is_err() {
        warn!("didn't load a .env file")
    }

    let args = Cli::parse();

    let client = KnowledgeClient::new(args.config()?).context("failed to create client")?;

    let output = match args.command {
        Commands::Create {
            collection,
            filename,
            name,
            title,
            content,
        } => {
            let doc = new_doc(collection, filename, name, title, content.as_deref())?;
            client
                .create_doc(&doc)
                .await
                .context("failed to create knowledge doc")?
        }
        Commands::Search {
            myself,
            search,
            skip,
            limit,
        } => {
            let query = KnowledgeQuery {
                myself,
                search,
                skip,
                limit,
            };
            client
                .search(&query)
                .await
                .context("failed to search knowledge")?
        }
        Commands::Upload { path } => client
            .upload_path(&path)
            .await
            .with_context(|| format!("failed to upload {}", path.display()))?,
        Commands::Delete { id } => client
            .delete_by_id(&id)
            .await
            .with_context(|| format!("failed to delete {id}"))?,
        Commands::Urls {} => {
            print_urls(&client);
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

impl Cli {
    /// Flags win over `WEBUI_*` variables; clap resolves both.
    fn config(&self) -> Result<Config> {
        let mut config =
            Config::new(&self.base_url, &self.token).context("failed to build configuration")?;
        if let Some(secs) = &self.timeout {
            config = config.with_timeout(parse_timeout(secs).context("invalid --timeout")?);
        }
        Ok(config)
    }
}

fn new_doc(
    collection: String,
    filename: String,
    name: String,
    title: String,
    content: Option<&str>,
) -> Result<NewDoc> {
    let mut doc = NewDoc::new(collection, filename, name, title);
    if let Some(content) = content {
        let content: Value =
            serde_json::from_str(content).context("--content is not valid json")?;
        doc = doc.with_content(content);
    }
    Ok(doc)
}

fn print_urls(client: &KnowledgeClient) {
    let e = client.endpoints();
    println!("{APP_NAME} {WEBUI_VERSION} ({WEBUI_BUILD_HASH})");
    println!("required ollama: {REQUIRED_OLLAMA_VERSION}");
    println!("hostname: {}", e.hostname());
    for (name, url) in [
        ("base", e.base()),
        ("api", e.api()),
        ("qa", e.qa()),
        ("store", e.store()),
        ("ollama", e.ollama()),
        ("openai", e.openai()),
        ("audio", e.audio()),
        ("images", e.images()),
        ("rag", e.rag()),
    ] {
        println!("{name:<8}{url}");
    }
    println!("supported extensions: {}", SUPPORTED_FILE_EXTENSIONS.join(", "));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    fn create_doc(args: &[&str]) -> Result<NewDoc> {
        let mut argv = vec![
            "knowledge",
            "create",
            "--collection",
            "c",
            "--filename",
            "f.md",
            "--name",
            "n",
            "--title",
            "t",
        ];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv)?;
        match cli.command {
            Commands::Create {
                collection,
                filename,
                name,
                title,
                content,
            } => new_doc(collection, filename, name, title, content.as_deref()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn create_parses_content_json() {
        let doc = create_doc(&["--content", r#"{"text": "hi", "n": [1, 2]}"#]).unwrap();
        assert_eq!(doc.collection_name, "c");
        assert_eq!(doc.filename, "f.md");
        assert_eq!(doc.content, Some(json!({"text": "hi", "n": [1, 2]})));

        assert_eq!(create_doc(&[]).unwrap().content, None);
    }

    #[test]
    fn create_rejects_invalid_content() {
        let err = create_doc(&["--content", "{not json"]).unwrap_err();
        assert!(err.to_string().contains("--content is not valid json"), "{err:#}");
    }

    #[test]
    fn invalid_timeout_flag_has_context() {
        let cli = Cli::try_parse_from(["knowledge", "--timeout", "soon", "urls"]).unwrap();
        let err = cli.config().unwrap_err();
        assert_eq!(err.to_string(), "invalid --timeout");
    }

    // the only test that touches WEBUI_* variables
    #[test]
    fn flags_override_env() {
        std::env::set_var("WEBUI_BASE_URL", "http://from-env:1234");
        std::env::set_var("WEBUI_TOKEN", "env-token");
        std::env::set_var("WEBUI_TIMEOUT_SECS", "7");

        let from_env = Cli::try_parse_from(["knowledge", "urls"]).unwrap().config().unwrap();
        assert_eq!(from_env.endpoints.base(), "http://from-env:1234");
        assert_eq!(from_env.token, "env-token");
        assert_eq!(from_env.timeout, Some(Duration::from_secs(7)));

        let from_flags = Cli::try_parse_from([
            "knowledge",
            "--base-url",
            "https://from-flag",
            "--token",
            "flag-token",
            "--timeout",
            "3",
            "urls",
        ])
        .unwrap()
        .config()
        .unwrap();
        assert_eq!(from_flags.endpoints.base(), "https://from-flag");
        assert_eq!(from_flags.token, "flag-token");
        assert_eq!(from_flags.timeout, Some(Duration::from_secs(3)));

        std::env::remove_var("WEBUI_BASE_URL");
        std::env::remove_var("WEBUI_TOKEN");
        std::env::remove_var("WEBUI_TIMEOUT_SECS");
    }
}
