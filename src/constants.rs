use std::path::Path;

pub const APP_NAME: &str = "Open WebUI";

pub const WEBUI_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const WEBUI_BUILD_HASH: &str = match option_env!("WEBUI_BUILD_HASH") {
    Some(hash) => hash,
    None => "dev-build",
};

pub const REQUIRED_OLLAMA_VERSION: &str = "0.1.16";

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const FALLBACK_MIME: &str = "application/octet-stream";

/// MIME types the knowledge store accepts.
pub const SUPPORTED_FILE_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "text/csv",
    DOCX_MIME,
    FALLBACK_MIME,
    "text/markdown",
];

/// File extensions the knowledge store accepts.
pub const SUPPORTED_FILE_EXTENSIONS: &[&str] =
    &["md", "doc", "docx", "pdf", "csv", "txt", "xls", "xlsx"];

/// Checks a MIME type against [`SUPPORTED_FILE_TYPES`], ignoring any parameters.
pub fn is_supported_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    SUPPORTED_FILE_TYPES
        .iter()
        .any(|t| t.eq_ignore_ascii_case(essence))
}

pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.trim_start_matches('.');
    SUPPORTED_FILE_EXTENSIONS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(ext))
}

/// The MIME type sent along with an uploaded file of the given extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "md" => "text/markdown",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "pdf" => "application/pdf",
        "docx" => DOCX_MIME,
        _ => FALLBACK_MIME,
    }
}

/// Whether a file may be uploaded, judged by its extension.
pub fn is_supported_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(is_supported_extension)
}
