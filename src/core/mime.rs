//! MIME type guessing and the filter for external open requests.

use std::path::Path;

/// Guesses a MIME type from a file name's extension.
pub fn guess_mime(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "txt" | "text" | "conf" | "cfg" | "ini" => "text/plain",
        "log" => "text/x-log",
        "md" | "markdown" => "text/markdown",
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "xml" => "text/xml",
        "rs" => "text/rust",
        "py" => "text/x-python",
        "sh" | "bash" => "application/x-sh",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "toml" => "application/toml",
        "yaml" | "yml" => "application/yaml",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => return None,
    };
    Some(mime)
}

/// Whether an external "open/view" request carrying this MIME hint should be handled.
///
/// Accepts any `text/*`, `application/text`, `application/x-unknown` and any other
/// `application/*`.
pub fn accepts_mime(mime: &str) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    mime.starts_with("text/")
        || mime == "application/text"
        || mime == "application/x-unknown"
        || mime.starts_with("application/")
}
