use crate::errors::Result;
use crate::storage::ConfigStore;
use crate::submit;
use tracing::{debug, info, warn};

pub const RESTART_PAGE: &str = "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\">\
<html><center><h1>Restart</h1></center></html>";

const SUBMIT_FAILED: &str = "Error processing and saving the configuration!";

/// What the configuration web server sends back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    /// The device should reboot once the reply is sent.
    pub restart: bool,
}

impl Reply {
    fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self { status: 200, content_type, body: body.into(), restart: false }
    }
}

/// MIME type by file extension.
pub fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("ico") => "image/x-icon",
        _ => "text/plain",
    }
}

/// Resolve a GET request. A submit page first applies `query` to the stored
/// settings, rewriting the INI and the prefill script, then serves the page.
/// Unknown files yield `ConfigError::NotFound`.
pub fn resolve(store: &ConfigStore, path: &str, query: &str) -> Result<Reply> {
    debug!(path, "request");
    let mut path = path.to_string();
    if path.ends_with('/') {
        path.push_str("index.html");
    }

    if path.ends_with("/restart") {
        info!("restart requested");
        return Ok(Reply { restart: true, ..Reply::ok("text/html", RESTART_PAGE) });
    }

    if path.ends_with("/submit.html") || path.ends_with("/submit_en.html") {
        let base = store.load_or_default()?;
        let sub = submit::decode(query, &base);
        if !sub.is_ok() {
            warn!(errors = sub.errors.len(), "submit rejected");
            let body = format!("{}\n{SUBMIT_FAILED}", sub.error_text());
            return Ok(Reply::ok("text/plain", body));
        }
        store.write_script(&sub.config)?;
        store.save(&sub.config)?;
    }

    let body = store.read(&path)?;
    Ok(Reply::ok(content_type(&path), body))
}
