use std::fs;
use std::path::PathBuf;

use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use docserve_base::http::{HttpMethod, HttpRequest, HttpResponse, HttpService};
use docserve_base::DocserveResult;

use crate::render::{document_page, index_page, markdown_to_html};

/// Read-only web frontend over the document directory.
///
/// Two routes: `GET /` lists every `.md` file in the directory, and
/// `GET /docs/<name>` renders one document to HTML. Every request re-reads
/// the directory or file, so documents written by the scanner or watcher
/// become visible without any coordination; a request may observe a
/// document mid-write, which is accepted.
#[derive(Debug, Clone)]
pub struct DocService {
    docs_dir: PathBuf,
    title: String,
}

impl DocService {
    /// Create a service over the given document directory.
    pub fn new(docs_dir: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            title: title.into(),
        }
    }

    fn handle_index(&self) -> HttpResponse {
        HttpResponse::html(index_page(&self.title, &self.list_documents()))
    }

    /// Names of all `.md` files currently in the document directory, in
    /// directory listing order.
    fn list_documents(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.docs_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.docs_dir.display(), error = %e, "failed to list document directory");
                return Vec::new();
            }
        };
        entries
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".md"))
            .collect()
    }

    fn handle_document(&self, raw_name: &str) -> HttpResponse {
        let name = match percent_decode_str(raw_name).decode_utf8() {
            Ok(name) => name.into_owned(),
            Err(_) => return not_found(raw_name),
        };
        // Keep lookups inside the document directory.
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return not_found(&name);
        }

        let path = self.docs_dir.join(&name);
        let markdown = match fs::read_to_string(&path) {
            Ok(markdown) => markdown,
            Err(e) => {
                debug!(doc = %name, error = %e, "requested document not found");
                return not_found(&name);
            }
        };

        HttpResponse::html(document_page(&name, &markdown_to_html(&markdown)))
    }
}

fn not_found(name: &str) -> HttpResponse {
    HttpResponse::not_found()
        .with_content_type("text/plain; charset=utf-8")
        .with_body(format!("no such document: {name}"))
}

impl HttpService for DocService {
    fn handle_request(&self, request: HttpRequest) -> DocserveResult<HttpResponse> {
        if request.method() != &HttpMethod::Get {
            return Ok(HttpResponse::method_not_allowed());
        }
        let path = request.path().split('?').next().unwrap_or(request.path());
        if path == "/" {
            Ok(self.handle_index())
        } else if let Some(name) = path.strip_prefix("/docs/") {
            Ok(self.handle_document(name))
        } else {
            Ok(HttpResponse::not_found()
                .with_content_type("text/plain; charset=utf-8")
                .with_body("not found"))
        }
    }
}
