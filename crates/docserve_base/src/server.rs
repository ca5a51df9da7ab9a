//! Adapter running an [`HttpService`] on a `tiny_http` accept loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{DocserveError, DocserveResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpService};

/// How long the accept loop blocks before re-checking the shutdown flag.
const RECV_TIMEOUT: Duration = Duration::from_millis(100);

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on. Port 0 lets the OS assign a free port.
    pub port: u16,
}

impl HttpServerConfig {
    /// Create a new configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the address string to bind to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Handle to a running HTTP server.
///
/// Dropping the handle signals shutdown; the accept loop notices within
/// one `RECV_TIMEOUT` tick and exits.
#[derive(Debug)]
pub struct HttpServerHandle {
    port: u16,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl HttpServerHandle {
    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Signal the server to stop accepting connections.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Block until the server loop exits.
    ///
    /// The loop only exits after `shutdown()` is called, so joining without
    /// a prior shutdown serves indefinitely.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for HttpServerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start an HTTP server running `service` on a background thread.
pub fn start_http_server(
    service: Box<dyn HttpService>,
    config: HttpServerConfig,
) -> DocserveResult<HttpServerHandle> {
    let address = config.address();
    let server = tiny_http::Server::http(&address)
        .map_err(|e| DocserveError::Http(format!("failed to bind {}: {}", address, e)))?;

    let port = server
        .server_addr()
        .to_ip()
        .map(|addr| addr.port())
        .unwrap_or(config.port);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    let thread = thread::spawn(move || {
        loop {
            if flag.load(Ordering::SeqCst) {
                break;
            }
            match server.recv_timeout(RECV_TIMEOUT) {
                Ok(Some(request)) => handle_connection(request, service.as_ref()),
                Ok(None) => continue,
                Err(e) => warn!(error = %e, "error receiving request"),
            }
        }
        debug!("http server loop stopped");
    });

    info!(port, "http server listening");
    Ok(HttpServerHandle {
        port,
        shutdown,
        thread: Some(thread),
    })
}

/// Translate one `tiny_http` request, dispatch it, send the response.
fn handle_connection(request: tiny_http::Request, service: &dyn HttpService) {
    let path = request.url().to_string();
    let response = match HttpMethod::parse(&request.method().to_string()) {
        Some(method) => match service.handle_request(HttpRequest::new(method, &path)) {
            Ok(response) => response,
            Err(e) => {
                warn!(path = %path, error = %e, "request handler failed");
                HttpResponse::internal_error().with_body(format!("internal error: {}", e))
            }
        },
        None => HttpResponse::method_not_allowed(),
    };
    respond(request, response);
}

fn respond(request: tiny_http::Request, response: HttpResponse) {
    let status = tiny_http::StatusCode(response.status().as_u16());
    let headers = response.headers().all().clone();
    let mut out = tiny_http::Response::from_data(response.into_body()).with_status_code(status);
    for (key, value) in &headers {
        match tiny_http::Header::from_bytes(key.as_bytes(), value.as_bytes()) {
            Ok(header) => out.add_header(header),
            Err(()) => warn!(header = %key, "skipping invalid response header"),
        }
    }
    if let Err(e) = request.respond(out) {
        debug!(error = %e, "failed to send response");
    }
}
