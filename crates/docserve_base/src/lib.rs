//! Foundation crate for docserve: shared error handling, tracing setup and
//! the HTTP plumbing used by the web frontend.

pub mod error;
pub mod http;
pub mod server;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{DocserveError, DocserveResult};
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpService, HttpStatusCode};
pub use server::{HttpServerConfig, HttpServerHandle, start_http_server};
