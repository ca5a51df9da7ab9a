//! Engine crate for docserve: scans a project tree, turns each supported
//! source file into a Markdown document, keeps the documents fresh via a
//! filesystem watcher and serves them through a small web frontend.

pub mod comments;
pub mod config;
pub mod generator;
pub mod render;
pub mod repo;
pub mod scanner;
pub mod service;
pub mod watcher;

pub use comments::extract_comments;
pub use config::{Config, ServerConfig, load_config};
pub use generator::{doc_filename, generate_doc, render_document};
pub use repo::GitContext;
pub use scanner::{ScanError, ScanResult, scan_project};
pub use service::DocService;
pub use watcher::FileWatcher;
