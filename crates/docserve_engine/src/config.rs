use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use docserve_base::{DocserveError, DocserveResult};

/// Name of the optional per-project configuration file.
pub const CONFIG_FILE: &str = "docserve.toml";

/// Configuration for one documented project.
///
/// Every component receives the configuration it needs at construction;
/// there is no ambient state. The defaults reproduce the built-in allow-list
/// and exclusion list, and `docserve.toml` in the project root can override
/// any field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File extensions (with leading dot) eligible for documentation.
    pub extensions: Vec<String>,
    /// Directory names excluded from scanning.
    pub excluded_dirs: Vec<String>,
    /// Output directory for generated documents, relative to the project root.
    pub docs_dir: String,
    /// Title shown on the index page. Defaults to the project directory name.
    pub title: Option<String>,
    /// Web server settings.
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: [".py", ".js", ".html", ".css", ".md"]
                .map(String::from)
                .to_vec(),
            excluded_dirs: [
                "venv",
                ".git",
                "__pycache__",
                "docs",
                "templates",
                "target",
                "node_modules",
            ]
            .map(String::from)
            .to_vec(),
            docs_dir: "docs".to_string(),
            title: None,
            server: ServerConfig::default(),
        }
    }
}

/// Settings for the web frontend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    /// True if the path's extension is in the allow-list.
    pub fn is_supported(&self, path: &Path) -> bool {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => {
                let dotted = format!(".{ext}");
                self.extensions.iter().any(|e| e == &dotted)
            }
            None => false,
        }
    }

    /// The document directory for a given project root.
    pub fn docs_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.docs_dir)
    }
}

/// Load configuration from `docserve.toml` in the project root.
///
/// A missing file yields the defaults; a file that exists but does not
/// parse is an error.
pub fn load_config(project_root: &Path) -> DocserveResult<Config> {
    let path = project_root.join(CONFIG_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(DocserveError::file(path, e)),
    };
    toml::from_str(&raw).map_err(|e| DocserveError::Config(e.to_string()))
}
