use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use docserve_base::{DocserveError, DocserveResult};

use crate::config::Config;
use crate::generator::{doc_filename, generate_doc};
use crate::repo::GitContext;

/// Results of one full project scan.
///
/// Scanning is fail-tolerant: per-file generation failures are collected
/// alongside the successfully generated documents instead of aborting the
/// walk.
#[derive(Debug)]
pub struct ScanResult {
    /// Documents written during the scan.
    pub generated: Vec<PathBuf>,
    /// Errors encountered during the scan (non-fatal).
    pub errors: Vec<ScanError>,
}

/// Error encountered while processing a single source file.
#[derive(Debug)]
pub struct ScanError {
    /// The source file being processed when the error occurred.
    pub source_path: PathBuf,
    /// The error that occurred.
    pub error: DocserveError,
}

/// Scan the project tree and generate a document for every eligible file.
///
/// Eligible means: the extension is in the allow-list, no path segment
/// matches an excluded directory name, and git ignore rules do not exclude
/// the file (when the project is inside a repository; otherwise all files
/// pass that filter). The walk order carries no guarantee and one file's
/// failure never aborts the scan.
#[instrument(skip(config))]
pub fn scan_project(project_root: &Path, config: &Config) -> DocserveResult<ScanResult> {
    let git = GitContext::discover(project_root);
    let docs_dir = config.docs_path(project_root);
    fs::create_dir_all(&docs_dir).map_err(|e| DocserveError::file(docs_dir, e))?;

    let mut generated = Vec::new();
    let mut errors = Vec::new();
    // Tracks derived document names so basename collisions are surfaced
    // instead of silently overwriting one another.
    let mut seen_names: HashMap<String, PathBuf> = HashMap::new();

    let walker = WalkDir::new(project_root).into_iter().filter_entry(|entry| {
        entry.depth() == 0
            || !(entry.file_type().is_dir()
                && is_excluded_name(entry.file_name(), &config.excluded_dirs))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "error walking project tree");
                errors.push(ScanError {
                    source_path: e.path().map(Path::to_path_buf).unwrap_or_default(),
                    error: DocserveError::message(e.to_string()),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !config.is_supported(path) {
            continue;
        }
        if let Some(git) = &git
            && git.is_ignored(path)
        {
            continue;
        }

        if let Some(name) = doc_filename(path) {
            if let Some(previous) = seen_names.get(&name) {
                warn!(
                    doc = %name,
                    first = %previous.display(),
                    second = %path.display(),
                    "source files share a basename, the later document overwrites the earlier one"
                );
            } else {
                seen_names.insert(name, path.to_path_buf());
            }
        }

        match generate_doc(path, project_root, config) {
            Ok(doc_path) => generated.push(doc_path),
            Err(e) => {
                warn!(source = %path.display(), error = %e, "failed to generate document");
                errors.push(ScanError {
                    source_path: path.to_path_buf(),
                    error: e,
                });
            }
        }
    }

    info!(
        generated = generated.len(),
        errors = errors.len(),
        "project scan complete"
    );
    Ok(ScanResult { generated, errors })
}

/// True if the directory name matches one of the excluded names.
fn is_excluded_name(name: &OsStr, excluded_dirs: &[String]) -> bool {
    name.to_str()
        .map(|name| excluded_dirs.iter().any(|d| d == name))
        .unwrap_or(false)
}
