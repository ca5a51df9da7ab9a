use std::path::Path;

use git2::Repository;
use tracing::{debug, warn};

/// Git repository context used for ignore filtering.
///
/// Wraps the repository discovered at or above the project root. When no
/// repository exists, ignore filtering is disabled entirely rather than
/// failing the scan.
pub struct GitContext {
    repo: Repository,
}

impl GitContext {
    /// Discover a repository at `path`, searching parent directories.
    pub fn discover(path: &Path) -> Option<Self> {
        match Repository::discover(path) {
            Ok(repo) => {
                debug!(path = %path.display(), "discovered git repository");
                Some(Self { repo })
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no git repository found");
                None
            }
        }
    }

    /// True if git ignore rules exclude the path.
    ///
    /// Check failures are treated as "not ignored".
    pub fn is_ignored(&self, path: &Path) -> bool {
        match self.repo.is_path_ignored(path) {
            Ok(ignored) => ignored,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignore check failed, treating as not ignored");
                false
            }
        }
    }
}

impl std::fmt::Debug for GitContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitContext")
            .field("workdir", &self.repo.workdir())
            .finish()
    }
}
