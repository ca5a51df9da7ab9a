use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use docserve_base::{DocserveError, DocserveResult};

use crate::config::Config;
use crate::generator::generate_doc;

/// Capacity of the pending-regeneration queue.
const QUEUE_CAPACITY: usize = 256;

/// Watches the project tree and regenerates single documents on change.
///
/// Create and modify events are filtered at event time and pushed onto a
/// bounded queue consumed by one worker thread, so the same document is
/// never generated concurrently; a slow generation delays later events
/// instead of racing them. When the queue is full the event is dropped with
/// a warning.
///
/// Event-time eligibility checks only the extension allow-list (plus a
/// guard for the document directory itself); git ignore rules and the
/// excluded-directory list are not re-checked here.
pub struct FileWatcher {
    watcher: Option<RecommendedWatcher>,
    worker: Option<JoinHandle<()>>,
}

impl FileWatcher {
    /// Arm the watcher for `project_root` and start the worker thread.
    pub fn start(project_root: &Path, config: &Config) -> DocserveResult<Self> {
        let (tx, rx) = mpsc::sync_channel::<PathBuf>(QUEUE_CAPACITY);

        let docs_dir = config.docs_path(project_root);
        let filter_config = config.clone();
        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<Event>| match result {
                Ok(event) => enqueue_changes(&event, &filter_config, &docs_dir, &tx),
                Err(e) => warn!(error = %e, "filesystem watch error"),
            })
            .map_err(|e| DocserveError::message(format!("failed to create watcher: {e}")))?;

        watcher
            .watch(project_root, RecursiveMode::Recursive)
            .map_err(|e| {
                DocserveError::message(format!(
                    "failed to watch {}: {e}",
                    project_root.display()
                ))
            })?;

        let root = project_root.to_path_buf();
        let worker_config = config.clone();
        let worker = thread::spawn(move || run_worker(rx, &root, &worker_config));

        info!(root = %project_root.display(), "watching for changes");
        Ok(Self {
            watcher: Some(watcher),
            worker: Some(worker),
        })
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        // Stop the notify watcher first; that drops the queue sender, and
        // the worker exits once the queue is drained.
        self.watcher.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Queue every eligible path of a create/modify event for regeneration.
fn enqueue_changes(event: &Event, config: &Config, docs_dir: &Path, tx: &SyncSender<PathBuf>) {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return;
    }
    for path in &event.paths {
        if !is_watch_eligible(path, config, docs_dir) {
            continue;
        }
        match tx.try_send(path.clone()) {
            Ok(()) => debug!(path = %path.display(), "queued for regeneration"),
            Err(TrySendError::Full(_)) => {
                warn!(path = %path.display(), "regeneration queue full, dropping change event");
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Event-time eligibility: a non-directory path whose extension is in the
/// allow-list.
///
/// Paths under the document directory are dropped as well; without that
/// guard every generated `.md` file would re-trigger generation of its own
/// document.
fn is_watch_eligible(path: &Path, config: &Config, docs_dir: &Path) -> bool {
    if path.is_dir() {
        return false;
    }
    if path.starts_with(docs_dir) {
        return false;
    }
    config.is_supported(path)
}

/// Consume the queue, regenerating one document per change.
fn run_worker(rx: Receiver<PathBuf>, project_root: &Path, config: &Config) {
    while let Ok(path) = rx.recv() {
        match generate_doc(&path, project_root, config) {
            Ok(doc_path) => debug!(doc = %doc_path.display(), "regenerated document"),
            Err(e) => {
                warn!(source = %path.display(), error = %e, "failed to regenerate document");
            }
        }
    }
    debug!("watch worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn setup_project() -> (TempDir, Config) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        (temp_dir, Config::default())
    }

    /// Poll until the condition holds or the timeout expires.
    fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(50));
        }
        condition()
    }

    #[test]
    fn test_watch_eligibility() {
        let (temp_dir, config) = setup_project();
        let docs_dir = config.docs_path(temp_dir.path());
        fs::create_dir_all(&docs_dir).unwrap();
        fs::write(temp_dir.path().join("app.py"), "# app\n").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "plain\n").unwrap();
        fs::write(docs_dir.join("app.md"), "# app.py\n").unwrap();

        // Supported extension outside the document directory
        assert!(is_watch_eligible(
            &temp_dir.path().join("app.py"),
            &config,
            &docs_dir
        ));
        // Unsupported extension
        assert!(!is_watch_eligible(
            &temp_dir.path().join("notes.txt"),
            &config,
            &docs_dir
        ));
        // Generated documents must not re-trigger generation
        assert!(!is_watch_eligible(
            &docs_dir.join("app.md"),
            &config,
            &docs_dir
        ));
        // Directories are never eligible
        assert!(!is_watch_eligible(temp_dir.path(), &config, &docs_dir));
    }

    #[test]
    fn test_worker_regenerates_queued_paths() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("app.py");
        fs::write(&source, "# queued\n").unwrap();

        let (tx, rx) = mpsc::sync_channel::<PathBuf>(QUEUE_CAPACITY);
        tx.send(source).unwrap();
        drop(tx);

        run_worker(rx, temp_dir.path(), &config);

        let doc = temp_dir.path().join("docs/app.md");
        assert!(doc.exists());
        assert!(fs::read_to_string(doc).unwrap().contains("queued"));
    }

    #[test]
    fn test_worker_survives_generation_failure() {
        let (temp_dir, config) = setup_project();
        let good = temp_dir.path().join("good.py");
        fs::write(&good, "# fine\n").unwrap();

        let (tx, rx) = mpsc::sync_channel::<PathBuf>(QUEUE_CAPACITY);
        tx.send(temp_dir.path().join("missing.py")).unwrap();
        tx.send(good).unwrap();
        drop(tx);

        run_worker(rx, temp_dir.path(), &config);

        assert!(!temp_dir.path().join("docs/missing.md").exists());
        assert!(temp_dir.path().join("docs/good.md").exists());
    }

    #[test]
    fn test_watcher_regenerates_on_modification() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("app.py");
        fs::write(&source, "# before\n").unwrap();

        let watcher = FileWatcher::start(temp_dir.path(), &config).unwrap();
        fs::write(&source, "# after\n").unwrap();

        let doc = temp_dir.path().join("docs/app.md");
        let updated = wait_for(Duration::from_secs(5), || {
            fs::read_to_string(&doc)
                .map(|content| content.contains("after"))
                .unwrap_or(false)
        });
        drop(watcher);

        assert!(updated, "expected document to be regenerated after change");
    }

    #[test]
    fn test_watcher_ignores_unsupported_extensions() {
        let (temp_dir, config) = setup_project();
        let watcher = FileWatcher::start(temp_dir.path(), &config).unwrap();

        fs::write(temp_dir.path().join("notes.txt"), "plain\n").unwrap();
        fs::write(temp_dir.path().join("app.py"), "# tracked\n").unwrap();

        let tracked = temp_dir.path().join("docs/app.md");
        let appeared = wait_for(Duration::from_secs(5), || tracked.exists());
        drop(watcher);

        assert!(appeared, "expected document for supported file");
        assert!(!temp_dir.path().join("docs/notes.md").exists());
    }
}
