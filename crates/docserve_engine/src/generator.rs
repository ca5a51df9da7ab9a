use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use docserve_base::{DocserveError, DocserveResult};

use crate::comments::extract_comments;
use crate::config::Config;

/// Derive the document name for a source file: the file name with its
/// extension replaced by `.md`.
pub fn doc_filename(source_path: &Path) -> Option<String> {
    let stem = source_path.file_stem()?.to_str()?;
    Some(format!("{stem}.md"))
}

/// Render the document template.
///
/// The output is fully determined by its inputs, so regenerating an
/// unchanged source file produces byte-identical documents.
pub fn render_document(filename: &str, summary: &str, code: &str) -> String {
    format!("# {filename}\n\n## Summary\n\n{summary}\n\n## Full Code\n\n```\n{code}\n```")
}

/// Generate one Markdown document for `source_path` under the project's
/// document directory.
///
/// The document directory is created when absent and an existing document
/// with the same derived name is overwritten without prompting. If the
/// source cannot be read (missing, unreadable, not UTF-8) no document is
/// written and the error is returned for the caller to log; other files are
/// unaffected.
#[instrument(skip_all, fields(source = %source_path.display()))]
pub fn generate_doc(
    source_path: &Path,
    project_root: &Path,
    config: &Config,
) -> DocserveResult<PathBuf> {
    let filename = source_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            DocserveError::message(format!(
                "source path has no usable file name: {}",
                source_path.display()
            ))
        })?;

    let code = fs::read_to_string(source_path)
        .map_err(|e| DocserveError::file(source_path.to_path_buf(), e))?;

    let summary = extract_comments(&code);
    let content = render_document(filename, &summary, &code);

    let doc_name = doc_filename(source_path).unwrap_or_else(|| format!("{filename}.md"));
    let docs_dir = config.docs_path(project_root);
    fs::create_dir_all(&docs_dir).map_err(|e| DocserveError::file(docs_dir.clone(), e))?;

    let doc_path = docs_dir.join(doc_name);
    fs::write(&doc_path, content).map_err(|e| DocserveError::file(doc_path.clone(), e))?;

    info!(doc = %doc_path.display(), "generated documentation for {filename}");
    Ok(doc_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use std::fs;
    use tempfile::TempDir;

    fn setup_project() -> (TempDir, Config) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        (temp_dir, Config::default())
    }

    #[test]
    fn test_doc_filename() {
        assert_eq!(doc_filename(Path::new("src/app.py")), Some("app.md".to_string()));
        assert_eq!(doc_filename(Path::new("style.css")), Some("style.md".to_string()));
        assert_eq!(doc_filename(Path::new("notes.md")), Some("notes.md".to_string()));
    }

    #[test]
    fn test_render_document_template() {
        let doc = render_document("main.py", "entry point", "print('hi')");
        expect![[r#"
            # main.py

            ## Summary

            entry point

            ## Full Code

            ```
            print('hi')
            ```"#]]
        .assert_eq(&doc);
    }

    #[test]
    fn test_generate_doc_writes_document() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("app.py");
        fs::write(&source, "# the app\nrun()\n").unwrap();

        let doc_path = generate_doc(&source, temp_dir.path(), &config).unwrap();

        assert_eq!(doc_path, temp_dir.path().join("docs/app.md"));
        let content = fs::read_to_string(&doc_path).unwrap();
        assert!(content.starts_with("# app.py\n\n## Summary\n\nthe app\n"));
        assert!(content.contains("## Full Code"));
        assert!(content.contains("run()"));
    }

    #[test]
    fn test_generate_doc_creates_docs_dir() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("index.js");
        fs::write(&source, "// frontend\n").unwrap();
        assert!(!temp_dir.path().join("docs").exists());

        generate_doc(&source, temp_dir.path(), &config).unwrap();

        assert!(temp_dir.path().join("docs").is_dir());
    }

    #[test]
    fn test_generate_doc_is_idempotent() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("app.py");
        fs::write(&source, "# stable\nx = 1\n").unwrap();

        let first = generate_doc(&source, temp_dir.path(), &config).unwrap();
        let first_bytes = fs::read(&first).unwrap();
        let second = generate_doc(&source, temp_dir.path(), &config).unwrap();
        let second_bytes = fs::read(&second).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_bytes, second_bytes);
    }

    #[test]
    fn test_generate_doc_overwrites_existing() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("app.py");

        fs::write(&source, "# before\n").unwrap();
        generate_doc(&source, temp_dir.path(), &config).unwrap();

        fs::write(&source, "# after\n").unwrap();
        let doc_path = generate_doc(&source, temp_dir.path(), &config).unwrap();

        let content = fs::read_to_string(doc_path).unwrap();
        assert!(content.contains("after"));
        assert!(!content.contains("before"));
    }

    #[test]
    fn test_generate_doc_missing_source_skips_write() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("gone.py");

        let result = generate_doc(&source, temp_dir.path(), &config);

        assert!(result.is_err());
        assert!(!temp_dir.path().join("docs/gone.md").exists());
    }

    #[test]
    fn test_generate_doc_non_utf8_source_skips_write() {
        let (temp_dir, config) = setup_project();
        let source = temp_dir.path().join("binary.py");
        fs::write(&source, [0xFF, 0xFE, 0xFD]).unwrap();

        let result = generate_doc(&source, temp_dir.path(), &config);

        assert!(result.is_err());
        assert!(!temp_dir.path().join("docs/binary.md").exists());
    }
}
