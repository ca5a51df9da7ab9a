use std::path::PathBuf;
use std::process;

use clap::Parser;

use docserve_base::server::{HttpServerConfig, start_http_server};
use docserve_base::tracing::init_tracing;
use docserve_engine::{DocService, FileWatcher, GitContext, load_config, scan_project};

/// Generate and serve documentation for a code project.
///
/// Scans the project once at startup, keeps the generated documents fresh
/// while source files change, and serves them at `/` until interrupted.
#[derive(Parser, Debug)]
#[command(name = "docserve", version, about)]
struct Cli {
    /// The directory of the project to document.
    #[arg(default_value = ".")]
    project_dir: PathBuf,

    /// Run even if the directory is not a git repository.
    #[arg(short = 'i', long)]
    ignore_git: bool,

    /// Override the host the web server binds to.
    #[arg(long)]
    host: Option<String>,

    /// Override the port the web server listens on.
    #[arg(long)]
    port: Option<u16>,
}

fn main() {
    init_tracing().unwrap();
    let cli = Cli::parse();

    let project_root = match cli.project_dir.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            eprintln!(
                "Error: cannot access project directory {}: {}",
                cli.project_dir.display(),
                e
            );
            process::exit(1);
        }
    };

    if !cli.ignore_git && GitContext::discover(&project_root).is_none() {
        eprintln!(
            "Error: {} is not a git repository. Use -i or --ignore-git to run anyway.",
            project_root.display()
        );
        process::exit(1);
    }

    let mut config = match load_config(&project_root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let scan = match scan_project(&project_root, &config) {
        Ok(scan) => scan,
        Err(e) => {
            eprintln!("Error: initial scan failed: {}", e);
            process::exit(1);
        }
    };
    println!("Generated {} documents", scan.generated.len());
    if !scan.errors.is_empty() {
        eprintln!("\nWarnings during the initial scan:");
        for error in &scan.errors {
            eprintln!("  - {}: {}", error.source_path.display(), error.error);
        }
    }

    let _watcher = match FileWatcher::start(&project_root, &config) {
        Ok(watcher) => watcher,
        Err(e) => {
            eprintln!("Error: failed to start the file watcher: {}", e);
            process::exit(1);
        }
    };

    let title = config.title.clone().unwrap_or_else(|| {
        project_root
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("Documentation")
            .to_string()
    });
    let service = DocService::new(config.docs_path(&project_root), title);

    let server_config = HttpServerConfig::new(config.server.host.clone(), config.server.port);
    let handle = match start_http_server(Box::new(service), server_config) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Error: failed to start the web server: {}", e);
            process::exit(1);
        }
    };

    println!(
        "Serving documentation at http://{}:{}/",
        config.server.host,
        handle.port()
    );
    handle.join();
}
