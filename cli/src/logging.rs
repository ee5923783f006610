//! Logging initialization.
//!
//! Reads `RUST_LOG` (filter, default `info`) and `LOG_FILE` (path). With `LOG_FILE` set, logs
//! are appended to that file through a non-blocking writer, plain text, one line per event.
//! Otherwise they go to stderr, so `quill run` keeps stdout for the JSON result only.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::log_format::RequestTagged;

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper_util=off"))
}

/// Splits `LOG_FILE` into the directory and file name expected by `tracing_appender`.
fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), Box<dyn std::error::Error>> {
    let name = path
        .file_name()
        .ok_or_else(|| format!("LOG_FILE has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir.to_path_buf(), PathBuf::from(name)))
}

/// Installs the global subscriber. Keep the returned guard alive until exit so buffered file
/// logs are flushed.
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    match std::env::var("LOG_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            let (dir, name) = split_log_path(Path::new(&path))?;
            std::fs::create_dir_all(&dir)?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let file_layer = tracing_subscriber::fmt::layer()
                .event_format(RequestTagged::new())
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            tracing_subscriber::registry().with(file_layer).try_init()?;
            tracing::info!(path = %path, "quill logging to file");
            Ok(Some(guard))
        }
        _ => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter());
            tracing_subscriber::registry().with(stderr_layer).try_init()?;
            Ok(None)
        }
    }
}
