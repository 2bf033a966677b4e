//! Log output setup.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::platform::path::expand;

/// Builds the level filter.
///
/// Without `debug` the level is forced to `info` and `RUST_LOG` is ignored.
fn build_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    }
}

/// Initialises logging to stderr, or to `config.file` when set.
///
/// The log file is truncated on start. If it cannot be created, logging falls
/// back to stderr and the failure is reported there.
pub fn init(config: &LoggingConfig) {
    let filter = build_filter(config.debug);

    if config.file.trim().is_empty() {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        return;
    }

    let path = expand(&config.file);
    match open_log_file(&path) {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(err) => {
            let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
            tracing::warn!(path = %path.display(), error = %err, "failed to open log file, logging to stderr");
        }
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}
