//! Diagnostic logging. The terminal belongs to the UI, so tracing output is
//! only ever written to a file.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter directives.
pub const LOG_FILTER_ENV: &str = "PUKU_LOG";
/// Environment variable naming the log file when `--debug-log` is absent.
pub const LOG_FILE_ENV: &str = "PUKU_LOG_FILE";

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber writing to `path` (appending).
pub fn init_tracing(path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| -> Box<dyn Error> { err })?;
    Ok(())
}

fn build_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
