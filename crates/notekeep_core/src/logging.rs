//! Logging bootstrap and policy.
//!
//! # Responsibility
//! - Initialize rotating file logs (duplicated to stdout) once per process.
//! - Keep diagnostic events stable, key=value formatted, metadata-only.
//!
//! # Invariants
//! - Initialization is idempotent for the same directory.
//! - Re-initialization with a different directory or level is rejected.
//! - Initialization never panics.

use std::path::{Path, PathBuf};

use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "notekeep";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Initializes process logging with level and directory.
///
/// # Errors
/// - Returns an error when `level` is not a valid log specification.
/// - Returns an error when `log_dir` cannot be created.
/// - Returns an error on re-initialization with a different level or
///   directory.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), String> {
    let level = level.trim().to_ascii_lowercase();
    let log_dir = log_dir.as_ref().to_path_buf();

    if let Some(state) = LOGGING_STATE.get() {
        if state.log_dir != log_dir {
            return Err(format!(
                "logging already initialized at `{}`; refusing to switch to `{}`",
                state.log_dir.display(),
                log_dir.display()
            ));
        }
        if state.level != level {
            return Err(format!(
                "logging already initialized with level `{}`; refusing to switch to `{}`",
                state.level, level
            ));
        }
        return Ok(());
    }

    let init_level = level.clone();
    let init_dir = log_dir.clone();
    LOGGING_STATE
        .get_or_try_init(|| -> Result<LoggingState, String> {
            std::fs::create_dir_all(&init_dir).map_err(|err| {
                format!(
                    "failed to create log directory `{}`: {err}",
                    init_dir.display()
                )
            })?;

            let logger = Logger::try_with_str(&init_level)
                .map_err(|err| format!("invalid log level `{init_level}`: {err}"))?
                .log_to_file(
                    FileSpec::default()
                        .directory(init_dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .duplicate_to_stdout(Duplicate::Info)
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
                .map_err(|err| format!("failed to start logger: {err}"))?;

            info!(
                "event=logging_init module=core status=ok level={} log_dir={} version={}",
                init_level,
                init_dir.display(),
                env!("CARGO_PKG_VERSION")
            );

            Ok(LoggingState {
                level: init_level,
                log_dir: init_dir,
                _logger: logger,
            })
        })
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use tempfile::tempdir;

    #[test]
    fn init_is_idempotent_and_rejects_switches() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs");
        init_logging("info", &path).unwrap();
        // Same settings again: fine.
        init_logging("info", &path).unwrap();
        // Different directory: rejected.
        let err = init_logging("info", dir.path().join("elsewhere")).unwrap_err();
        assert!(err.contains("refusing to switch"));
        // Different level, same directory: rejected.
        let err = init_logging("debug", &path).unwrap_err();
        assert!(err.contains("refusing to switch"));
    }
}
