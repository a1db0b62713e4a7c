use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};

/// Directory the rotating log files are written to.
pub const LOG_DIRECTORY: &str = "logs";

/// Installs the process-wide logger.
///
/// `base_level` uses the `RUST_LOG` syntax (`"info"`, `"cerebra=debug"`, ...).
/// Everything is written to a size-rotated file under [`LOG_DIRECTORY`] and
/// duplicated to stdout; warnings and errors also go to stderr.
///
/// Keep the returned handle alive for as long as logging is needed.
pub fn setup_logging(base_level: &str) -> LoggerHandle {
    let handle = Logger::try_with_env_or_str(base_level)
        .unwrap_or_else(|e| panic!("Invalid log specification '{}': {}", base_level, e))
        .log_to_file(
            FileSpec::default()
                .directory(LOG_DIRECTORY)
                .basename("cerebra"),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            Criterion::Size(1024 * 1024), //1MB
            Naming::Timestamps,
            Cleanup::KeepLogFiles(5),
        )
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {}", e));

    log::info!("Logging at '{}' to {}/", base_level, LOG_DIRECTORY);
    handle
}
