//! Logger setup for the control executables
//!
//! Records go to two sinks: the console, with coloured level tags, and the
//! session's log file as plain text so it stays greppable.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info};
use fern::{Dispatch, FormatCallback};
use colored::Colorize;
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Log target of the control core library.
///
/// The core logs every tick at `trace` level, so it gets its own filter to
/// keep the log file readable during long runs.
pub const CORE_LOG_TARGET: &str = "ctrl_lib";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Cannot open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger is already set: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution.
///
/// `min_level` applies to every target except the control core, which is
/// filtered by `core_level` (see `CORE_LOG_TARGET`). Must only be called
/// once.
pub fn logger_init(
    min_level: LevelFilter,
    core_level: LevelFilter,
    session: &Session
) -> Result<(), LoggerInitError> {

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let console = Dispatch::new()
        .format(|out, message, record| {
            format_record(out, message, record, level_tag(record.level()).to_string())
        })
        .chain(std::io::stdout());

    let file = Dispatch::new()
        .format(|out, message, record| {
            format_record(out, message, record, level_tag(record.level()).clear().to_string())
        })
        .chain(log_file);

    Dispatch::new()
        .level(min_level)
        .level_for(CORE_LOG_TARGET, core_level)
        .chain(console)
        .chain(file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    info!("    Session epoch: {}", session::get_epoch());
    info!("    Log level: {:?} (core: {:?})", min_level, core_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Write a record prefixed with the session time and its level tag.
///
/// Debug and trace records also carry their target so the core's output can
/// be told apart from the executable's.
fn format_record(
    out: FormatCallback,
    message: &std::fmt::Arguments,
    record: &log::Record,
    tag: String
) {
    let elapsed_s = session::get_elapsed_seconds();

    match record.level() > log::Level::Info {
        true => out.finish(format_args!(
            "[{:10.6} {}] {}: {}", elapsed_s, tag, record.target(), message
        )),
        false => out.finish(format_args!(
            "[{:10.6} {}] {}", elapsed_s, tag, message
        ))
    }
}

/// Three letter tag of a log level, coloured for the console.
fn level_tag(level: log::Level) -> colored::ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_plain_level_tags() {
        let tags: Vec<String> = [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace
        ].iter().map(|l| level_tag(*l).clear().to_string()).collect();

        assert_eq!(tags, vec!["ERR", "WRN", "INF", "DBG", "TRC"]);
    }
}
