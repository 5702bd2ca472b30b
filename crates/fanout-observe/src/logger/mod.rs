mod config;
mod error;
mod log;
mod object;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use object::{LoggerFormat, LoggerLevel, LoggerTimeZone, init_local_offset};

/// Initializes the global tracing subscriber with the given configuration.
///
/// Once initialized, all `tracing` macros (`info!`, `warn!`, etc.) route
/// through this subscriber. Calling it twice returns
/// [`LoggerError::AlreadyInitialized`].
///
/// For [`LoggerTimeZone::Local`], call [`init_local_offset`] in `main()`
/// before spawning any threads; offset detection fails in multi-thread
/// contexts on most Unix platforms.
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    match cfg.format {
        LoggerFormat::Text => log::logger_text(cfg),
        LoggerFormat::Json => log::logger_json(cfg),
        LoggerFormat::Journald => log::logger_journald(cfg),
    }
}
