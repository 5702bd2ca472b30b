//! Observability: tracing subscriber setup and the per-target console
//! reporter.
mod logger;
pub use logger::{
    LoggerConfig, LoggerError, LoggerFormat, LoggerLevel, LoggerTimeZone, init_local_offset,
    init_logger,
};

mod reporter;
pub use reporter::ConsoleReport;
