//! Stderr logger backing the `log` facade.
//!
//! The parser crate reports non-fatal field failures through `log::warn!`;
//! this logger routes them to stderr so the report on stdout stays clean.

use log::{LevelFilter, Metadata, Record, SetLoggerError};

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level().to_string().to_lowercase(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the stderr logger with the given maximum level.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}
