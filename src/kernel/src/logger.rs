//! `log` backend writing to COM1.
//!
//! Records are formatted as `[LEVEL] target: message`. The filter is `Info`
//! unless the `verbose-log` feature is enabled.

use crate::serial_println;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// The kernel logger.
pub struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

/// The most verbose level the logger emits.
pub const fn max_level() -> LevelFilter {
    if cfg!(feature = "verbose-log") {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    }
}

/// Installs [`SerialLogger`] as the global logger.
///
/// The serial port must be initialized first.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(max_level());
    Ok(())
}

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            serial_println!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}
