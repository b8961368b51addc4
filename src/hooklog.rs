//! Routes log records to the agent's log via the juju-log hook tool.

use std::process::Command;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct JujuLog;

impl Log for JujuLog {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };

        // a failed log write is dropped, not surfaced
        let message = record.args().to_string();
        let _ = Command::new("juju-log")
            .args(&["-l", level, message.as_str()])
            .status();
    }

    fn flush(&self) {}
}

static LOGGER: JujuLog = JujuLog;

pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(LevelFilter::Debug);
    Ok(())
}
