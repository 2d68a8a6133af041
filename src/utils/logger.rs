/*
 * Kernel Logging System
 *
 * This module implements the `log` backend for the timer subsystem. Records
 * are formatted as "[LEVEL] message" and handed to a `LogSink`; on x86_64
 * that is the COM2 UART (`drivers::serial::COM2_SINK`).
 *
 * Why this is important:
 * - Provides different log levels for filtering messages
 * - Integrates with Rust's standard logging framework
 * - Decouples formatting from the output device
 */

use core::fmt::{self, Write};

use log::{Level, Metadata, Record, SetLoggerError};
use spin::Once;

/// Output device for formatted log lines
pub trait LogSink: Sync {
    fn write_str(&self, s: &str);
}

/// Custom logger implementation for CluuLogger.
struct CluuLogger {
    level: Level,
}

impl log::Log for CluuLogger {
    /// Checks if the given log level is enabled.
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    /// Logs the record by writing it to the installed sink.
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(sink) = SINK.get() {
            let _ = writeln!(SinkWriter(*sink), "[{}] {}", record.level(), record.args());
        }
    }

    /// Flushes the logger (no-op in this case).
    fn flush(&self) {}
}

struct SinkWriter(&'static dyn LogSink);

impl Write for SinkWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0.write_str(s);
        Ok(())
    }
}

static SINK: Once<&'static dyn LogSink> = Once::new();
static LOGGER: Once<CluuLogger> = Once::new();

/// Install the logger, writing records at or above `level` to `sink`
///
/// Fails if a logger (this one or another) is already installed.
pub fn init(sink: &'static dyn LogSink, level: Level) -> Result<(), SetLoggerError> {
    let logger = LOGGER.call_once(|| CluuLogger { level });
    log::set_logger(logger)?;
    SINK.call_once(|| sink);
    log::set_max_level(level.to_level_filter());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use std::sync::Mutex;

    struct CaptureSink(Mutex<String>);

    impl LogSink for CaptureSink {
        fn write_str(&self, s: &str) {
            self.0.lock().unwrap().push_str(s);
        }
    }

    static CAPTURE: CaptureSink = CaptureSink(Mutex::new(String::new()));

    #[test]
    fn test_records_reach_sink_with_level_prefix() {
        init(&CAPTURE, Level::Info).unwrap();

        log::info!("Timer: {} ticks", 42);
        log::debug!("filtered out");

        let out = CAPTURE.0.lock().unwrap().clone();
        assert!(out.contains("[INFO] Timer: 42 ticks\n"));
        assert!(!out.contains("filtered out"));

        // A second logger cannot be installed
        assert!(init(&CAPTURE, Level::Trace).is_err());
    }
}
