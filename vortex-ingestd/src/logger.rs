use flexi_logger::{DeferredNow, Logger, LoggerHandle, WriteMode};
use log::Record;
use std::io::Write;
use std::thread;

/// Initializes the logger with custom formatting, writing to stderr.
///
/// Unlike the background-agent lineage this is descended from, this binary runs in the
/// foreground under a supervisor that captures stdout/stderr, so file-only logging would hide
/// operational output; `flexi_logger`'s default target (stderr) is kept rather than redirected
/// to a log directory.
pub fn init_logger(level: &str) -> Result<LoggerHandle, Box<dyn std::error::Error>> {
    let handle = Logger::try_with_str(level)?
        .write_mode(WriteMode::BufferAndFlush)
        .format(log_format)
        .start()?;
    Ok(handle)
}

/// Custom log line format: includes timestamp, level, source file/line, thread name, and message.
fn log_format(w: &mut dyn Write, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
    write!(
        w,
        "{} [{:<5}] [{}:{}] [{}] {}",
        now.format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.file().unwrap_or("<unknown>"),
        record.line().unwrap_or(0),
        thread::current().name().unwrap_or("<unnamed>"),
        &record.args()
    )
}
