use core::fmt::Write;

use log::{LevelFilter, Log, Metadata, Record};

use crate::serial::uart1;

/// Writes each record as one `[LEVEL] message` line on USART1
struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let mut writer = uart1::LogWriter;
            write!(writer, "[{}] {}\r\n", record.level(), record.args()).ok();
        }
    }

    fn flush(&self) {}
}

static LOGGER: SerialLogger = SerialLogger;

/// Must be called once, after the serial port is initialized and before any
/// interrupt handler logs.
pub fn init(level: LevelFilter) {
    // Cortex-M0 has no compare-and-swap, so only the racy setter exists.
    unsafe {
        log::set_logger_racy(&LOGGER).ok();
        log::set_max_level_racy(level);
    }
}
