//! `log` backend that forwards records to the frontend's log interface.
//!
//! Until the frontend hands over `RETRO_ENVIRONMENT_GET_LOG_INTERFACE`, or
//! when it offers none, records go to stderr.

#![allow(unsafe_code)]

use std::ffi::{c_uint, CString};
use std::sync::{Mutex, PoisonError};

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::ffi::{LogPrintfFn, LOG_DEBUG, LOG_ERROR, LOG_INFO, LOG_WARN};

const MAX_LEVEL: LevelFilter = if cfg!(debug_assertions) {
    LevelFilter::Debug
} else {
    LevelFilter::Info
};

struct RetroLogger {
    callback: Mutex<Option<LogPrintfFn>>,
}

static LOGGER: RetroLogger = RetroLogger {
    callback: Mutex::new(None),
};

const fn retro_level(level: Level) -> c_uint {
    match level {
        Level::Error => LOG_ERROR,
        Level::Warn => LOG_WARN,
        Level::Info => LOG_INFO,
        Level::Debug | Level::Trace => LOG_DEBUG,
    }
}

impl Log for RetroLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= MAX_LEVEL
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        let callback = *self.callback.lock().unwrap_or_else(PoisonError::into_inner);
        match callback {
            Some(callback) => {
                let Ok(text) = CString::new(message.replace('\0', " ")) else {
                    return;
                };
                // SAFETY: "%s" consumes exactly the one NUL-terminated
                // argument passed.
                unsafe { callback(retro_level(record.level()), c"[chip8] %s\n".as_ptr(), text.as_ptr()) };
            }
            None => eprintln!("[chip8] {}: {message}", record.level()),
        }
    }

    fn flush(&self) {}
}

/// Registers the logger once per process. Later calls are no-ops.
pub fn install() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(MAX_LEVEL);
    }
}

/// Switches output to the frontend log function, or back to stderr.
pub fn set_frontend_callback(callback: Option<LogPrintfFn>) {
    *LOGGER.callback.lock().unwrap_or_else(PoisonError::into_inner) = callback;
}

#[cfg(test)]
mod tests {
    use super::retro_level;
    use crate::ffi::{LOG_DEBUG, LOG_ERROR, LOG_INFO, LOG_WARN};
    use log::Level;

    #[test]
    fn levels_map_to_libretro_levels() {
        assert_eq!(retro_level(Level::Error), LOG_ERROR);
        assert_eq!(retro_level(Level::Warn), LOG_WARN);
        assert_eq!(retro_level(Level::Info), LOG_INFO);
        assert_eq!(retro_level(Level::Trace), LOG_DEBUG);
    }
}
