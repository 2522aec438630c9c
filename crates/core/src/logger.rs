//! Log sink for passcode lifecycle events.
//!
//! The store reports through a [`Logger`] held in
//! [`PasscodeConfig`](crate::config::PasscodeConfig). Messages carry the user
//! id and the outcome only; plaintext codes and hashes are never passed in.

use std::fmt;
use std::sync::Arc;

/// Severity of a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        })
    }
}

/// Destination for store events.
///
/// Implementors provide [`Logger::log`]; the per-level helpers forward to it.
///
/// ```rust
/// use passcode_store_core::logger::{LogLevel, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, level: LogLevel, message: &str) {
///         eprintln!("[{level}] {message}");
///     }
/// }
///
/// StderrLogger.info("Passcode store bound to cache 'passcodeCache'");
/// ```
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}

impl fmt::Debug for dyn Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Logger")
    }
}

/// Emits events as `tracing` events under the `passcode_store` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "passcode_store", "{}", message),
            LogLevel::Info => tracing::info!(target: "passcode_store", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "passcode_store", "{}", message),
            LogLevel::Error => tracing::error!(target: "passcode_store", "{}", message),
        }
    }
}

/// Logger installed by [`PasscodeConfig::default`](crate::config::PasscodeConfig).
pub fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
