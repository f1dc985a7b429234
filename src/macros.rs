//! Logging macros for ergonomic log message formatting.
//!
//! The macros capture the call site and evaluate to the handler's
//! [`Result`](crate::Result). Attributes follow the message after a `;`:
//!
//! ```
//! use log_dedup::prelude::*;
//! use log_dedup::{info, warn};
//!
//! let sink = MemoryAppender::new();
//! let logger = Logger::new(DedupHandler::increment(sink.clone()));
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//!
//! // With attributes
//! warn!(logger, "slow request"; "path" => "/api", "elapsed_ms" => 1250).unwrap();
//!
//! assert_eq!(sink.last().unwrap().attrs.len(), 2);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use log_dedup::prelude::*;
/// # let logger = Logger::new(DedupHandler::overwrite(MemoryAppender::new()));
/// use log_dedup::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500).unwrap();
/// log!(logger, LogLevel::Warn, "retrying"; "attempt" => 2).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr; $($key:expr => $value:expr),* $(,)?) => {
        $logger.log_at(
            $level,
            $crate::Source::new(module_path!(), file!(), line!()),
            $msg,
            vec![$($crate::Attr::new($key, $value)),*],
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_at(
            $level,
            $crate::Source::new(module_path!(), file!(), line!()),
            format!($($arg)+),
            Vec::new(),
        )
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use log_dedup::prelude::*;
/// # let logger = Logger::new(DedupHandler::overwrite(MemoryAppender::new()));
/// use log_dedup::info;
/// info!(logger, "Application started").unwrap();
/// info!(logger, "user login"; "user" => "alice", "admin" => false).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemoryAppender;
    use crate::core::{Attr, LogLevel, Logger, Result, Value};
    use crate::dedup::DedupHandler;

    fn logger() -> (Logger, MemoryAppender) {
        let sink = MemoryAppender::new();
        (Logger::new(DedupHandler::increment(sink.clone())), sink)
    }

    #[test]
    fn test_log_macro_formats_message() -> Result<()> {
        let (logger, sink) = logger();
        log!(logger, LogLevel::Info, "Test message")?;
        log!(logger, LogLevel::Info, "Value: {}", 42)?;

        let records = sink.records();
        assert_eq!(records[0].message, "Test message");
        assert_eq!(records[1].message, "Value: 42");
        Ok(())
    }

    #[test]
    fn test_level_macros() -> Result<()> {
        let (logger, sink) = logger();
        trace!(logger, "trace {}", 1)?;
        debug!(logger, "debug")?;
        info!(logger, "info")?;
        warn!(logger, "warn")?;
        error!(logger, "error")?;
        fatal!(logger, "fatal")?;

        let levels: Vec<LogLevel> = sink.records().iter().map(|r| r.level).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Trace,
                LogLevel::Debug,
                LogLevel::Info,
                LogLevel::Warn,
                LogLevel::Error,
                LogLevel::Fatal,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_attrs_are_deduplicated() -> Result<()> {
        let (logger, sink) = logger();
        let logger = logger.with(vec![Attr::string("user", "alice")]);
        info!(logger, "switch"; "user" => "bob", "count" => 3u64,)?;

        let record = sink.last().expect("record");
        assert_eq!(
            record.attrs,
            vec![
                Attr::uint("count", 3),
                Attr::string("user", "alice"),
                Attr::string("user#01", "bob"),
            ]
        );
        assert_eq!(record.attrs[0].value, Value::Uint(3));
        Ok(())
    }

    #[test]
    fn test_call_site_is_captured() -> Result<()> {
        let (logger, sink) = logger();
        error!(logger, "failed")?;

        let source = sink.last().and_then(|r| r.source).expect("source");
        assert!(source.file.ends_with("macros.rs"));
        assert!(source.function.contains("macros"));
        assert!(source.line > 0);
        Ok(())
    }
}
