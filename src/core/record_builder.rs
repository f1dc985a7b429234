//! Fluent record construction
//!
//! Provides a builder for records with structured attributes and nested groups.

use super::attr::Attr;
use super::error::Result;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::record::{Record, Source};
use super::value::Value;
use chrono::{DateTime, Utc};

/// Builder for a single record
///
/// # Example
///
/// ```
/// use log_dedup::prelude::*;
///
/// let logger = Logger::new(DedupHandler::overwrite(MemoryAppender::new()));
///
/// logger.info_builder()
///     .message("Request processed")
///     .attr("user_id", 12345)
///     .attr("latency_ms", 42.5)
///     .group("http", vec![Attr::int("status", 200)])
///     .log()
///     .unwrap();
/// ```
pub struct RecordBuilder<'a> {
    logger: &'a Logger,
    record: Record,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(logger: &'a Logger, level: LogLevel) -> Self {
        Self {
            logger,
            record: Record::new(level, String::new()),
        }
    }

    #[must_use]
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.record.message = msg.into();
        self
    }

    #[must_use]
    pub fn attr<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.record.add_attr(Attr::new(key, value));
        self
    }

    #[must_use]
    pub fn attrs(mut self, attrs: Vec<Attr>) -> Self {
        self.record.attrs.extend(attrs);
        self
    }

    /// Add `attrs` nested under `name`
    #[must_use]
    pub fn group(mut self, name: impl Into<String>, attrs: Vec<Attr>) -> Self {
        self.record.add_attr(Attr::group(name, attrs));
        self
    }

    #[must_use]
    pub fn source(mut self, source: Source) -> Self {
        self.record.source = Some(source);
        self
    }

    /// Set the call site from `module_path!()`, `file!()` and `line!()`
    #[must_use]
    pub fn location(self, module_path: &str, file: &str, line: u32) -> Self {
        self.source(Source::new(module_path, file, line))
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.record.timestamp = timestamp;
        self
    }

    /// Send the record through the logger
    pub fn log(self) -> Result<()> {
        self.logger.log_record(self.record)
    }
}

impl Logger {
    pub fn trace_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Trace)
    }

    pub fn debug_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Debug)
    }

    pub fn info_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Info)
    }

    pub fn warn_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Warn)
    }

    pub fn error_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Error)
    }

    pub fn fatal_builder(&self) -> RecordBuilder<'_> {
        RecordBuilder::new(self, LogLevel::Fatal)
    }
}
