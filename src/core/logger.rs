//! Logger facade over a dedup handler

use super::{
    attr::Attr,
    error::Result,
    handler::Handler,
    log_level::LogLevel,
    record::{Record, Source},
};
use crate::dedup::DedupHandler;

/// Front end that turns calls into records and hands them to a
/// [`DedupHandler`]
///
/// Cloning is cheap; [`with`](Self::with) and [`with_group`](Self::with_group)
/// return derived loggers and leave `self` untouched.
///
/// # Example
///
/// ```
/// use log_dedup::prelude::*;
///
/// let sink = MemoryAppender::new();
/// let logger = Logger::new(DedupHandler::increment(sink.clone()))
///     .with(vec![Attr::string("service", "billing")]);
///
/// logger.info("charge created", vec![Attr::string("service", "stripe")]).unwrap();
///
/// let record = sink.last().unwrap();
/// assert_eq!(record.attrs[1], Attr::string("service#01", "stripe"));
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    handler: DedupHandler,
}

impl Logger {
    pub fn new(handler: DedupHandler) -> Self {
        Self { handler }
    }

    /// Logger whose records also carry `attrs`
    #[must_use]
    pub fn with(&self, attrs: Vec<Attr>) -> Self {
        Self::new(self.handler.with_attrs(attrs))
    }

    /// Logger that nests later attributes under `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        Self::new(self.handler.with_group(name))
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(level)
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>, attrs: Vec<Attr>) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.handler
            .handle(Record::new(level, message).with_attrs(attrs))
    }

    /// Log with an explicit call site, as the logging macros do
    pub fn log_at(
        &self,
        level: LogLevel,
        source: Source,
        message: impl Into<String>,
        attrs: Vec<Attr>,
    ) -> Result<()> {
        if !self.enabled(level) {
            return Ok(());
        }
        self.handler.handle(
            Record::new(level, message)
                .with_source(source)
                .with_attrs(attrs),
        )
    }

    /// Hand over a fully built record
    pub fn log_record(&self, record: Record) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        self.handler.handle(record)
    }

    pub fn trace(&self, message: impl Into<String>, attrs: Vec<Attr>) -> Result<()> {
        self.log(LogLevel::Trace, message, attrs)
    }

    pub fn debug(&self, message: impl Into<String>, attrs: Vec<Attr>) -> Result<()> {
        self.log(LogLevel::Debug, message, attrs)
    }

    pub fn info(&self, message: impl Into<String>, attrs: Vec<Attr>) -> Result<()> {
        self.log(LogLevel::Info, message, attrs)
    }

    pub fn warn(&self, message: impl Into<String>, attrs: Vec<Attr>) -> Result<()> {
        self.log(LogLevel::Warn, message, attrs)
    }

    pub fn error(&self, message: impl Into<String>, attrs: Vec<Attr>) -> Result<()> {
        self.log(LogLevel::Error, message, attrs)
    }

    pub fn fatal(&self, message: impl Into<String>, attrs: Vec<Attr>) -> Result<()> {
        self.log(LogLevel::Fatal, message, attrs)
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }

    pub fn handler(&self) -> &DedupHandler {
        &self.handler
    }
}
