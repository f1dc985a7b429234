//! Log records passed between handlers

use super::{attr::Attr, log_level::LogLevel, value::Value};
use chrono::{DateTime, Utc};

/// Call site of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl Source {
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// Group value `{function, file, line}` as rendered by sinks
    pub fn to_value(&self) -> Value {
        Value::Group(vec![
            Attr::string("function", self.function.clone()),
            Attr::string("file", self.file.clone()),
            Attr::int("line", i64::from(self.line)),
        ])
    }
}

/// A single log event
///
/// The builtin fields (time, level, message and source) are kept apart from
/// `attrs`, so middleware can rewrite attributes without touching them.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source: Option<Source>,
    pub attrs: Vec<Attr>,
}

impl Record {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }
}
