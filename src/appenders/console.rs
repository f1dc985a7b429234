//! Console appender implementation

use crate::core::{Attr, Handler, LogLevel, Record, Result, TimestampFormat, Value};
use colored::Colorize;

/// Human readable output: `[time] [LEVEL] message key=value group.key=value`
pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    min_level: LogLevel,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
            min_level: LogLevel::Trace,
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Format a record as a single line
    pub fn format(&self, record: &Record) -> String {
        let level_str = if self.use_colors {
            format!("{:5}", record.level.to_str())
                .color(record.level.color_code())
                .to_string()
        } else {
            format!("{:5}", record.level.to_str())
        };

        let mut line = format!(
            "[{}] [{}] {}",
            self.timestamp_format.format(&record.timestamp),
            level_str,
            record.message
        );

        let mut fields = Vec::new();
        flatten_fields("", &record.attrs, &mut fields);
        for field in fields {
            line.push(' ');
            line.push_str(&field);
        }

        if let Some(source) = &record.source {
            line.push_str(&format!(" ({}:{})", source.file, source.line));
        }
        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

/// `key=value` pairs with group members joined by dots
fn flatten_fields(prefix: &str, attrs: &[Attr], out: &mut Vec<String>) {
    for attr in attrs {
        if attr.is_empty() {
            continue;
        }
        let key = match (prefix.is_empty(), attr.key.is_empty()) {
            (true, _) => attr.key.clone(),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{}.{}", prefix, attr.key),
        };
        match attr.value.clone().resolve() {
            Value::Group(members) => flatten_fields(&key, &members, out),
            Value::String(s) if s.is_empty() || s.contains(char::is_whitespace) || s.contains('=') => {
                out.push(format!("{}={:?}", key, s));
            }
            value => out.push(format!("{}={}", key, value)),
        }
    }
}

impl Handler for ConsoleAppender {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: Record) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        let output = self.format(&record);

        // Route Error and Fatal levels to stderr, others to stdout
        match record.level {
            LogLevel::Error | LogLevel::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
