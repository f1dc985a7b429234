//! JSON lines appender
//!
//! Writes one JSON object per record: the builtin fields `time`, `level`,
//! `source` (optional) and `msg` first, then the record attributes. An
//! optional [`ReplaceAttr`] sees every non-group attribute together with
//! its group path and can rename, rewrite or drop it.

use crate::core::{Attr, DedupError, Handler, LogLevel, Record, Result, TimestampFormat, Value};
use crate::dedup::{ReplaceAttr, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use parking_lot::Mutex;
use serde_json::{Map, Value as Json};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

type SharedWriter = Mutex<Box<dyn Write + Send>>;

pub struct JsonAppender {
    writer: SharedWriter,
    pretty: bool,
    add_source: bool,
    min_level: LogLevel,
    timestamp_format: TimestampFormat,
    replace_attr: Option<Arc<dyn ReplaceAttr>>,
}

impl JsonAppender {
    /// Append JSON lines to the file at `path`, creating it if needed
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                DedupError::io_operation(
                    "opening JSON log file",
                    path.display().to_string(),
                    e,
                )
            })?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Write JSON lines to any writer, e.g. stdout or a `Vec<u8>`
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            pretty: false,
            add_source: true,
            min_level: LogLevel::Trace,
            timestamp_format: TimestampFormat::default(),
            replace_attr: None,
        }
    }

    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Whether to write the record's call site
    #[must_use]
    pub fn with_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_replace_attr(mut self, replace_attr: Arc<dyn ReplaceAttr>) -> Self {
        self.replace_attr = Some(replace_attr);
        self
    }

    /// Render `record` as a JSON document without writing it
    pub fn render(&self, record: &Record) -> Result<String> {
        let mut object = Map::new();

        let source = record
            .source
            .as_ref()
            .filter(|_| self.add_source)
            .map(|source| Attr::new(SOURCE_KEY, source.to_value()));
        let builtins = [
            Some(Attr::time(TIME_KEY, record.timestamp)),
            Some(Attr::string(LEVEL_KEY, record.level.to_str())),
            source,
            Some(Attr::string(MESSAGE_KEY, record.message.clone())),
        ];
        for attr in builtins.into_iter().flatten() {
            if let Some(attr) = self.replace(&[], attr) {
                object.insert(attr.key, self.encode(attr.value));
            }
        }

        let mut groups = Vec::new();
        self.write_attrs(&mut object, &record.attrs, &mut groups);

        let json = if self.pretty {
            serde_json::to_string_pretty(&object)?
        } else {
            serde_json::to_string(&object)?
        };
        Ok(json)
    }

    fn replace(&self, groups: &[String], attr: Attr) -> Option<Attr> {
        let attr = match &self.replace_attr {
            Some(replacer) => replacer.replace_attr(groups, attr)?,
            None => attr,
        };
        (!attr.is_empty()).then_some(attr)
    }

    fn encode(&self, value: Value) -> Json {
        match value {
            Value::Time(time) if self.timestamp_format.is_numeric() => {
                Json::from(time.timestamp_millis())
            }
            Value::Time(time) => Json::String(self.timestamp_format.format(&time)),
            other => other.to_json(),
        }
    }

    fn write_attrs(&self, object: &mut Map<String, Json>, attrs: &[Attr], groups: &mut Vec<String>) {
        for attr in attrs {
            if attr.is_empty() {
                continue;
            }
            match attr.value.clone().resolve() {
                Value::Group(members) if attr.key.is_empty() => {
                    self.write_attrs(object, &members, groups);
                }
                Value::Group(members) => {
                    let mut child = Map::new();
                    groups.push(attr.key.clone());
                    self.write_attrs(&mut child, &members, groups);
                    groups.pop();
                    if !child.is_empty() {
                        object.insert(attr.key.clone(), Json::Object(child));
                    }
                }
                value => {
                    if let Some(attr) = self.replace(groups, Attr::new(attr.key.clone(), value)) {
                        object.insert(attr.key, self.encode(attr.value));
                    }
                }
            }
        }
    }
}

impl fmt::Debug for JsonAppender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonAppender")
            .field("pretty", &self.pretty)
            .field("add_source", &self.add_source)
            .field("min_level", &self.min_level)
            .field("timestamp_format", &self.timestamp_format)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish()
    }
}

impl Handler for JsonAppender {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn handle(&self, record: Record) -> Result<()> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        let json = self.render(&record)?;
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", json)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}
