//! Field tables for log aggregation services
//!
//! A dedup middleware never sees the builtin fields (time, level, message,
//! source). Only the final sink writes them, and many services want them
//! under different names. A [`Sink`] table describes both halves:
//!
//! - [`Sink::resolve_keys`] plugs into the middleware and moves ordinary
//!   attributes out of the way of the names the sink will use
//! - [`Sink::replace_attr`] plugs into the final sink and renames the
//!   builtin fields themselves

pub mod cloudwatch;
pub mod graylog;
pub mod stackdriver;

use crate::core::{Attr, Value};
use crate::dedup::{increment_key_name, ReplaceAttr, ResolveKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Options shared by the presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReplaceOptions {
    /// Write the record message under the service's summary field
    pub overwrite_summary: bool,
}

type Valuer = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Replacement key and optional value transform for one field
#[derive(Clone)]
pub struct AttrReplacer {
    pub key: String,
    valuer: Option<Valuer>,
}

impl AttrReplacer {
    pub fn rename(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            valuer: None,
        }
    }

    pub fn with_valuer<F>(key: impl Into<String>, valuer: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            valuer: Some(Arc::new(valuer)),
        }
    }

    pub fn apply(&self, attr: Attr) -> Attr {
        let value = match &self.valuer {
            Some(valuer) => valuer(attr.value),
            None => attr.value,
        };
        Attr::new(self.key.clone(), value)
    }
}

impl fmt::Debug for AttrReplacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrReplacer")
            .field("key", &self.key)
            .field("valuer", &self.valuer.is_some())
            .finish()
    }
}

/// Final destination of the logs
#[derive(Debug, Clone, Default)]
pub struct Sink {
    builtins: Vec<String>,
    replacers: Vec<(String, AttrReplacer)>,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a key the sink writes itself
    #[must_use]
    pub fn builtin(mut self, key: impl Into<String>) -> Self {
        self.builtins.push(key.into());
        self
    }

    /// Rename `from` at the root
    #[must_use]
    pub fn replace(mut self, from: impl Into<String>, replacer: AttrReplacer) -> Self {
        self.replacers.push((from.into(), replacer));
        self
    }

    pub fn builtins(&self) -> &[String] {
        &self.builtins
    }

    /// First replacer registered for `key`
    pub fn replacement(&self, key: &str) -> Option<&AttrReplacer> {
        self.replacers
            .iter()
            .find(|(from, _)| from == key)
            .map(|(_, replacer)| replacer)
    }

    /// Resolver for the dedup middleware
    ///
    /// Root keys are renamed first; a key equal to one of the builtins is
    /// then incremented starting at `#01`. Keys inside groups are untouched.
    /// The resolver never drops a key.
    pub fn resolve_keys(&self) -> Arc<dyn ResolveKey> {
        let sink = self.clone();
        Arc::new(move |groups: &[String], key: &str, index: usize| {
            if !groups.is_empty() {
                return Some(key.to_string());
            }
            let key = match sink.replacement(key) {
                Some(replacer) => replacer.key.as_str(),
                None => key,
            };
            if sink.builtins.iter().any(|builtin| builtin == key) {
                return Some(increment_key_name(key, index + 1));
            }
            Some(key.to_string())
        })
    }

    /// Replacer for the final sink, renaming root fields only
    pub fn replace_attr(&self) -> Arc<dyn ReplaceAttr> {
        let sink = self.clone();
        Arc::new(move |groups: &[String], attr: Attr| {
            if !groups.is_empty() {
                return Some(attr);
            }
            Some(match sink.replacement(&attr.key) {
                Some(replacer) => replacer.apply(attr),
                None => attr,
            })
        })
    }
}

/// Sinks with a ready-made table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkPreset {
    Graylog,
    Stackdriver,
    Cloudwatch,
}

impl SinkPreset {
    pub fn sink(&self, options: &ResolveReplaceOptions) -> Sink {
        match self {
            SinkPreset::Graylog => graylog::sink(options),
            SinkPreset::Stackdriver => stackdriver::sink(options),
            SinkPreset::Cloudwatch => cloudwatch::sink(options),
        }
    }

    pub fn resolve_key(&self, options: &ResolveReplaceOptions) -> Arc<dyn ResolveKey> {
        self.sink(options).resolve_keys()
    }

    pub fn replace_attr(&self, options: &ResolveReplaceOptions) -> Arc<dyn ReplaceAttr> {
        self.sink(options).replace_attr()
    }
}

impl fmt::Display for SinkPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkPreset::Graylog => write!(f, "graylog"),
            SinkPreset::Stackdriver => write!(f, "stackdriver"),
            SinkPreset::Cloudwatch => write!(f, "cloudwatch"),
        }
    }
}

impl FromStr for SinkPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "graylog" => Ok(SinkPreset::Graylog),
            "stackdriver" | "gcp" => Ok(SinkPreset::Stackdriver),
            "cloudwatch" | "aws" => Ok(SinkPreset::Cloudwatch),
            _ => Err(format!("Invalid sink preset: '{}'", s)),
        }
    }
}
