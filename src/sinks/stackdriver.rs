//! Google Cloud Logging (Stackdriver)
//!
//! Cloud Logging reads the severity from `severity`, the call site from
//! `logging.googleapis.com/sourceLocation` (with `line` as a string) and
//! shows `message` as the entry summary.

use super::{AttrReplacer, ResolveReplaceOptions, Sink};
use crate::core::{Attr, LogLevel, Value};
use crate::dedup::{LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use crate::dedup::{ReplaceAttr, ResolveKey};
use std::sync::Arc;

pub const SEVERITY_KEY: &str = "severity";
pub const SOURCE_LOCATION_KEY: &str = "logging.googleapis.com/sourceLocation";
pub const SUMMARY_KEY: &str = "message";

pub fn sink(options: &ResolveReplaceOptions) -> Sink {
    let sink = Sink::new()
        .replace(LEVEL_KEY, AttrReplacer::with_valuer(SEVERITY_KEY, severity))
        .replace(
            SOURCE_KEY,
            AttrReplacer::with_valuer(SOURCE_LOCATION_KEY, source_location),
        )
        .builtin(TIME_KEY)
        .builtin(SEVERITY_KEY)
        .builtin(SOURCE_LOCATION_KEY)
        .builtin(SUMMARY_KEY);

    if options.overwrite_summary {
        sink.replace(MESSAGE_KEY, AttrReplacer::rename(SUMMARY_KEY))
    } else {
        sink.builtin(MESSAGE_KEY)
    }
}

pub fn resolve_key(options: &ResolveReplaceOptions) -> Arc<dyn ResolveKey> {
    sink(options).resolve_keys()
}

pub fn replace_attr(options: &ResolveReplaceOptions) -> Arc<dyn ReplaceAttr> {
    sink(options).replace_attr()
}

fn severity(value: Value) -> Value {
    match value.as_str().and_then(|s| s.parse::<LogLevel>().ok()) {
        Some(level) => Value::from(level.stackdriver_severity()),
        None => value,
    }
}

fn source_location(value: Value) -> Value {
    match value {
        Value::Group(attrs) => Value::Group(
            attrs
                .into_iter()
                .map(|attr| match attr.value {
                    Value::Int(line) if attr.key == "line" => Attr::string(attr.key, line.to_string()),
                    _ => attr,
                })
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Source;

    #[test]
    fn test_level_becomes_severity() {
        let replacer = replace_attr(&ResolveReplaceOptions::default());
        assert_eq!(
            replacer.replace_attr(&[], Attr::string("level", "WARN")),
            Some(Attr::string("severity", "WARNING"))
        );
        assert_eq!(
            replacer.replace_attr(&[], Attr::string("level", "custom")),
            Some(Attr::string("severity", "custom"))
        );
    }

    #[test]
    fn test_source_line_is_string() {
        let replacer = replace_attr(&ResolveReplaceOptions::default());
        let source = Source::new("app::run", "src/app.rs", 85);
        let replaced = replacer.replace_attr(&[], Attr::new("source", source.to_value()));
        assert_eq!(
            replaced.map(|a| (a.key, a.value.to_json())),
            Some((
                SOURCE_LOCATION_KEY.to_string(),
                serde_json::json!({"function": "app::run", "file": "src/app.rs", "line": "85"})
            ))
        );
    }

    #[test]
    fn test_summary_option() {
        let plain = resolve_key(&ResolveReplaceOptions::default());
        assert_eq!(plain.resolve_key(&[], "msg", 0), Some("msg#01".into()));
        assert_eq!(plain.resolve_key(&[], "message", 0), Some("message#01".into()));

        let options = ResolveReplaceOptions {
            overwrite_summary: true,
        };
        assert_eq!(
            resolve_key(&options).resolve_key(&[], "msg", 1),
            Some("message#02".into())
        );
        assert_eq!(
            replace_attr(&options).replace_attr(&[], Attr::string("msg", "hi")),
            Some(Attr::string("message", "hi"))
        );
    }
}
