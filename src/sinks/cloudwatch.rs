//! AWS CloudWatch Logs
//!
//! Logs Insights only detects timestamps with a fixed fractional precision,
//! so the record time is written with nanoseconds. No keys are renamed.

use super::{AttrReplacer, ResolveReplaceOptions, Sink};
use crate::core::{TimestampFormat, Value};
use crate::dedup::{LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use crate::dedup::{ReplaceAttr, ResolveKey};
use std::sync::Arc;

pub fn sink(_options: &ResolveReplaceOptions) -> Sink {
    Sink::new()
        .replace(TIME_KEY, AttrReplacer::with_valuer(TIME_KEY, nanosecond_time))
        .builtin(TIME_KEY)
        .builtin(LEVEL_KEY)
        .builtin(MESSAGE_KEY)
        .builtin(SOURCE_KEY)
}

pub fn resolve_key(options: &ResolveReplaceOptions) -> Arc<dyn ResolveKey> {
    sink(options).resolve_keys()
}

pub fn replace_attr(options: &ResolveReplaceOptions) -> Arc<dyn ReplaceAttr> {
    sink(options).replace_attr()
}

fn nanosecond_time(value: Value) -> Value {
    match value {
        Value::Time(time) => Value::String(TimestampFormat::Rfc3339Nanos.format(&time)),
        other => other,
    }
}
