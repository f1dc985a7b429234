//! Graylog
//!
//! Graylog keeps its own `timestamp` (receive time) and `source` (sending
//! host), so attributes using those names are moved aside. `message` is
//! the field Graylog shows when skimming.

use super::{AttrReplacer, ResolveReplaceOptions, Sink};
use crate::dedup::{LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};
use crate::dedup::{ReplaceAttr, ResolveKey};
use std::sync::Arc;

pub fn sink(options: &ResolveReplaceOptions) -> Sink {
    let sink = Sink::new()
        .replace("timestamp", AttrReplacer::rename("timestampRenamed"))
        .replace(SOURCE_KEY, AttrReplacer::rename("sourceLoc"))
        .builtin(TIME_KEY)
        .builtin(LEVEL_KEY)
        .builtin("sourceLoc")
        .builtin("message");

    if options.overwrite_summary {
        sink.replace(MESSAGE_KEY, AttrReplacer::rename("message"))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Attr;

    #[test]
    fn test_reserved_names_moved_aside() {
        let resolver = resolve_key(&ResolveReplaceOptions::default());
        assert_eq!(
            resolver.resolve_key(&[], "timestamp", 0),
            Some("timestampRenamed".into())
        );
        assert_eq!(resolver.resolve_key(&[], "source", 0), Some("sourceLoc#01".into()));
        assert_eq!(resolver.resolve_key(&[], "level", 1), Some("level#02".into()));
    }

    #[test]
    fn test_source_renamed_in_sink() {
        let replacer = replace_attr(&ResolveReplaceOptions {
            overwrite_summary: true,
        });
        assert_eq!(
            replacer.replace_attr(&[], Attr::string("source", "x")),
            Some(Attr::string("sourceLoc", "x"))
        );
        assert_eq!(
            replacer.replace_attr(&[], Attr::string("msg", "hello")),
            Some(Attr::string("message", "hello"))
        );
    }
}
