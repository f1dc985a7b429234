//! Key resolution hooks
//!
//! A [`ResolveKey`] decides the final name of every attribute and group the
//! dedup middleware writes, or drops it. [`ReplaceAttr`] is the matching hook
//! for sinks, which own the builtin fields the middleware never sees.

use crate::core::Attr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const TIME_KEY: &str = "time";
pub const LEVEL_KEY: &str = "level";
pub const MESSAGE_KEY: &str = "msg";
pub const SOURCE_KEY: &str = "source";

/// Keys sinks use for the fields every record carries
pub const BUILTIN_KEYS: [&str; 4] = [TIME_KEY, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY];

/// Chooses the key an attribute is stored under
///
/// `groups` is the path of open namespaces (empty at the root) and `index`
/// counts how many candidates the increment policy has already rejected.
/// Returning `None` drops the attribute, or the whole group.
pub trait ResolveKey: Send + Sync {
    fn resolve_key(&self, groups: &[String], key: &str, index: usize) -> Option<String>;
}

impl<F> ResolveKey for F
where
    F: Fn(&[String], &str, usize) -> Option<String> + Send + Sync,
{
    fn resolve_key(&self, groups: &[String], key: &str, index: usize) -> Option<String> {
        self(groups, key, index)
    }
}

/// Rewrites an attribute on its way into a sink
pub trait ReplaceAttr: Send + Sync {
    fn replace_attr(&self, groups: &[String], attr: Attr) -> Option<Attr>;
}

impl<F> ReplaceAttr for F
where
    F: Fn(&[String], Attr) -> Option<Attr> + Send + Sync,
{
    fn replace_attr(&self, groups: &[String], attr: Attr) -> Option<Attr> {
        self(groups, attr)
    }
}

/// Whether `key` is one of the builtin field names
pub fn does_builtin_key_conflict(key: &str) -> bool {
    BUILTIN_KEYS.contains(&key)
}

/// `key` for index 0, then `key#01`, `key#02`, ...
pub fn increment_key_name(key: &str, index: usize) -> String {
    if index == 0 {
        key.to_string()
    } else {
        format!("{}#{:02}", key, index)
    }
}

/// What to do with a root attribute named like a builtin field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinConflict {
    /// Rename it, starting at `#01`
    #[default]
    Increment,
    /// Leave it out of the record
    Drop,
    /// Keep the bare name and let the sink sort it out
    Keep,
}

impl ResolveKey for BuiltinConflict {
    fn resolve_key(&self, groups: &[String], key: &str, index: usize) -> Option<String> {
        if groups.is_empty() && does_builtin_key_conflict(key) {
            return match self {
                BuiltinConflict::Increment => Some(increment_key_name(key, index + 1)),
                BuiltinConflict::Drop => None,
                BuiltinConflict::Keep => Some(increment_key_name(key, index)),
            };
        }
        Some(increment_key_name(key, index))
    }
}

impl fmt::Display for BuiltinConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuiltinConflict::Increment => write!(f, "increment"),
            BuiltinConflict::Drop => write!(f, "drop"),
            BuiltinConflict::Keep => write!(f, "keep"),
        }
    }
}

impl FromStr for BuiltinConflict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increment" => Ok(BuiltinConflict::Increment),
            "drop" => Ok(BuiltinConflict::Drop),
            "keep" => Ok(BuiltinConflict::Keep),
            _ => Err(format!("Invalid builtin conflict policy: '{}'", s)),
        }
    }
}

/// Apply several resolvers in order, stopping at the first drop
///
/// Resolvers that only rename (such as the sink tables) ignore `index`, so
/// the joined resolver increments the key itself, once, when none of them
/// changed it.
pub fn join_resolve_key(resolvers: Vec<Arc<dyn ResolveKey>>) -> Option<Arc<dyn ResolveKey>> {
    if resolvers.is_empty() {
        return None;
    }
    Some(Arc::new(move |groups: &[String], original: &str, index: usize| {
        let mut key = original.to_string();
        for resolver in &resolvers {
            key = resolver.resolve_key(groups, &key, index)?;
        }
        if key != original {
            Some(key)
        } else {
            Some(increment_key_name(&key, index))
        }
    }))
}

/// Apply several attribute replacers in order, stopping at the first drop
pub fn join_replace_attr(replacers: Vec<Arc<dyn ReplaceAttr>>) -> Option<Arc<dyn ReplaceAttr>> {
    if replacers.is_empty() {
        return None;
    }
    Some(Arc::new(move |groups: &[String], attr: Attr| {
        replacers
            .iter()
            .try_fold(attr, |attr, replacer| replacer.replace_attr(groups, attr))
    }))
}
