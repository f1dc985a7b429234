//! Conflict resolution policies

use super::key_map::KeyMap;
use super::resolve::{increment_key_name, ResolveKey};
use super::tree::{Leaf, Node};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens when two attributes end up under the same key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// The newest value wins
    Overwrite,
    /// The oldest value wins
    Ignore,
    /// Every value is kept under its own key: `key`, `key#01`, `key#02`, ...
    #[default]
    Increment,
    /// Values are collected into a list, oldest first
    Append,
}

impl DedupPolicy {
    pub fn to_str(&self) -> &'static str {
        match self {
            DedupPolicy::Overwrite => "overwrite",
            DedupPolicy::Ignore => "ignore",
            DedupPolicy::Increment => "increment",
            DedupPolicy::Append => "append",
        }
    }

    pub(crate) fn handler_name(&self) -> &'static str {
        match self {
            DedupPolicy::Overwrite => "dedup-overwrite",
            DedupPolicy::Ignore => "dedup-ignore",
            DedupPolicy::Increment => "dedup-increment",
            DedupPolicy::Append => "dedup-append",
        }
    }

    /// Final key for `key` at the level `map` represents, or `None` to drop it
    pub(crate) fn resolve_key(
        &self,
        map: &KeyMap<Node>,
        resolver: &dyn ResolveKey,
        groups: &[String],
        key: &str,
    ) -> Option<String> {
        match self {
            DedupPolicy::Increment => first_free_key(map, resolver, groups, key),
            _ => resolver.resolve_key(groups, key, 0),
        }
    }

    /// Store `leaf` under `key`. Returns whether the key was already taken.
    pub(crate) fn merge(&self, map: &mut KeyMap<Node>, key: String, leaf: Leaf) -> bool {
        let node = Node::from(leaf);
        match self {
            DedupPolicy::Overwrite | DedupPolicy::Increment => map.insert(key, node).is_some(),
            DedupPolicy::Ignore => map.insert_or_resolve(key, node, |_, _| {}),
            DedupPolicy::Append => {
                map.insert_or_resolve(key, node, |existing, incoming| existing.accumulate(incoming))
            }
        }
    }
}

/// Ask the resolver for candidates until one is not in `map`
///
/// Candidates are checked with a ceiling query so keys sorting between two
/// candidates (`msg#01a` between `msg#01` and `msg#02`) are stepped over.
/// A resolver that ignores `index` would offer the same name forever, so a
/// repeated answer gets the index appended here instead.
fn first_free_key(
    map: &KeyMap<Node>,
    resolver: &dyn ResolveKey,
    groups: &[String],
    key: &str,
) -> Option<String> {
    let compare = map.key_compare();
    let mut offered: Vec<String> = Vec::new();
    let mut index = 0;
    loop {
        let raw = resolver.resolve_key(groups, key, index)?;
        let candidate = if offered.contains(&raw) {
            increment_key_name(&raw, index)
        } else {
            raw.clone()
        };

        match map.ceiling(&candidate) {
            Some((existing, _)) if compare.compare(existing, &candidate).is_eq() => {
                offered.push(raw);
                index += 1;
            }
            _ => return Some(candidate),
        }
    }
}

impl fmt::Display for DedupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for DedupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overwrite" => Ok(DedupPolicy::Overwrite),
            "ignore" => Ok(DedupPolicy::Ignore),
            "increment" => Ok(DedupPolicy::Increment),
            "append" => Ok(DedupPolicy::Append),
            _ => Err(format!("Invalid dedup policy: '{}'", s)),
        }
    }
}
