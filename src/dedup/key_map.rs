//! Ordered key map used while merging attributes
//!
//! Attribute counts per record are small, so a sorted `Vec` searched with a
//! pluggable comparator beats a tree here and keeps ceiling queries trivial.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

type CompareFn = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Ordering used to decide whether two keys are the same
#[derive(Clone)]
pub struct KeyCompare(CompareFn);

impl KeyCompare {
    /// Byte-wise comparison
    pub fn case_sensitive() -> Self {
        Self(Arc::new(|a: &str, b: &str| a.cmp(b)))
    }

    /// Compare after lowercasing, so `Foo` and `foo` collide
    pub fn case_insensitive() -> Self {
        Self(Arc::new(|a: &str, b: &str| {
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
        }))
    }

    /// Comparator must be a total order
    pub fn custom<F>(compare: F) -> Self
    where
        F: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
    {
        Self(Arc::new(compare))
    }

    #[inline]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.0)(a, b)
    }
}

impl Default for KeyCompare {
    fn default() -> Self {
        Self::case_sensitive()
    }
}

impl fmt::Debug for KeyCompare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyCompare(..)")
    }
}

/// Serializable choice of the builtin comparators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrder {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl KeyOrder {
    pub fn to_compare(self) -> KeyCompare {
        match self {
            KeyOrder::CaseSensitive => KeyCompare::case_sensitive(),
            KeyOrder::CaseInsensitive => KeyCompare::case_insensitive(),
        }
    }
}

impl fmt::Display for KeyOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOrder::CaseSensitive => write!(f, "case_sensitive"),
            KeyOrder::CaseInsensitive => write!(f, "case_insensitive"),
        }
    }
}

impl FromStr for KeyOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "case_sensitive" => Ok(KeyOrder::CaseSensitive),
            "case_insensitive" => Ok(KeyOrder::CaseInsensitive),
            _ => Err(format!("Invalid key order: '{}'", s)),
        }
    }
}

/// Map from string keys to `V`, iterated in comparator order
#[derive(Debug, Clone)]
pub struct KeyMap<V> {
    entries: Vec<(String, V)>,
    compare: KeyCompare,
}

impl<V> KeyMap<V> {
    pub fn new(compare: KeyCompare) -> Self {
        Self {
            entries: Vec::new(),
            compare,
        }
    }

    /// An empty map sharing this map's comparator
    pub fn new_sibling(&self) -> Self {
        Self::new(self.compare.clone())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_compare(&self) -> &KeyCompare {
        &self.compare
    }

    fn search(&self, key: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(k, _)| self.compare.compare(k, key))
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.search(key).ok().map(|i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key).is_ok()
    }

    /// Insert or replace. A replaced entry takes the new key spelling too.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.search(&key) {
            Ok(i) => {
                let (_, old) = std::mem::replace(&mut self.entries[i], (key, value));
                Some(old)
            }
            Err(i) => {
                self.entries.insert(i, (key, value));
                None
            }
        }
    }

    /// Insert `value`, or hand it to `resolve` together with the entry
    /// already stored under an equal key. Returns whether the key existed.
    pub fn insert_or_resolve<F>(&mut self, key: impl Into<String>, value: V, resolve: F) -> bool
    where
        F: FnOnce(&mut V, V),
    {
        let key = key.into();
        match self.search(&key) {
            Ok(i) => {
                resolve(&mut self.entries[i].1, value);
                true
            }
            Err(i) => {
                self.entries.insert(i, (key, value));
                false
            }
        }
    }

    /// Smallest stored entry whose key is greater than or equal to `key`
    pub fn ceiling(&self, key: &str) -> Option<(&str, &V)> {
        let i = match self.search(key) {
            Ok(i) | Err(i) => i,
        };
        self.entries.get(i).map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V> Default for KeyMap<V> {
    fn default() -> Self {
        Self::new(KeyCompare::default())
    }
}

impl<V> IntoIterator for KeyMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_of(keys: &[&str]) -> KeyMap<usize> {
        let mut map = KeyMap::default();
        for (i, k) in keys.iter().enumerate() {
            map.insert(*k, i);
        }
        map
    }

    #[test]
    fn test_iteration_is_sorted() {
        let map = map_of(&["b", "msg#02", "a", "msg#01a", "msg#01"]);
        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b", "msg#01", "msg#01a", "msg#02"]);
    }

    #[test]
    fn test_ceiling() {
        let map = map_of(&["msg#01", "msg#01a", "msg#02"]);
        assert_eq!(map.ceiling("msg").map(|(k, _)| k), Some("msg#01"));
        assert_eq!(map.ceiling("msg#01").map(|(k, _)| k), Some("msg#01"));
        assert_eq!(map.ceiling("msg#02").map(|(k, _)| k), Some("msg#02"));
        assert_eq!(map.ceiling("msg#03"), None);
    }

    #[test]
    fn test_insert_or_resolve() {
        let mut map: KeyMap<Vec<i32>> = KeyMap::default();
        assert!(!map.insert_or_resolve("a", vec![1], |old, new| old.extend(new)));
        assert!(map.insert_or_resolve("a", vec![2], |old, new| old.extend(new)));
        assert_eq!(map.get("a"), Some(&vec![1, 2]));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_replaces_key_and_value() {
        let mut map = KeyMap::new(KeyCompare::case_insensitive());
        assert_eq!(map.insert("Key", 1), None);
        assert_eq!(map.insert("KEY", 2), Some(1));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![("KEY", &2)]);
        assert!(map.contains_key("key"));
    }

    #[test]
    fn test_custom_compare() {
        let reverse = KeyCompare::custom(|a, b| b.cmp(a));
        let mut map = KeyMap::new(reverse);
        map.insert("a", ());
        map.insert("c", ());
        map.insert("b", ());
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_key_order_parse() {
        assert_eq!(
            "case-insensitive".parse::<KeyOrder>(),
            Ok(KeyOrder::CaseInsensitive)
        );
        assert_eq!(KeyOrder::default().to_string(), "case_sensitive");
        assert!("random".parse::<KeyOrder>().is_err());
    }
}
