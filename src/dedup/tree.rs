//! Attribute tree builder
//!
//! Walks the flattened batch sequence of a record, resolving every key
//! through the active policy into nested [`KeyMap`]s, then turns the result
//! back into a flat attribute list.

use super::chain::Batch;
use super::key_map::KeyMap;
use super::policy::DedupPolicy;
use super::resolve::ResolveKey;
use crate::core::{Attr, DedupMetrics, Value};

/// Entry of a merge map
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Value(Value),
    Map(KeyMap<Node>),
    /// Two or more occurrences collected by the append policy
    Accumulated(Vec<Leaf>),
}

/// Something that can be accumulated. Lists never nest.
#[derive(Debug, Clone)]
pub(crate) enum Leaf {
    Value(Value),
    Map(KeyMap<Node>),
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        match leaf {
            Leaf::Value(value) => Node::Value(value),
            Leaf::Map(map) => Node::Map(map),
        }
    }
}

impl Node {
    fn into_leaves(self) -> Vec<Leaf> {
        match self {
            Node::Value(value) => vec![Leaf::Value(value)],
            Node::Map(map) => vec![Leaf::Map(map)],
            Node::Accumulated(leaves) => leaves,
        }
    }

    /// Append `incoming` after whatever this node already holds
    pub(crate) fn accumulate(&mut self, incoming: Node) {
        if let Node::Accumulated(leaves) = self {
            leaves.extend(incoming.into_leaves());
            return;
        }
        let previous = std::mem::replace(self, Node::Accumulated(Vec::new()));
        let mut leaves = previous.into_leaves();
        leaves.extend(incoming.into_leaves());
        *self = Node::Accumulated(leaves);
    }
}

pub(crate) struct TreeBuilder<'a> {
    policy: DedupPolicy,
    resolver: &'a dyn ResolveKey,
    metrics: &'a DedupMetrics,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(
        policy: DedupPolicy,
        resolver: &'a dyn ResolveKey,
        metrics: &'a DedupMetrics,
    ) -> Self {
        Self {
            policy,
            resolver,
            metrics,
        }
    }

    pub(crate) fn build(&self, root: &mut KeyMap<Node>, batches: &[&Batch]) {
        let mut groups = Vec::new();
        self.create_attr_tree(root, batches, &mut groups);
    }

    fn create_attr_tree(&self, map: &mut KeyMap<Node>, batches: &[&Batch], groups: &mut Vec<String>) {
        for (i, batch) in batches.iter().enumerate() {
            let name = match batch {
                Batch::Attrs(attrs) => {
                    self.resolve_values(map, attrs, groups);
                    continue;
                }
                Batch::Group(name) => name,
            };

            // Everything after a namespace belongs inside it
            let rest = &batches[i + 1..];
            let mut child = map.new_sibling();
            match self.resolve_key(map, groups, name) {
                Some(key) => {
                    groups.push(key.clone());
                    self.create_attr_tree(&mut child, rest, groups);
                    groups.pop();
                    if !child.is_empty() {
                        self.merge(map, key, Leaf::Map(child));
                    }
                }
                None => {
                    // Dropped scope: still walked, never attached
                    groups.push(name.clone());
                    self.create_attr_tree(&mut child, rest, groups);
                    groups.pop();
                }
            }
            return;
        }
    }

    fn resolve_values(&self, map: &mut KeyMap<Node>, attrs: &[Attr], groups: &mut Vec<String>) {
        for attr in attrs {
            let value = attr.value.clone().resolve();
            if attr.key.is_empty() {
                match value {
                    Value::Null => continue,
                    Value::Group(members) => {
                        self.resolve_values(map, &members, groups);
                        continue;
                    }
                    _ => {}
                }
            }

            let Some(key) = self.resolve_key(map, groups, &attr.key) else {
                continue;
            };

            match value {
                Value::Group(members) => {
                    let mut child = map.new_sibling();
                    groups.push(key.clone());
                    self.resolve_values(&mut child, &members, groups);
                    groups.pop();
                    if !child.is_empty() {
                        self.merge(map, key, Leaf::Map(child));
                    }
                }
                value => self.merge(map, key, Leaf::Value(value)),
            }
        }
    }

    fn resolve_key(&self, map: &KeyMap<Node>, groups: &[String], key: &str) -> Option<String> {
        let resolved = self.policy.resolve_key(map, self.resolver, groups, key);
        match &resolved {
            None => {
                self.metrics.record_dropped();
                tracing::trace!(key, depth = groups.len(), "resolver dropped key");
            }
            Some(new_key) if new_key != key => {
                self.metrics.record_renamed();
            }
            Some(_) => {}
        }
        resolved
    }

    fn merge(&self, map: &mut KeyMap<Node>, key: String, leaf: Leaf) {
        if self.policy.merge(map, key, leaf) {
            self.metrics.record_collapsed();
        }
    }
}

/// Flatten a merge map into attributes in key order
pub(crate) fn build_attrs(map: KeyMap<Node>) -> Vec<Attr> {
    map.into_iter()
        .map(|(key, node)| match node {
            Node::Value(value) => Attr::new(key, value),
            Node::Map(child) => Attr::group(key, build_attrs(child)),
            Node::Accumulated(leaves) => {
                let values = leaves
                    .into_iter()
                    .map(|leaf| match leaf {
                        Leaf::Value(value) => value,
                        // A group inside a list has no attribute form, so it becomes a map
                        Leaf::Map(child) => build_group_map(build_attrs(child)),
                    })
                    .collect();
                Attr::new(key, Value::List(values))
            }
        })
        .collect()
}

fn build_group_map(attrs: Vec<Attr>) -> Value {
    Value::Map(
        attrs
            .into_iter()
            .map(|attr| match attr.value {
                Value::Group(members) => (attr.key, build_group_map(members)),
                value => (attr.key, value),
            })
            .collect(),
    )
}
