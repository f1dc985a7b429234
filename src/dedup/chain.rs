//! Immutable chain of attribute batches
//!
//! Each `with_attrs`/`with_group` call on a handler adds one node pointing
//! at its parent. Nodes are never mutated, so derived handlers share their
//! common prefix and can be used from any thread.

use crate::core::Attr;
use std::sync::Arc;

/// One step of handler derivation
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
    /// Opens a namespace for everything that follows
    Group(String),
    /// Attributes added at the current namespace
    Attrs(Vec<Attr>),
}

#[derive(Debug)]
struct ChainNode {
    batch: Batch,
    parent: Option<Arc<ChainNode>>,
}

#[derive(Debug, Clone, Default)]
pub struct AttrChain {
    head: Option<Arc<ChainNode>>,
    len: usize,
}

impl AttrChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with `name` opened as a namespace. An empty name is a no-op.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        self.push(Batch::Group(name.to_string()))
    }

    /// Chain with `attrs` appended. An empty list is a no-op.
    #[must_use]
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        if attrs.is_empty() {
            return self.clone();
        }
        self.push(Batch::Attrs(attrs))
    }

    fn push(&self, batch: Batch) -> Self {
        Self {
            head: Some(Arc::new(ChainNode {
                batch,
                parent: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Batches from newest to oldest
    pub fn iter(&self) -> impl Iterator<Item = &Batch> {
        std::iter::successors(self.head.as_deref(), |node| node.parent.as_deref())
            .map(|node| &node.batch)
    }

    /// Unroll several chains into one oldest-to-newest sequence,
    /// the first chain's batches first.
    pub fn flatten<'a>(chains: &[&'a AttrChain]) -> Vec<&'a Batch> {
        let total = chains.iter().map(|c| c.len()).sum();
        let mut batches = Vec::with_capacity(total);
        for chain in chains {
            let start = batches.len();
            batches.extend(chain.iter());
            batches[start..].reverse();
        }
        batches
    }
}
