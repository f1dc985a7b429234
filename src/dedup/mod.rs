//! Key deduplication middleware
//!
//! Structured sinks such as JSON encoders mishandle records that carry the
//! same key twice. Layered loggers produce exactly that: a base logger adds
//! `request_id`, a request-scoped one adds it again, and the call site adds
//! `time` which the sink already writes. [`DedupHandler`] rebuilds the
//! attribute tree of every record with one of four [`DedupPolicy`]s before
//! passing it on.

pub mod chain;
pub mod config;
pub mod handler;
pub mod key_map;
pub mod policy;
pub mod resolve;
pub(crate) mod tree;

pub use chain::{AttrChain, Batch};
pub use config::DedupConfig;
pub use handler::{DedupHandler, DedupHandlerBuilder};
pub use key_map::{KeyCompare, KeyMap, KeyOrder};
pub use policy::DedupPolicy;
pub use resolve::{
    does_builtin_key_conflict, increment_key_name, join_replace_attr, join_resolve_key,
    BuiltinConflict, ReplaceAttr, ResolveKey, BUILTIN_KEYS, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY,
    TIME_KEY,
};
