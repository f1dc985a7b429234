//! Dedup middleware handler

use super::chain::AttrChain;
use super::config::DedupConfig;
use super::key_map::{KeyCompare, KeyMap, KeyOrder};
use super::policy::DedupPolicy;
use super::resolve::{BuiltinConflict, ResolveKey};
use super::tree::{build_attrs, TreeBuilder};
use crate::core::{Attr, DedupMetrics, Handler, LogLevel, Record, Result};
use std::fmt;
use std::sync::Arc;

/// Middleware that removes duplicate attribute keys before passing each
/// record to the next handler
///
/// Attributes added with [`with_attrs`](Self::with_attrs) and namespaces
/// opened with [`with_group`](Self::with_group) are kept in an immutable
/// chain, so deriving a handler is cheap and never affects the parent.
///
/// # Example
///
/// ```
/// use log_dedup::{Attr, DedupHandler, DedupPolicy, Handler, LogLevel, MemoryAppender, Record};
///
/// let sink = MemoryAppender::new();
/// let handler = DedupHandler::new(sink.clone(), DedupPolicy::Overwrite)
///     .with_attrs(vec![Attr::string("user", "alice")]);
///
/// handler
///     .handle(Record::new(LogLevel::Info, "login").with_attrs(vec![Attr::string("user", "bob")]))
///     .unwrap();
///
/// assert_eq!(sink.last().unwrap().attrs, vec![Attr::string("user", "bob")]);
/// ```
#[derive(Clone)]
pub struct DedupHandler {
    next: Arc<dyn Handler>,
    chain: AttrChain,
    policy: DedupPolicy,
    key_compare: KeyCompare,
    resolve_key: Arc<dyn ResolveKey>,
    metrics: Arc<DedupMetrics>,
}

impl DedupHandler {
    pub fn new<H: Handler + 'static>(next: H, policy: DedupPolicy) -> Self {
        Self::builder().policy(policy).build(next)
    }

    /// Last value wins
    pub fn overwrite<H: Handler + 'static>(next: H) -> Self {
        Self::new(next, DedupPolicy::Overwrite)
    }

    /// First value wins
    pub fn ignore<H: Handler + 'static>(next: H) -> Self {
        Self::new(next, DedupPolicy::Ignore)
    }

    /// Every value kept under `key`, `key#01`, ...
    pub fn increment<H: Handler + 'static>(next: H) -> Self {
        Self::new(next, DedupPolicy::Increment)
    }

    /// Values collected into lists
    pub fn append<H: Handler + 'static>(next: H) -> Self {
        Self::new(next, DedupPolicy::Append)
    }

    pub fn builder() -> DedupHandlerBuilder {
        DedupHandlerBuilder::new()
    }

    /// Build a handler from validated configuration
    pub fn from_config<H: Handler + 'static>(next: H, config: &DedupConfig) -> Result<Self> {
        config.validate()?;
        Ok(config.builder().build(next))
    }

    /// Handler whose records also carry `attrs` at the current namespace
    #[must_use]
    pub fn with_attrs(&self, attrs: Vec<Attr>) -> Self {
        Self {
            chain: self.chain.with_attrs(attrs),
            ..self.clone()
        }
    }

    /// Handler that nests all later attributes under `name`.
    /// An empty name returns an equivalent handler.
    #[must_use]
    pub fn with_group(&self, name: &str) -> Self {
        Self {
            chain: self.chain.with_group(name),
            ..self.clone()
        }
    }

    /// Merge this handler's accumulated attributes with `attrs` (the newest)
    /// into a duplicate-free list
    pub fn deduplicate(&self, attrs: Vec<Attr>) -> Vec<Attr> {
        let call_site = AttrChain::new().with_attrs(attrs);
        let batches = AttrChain::flatten(&[&self.chain, &call_site]);

        let mut root = KeyMap::new(self.key_compare.clone());
        TreeBuilder::new(self.policy, self.resolve_key.as_ref(), &self.metrics)
            .build(&mut root, &batches);
        build_attrs(root)
    }

    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }

    /// Metrics shared with every handler derived from this one
    pub fn metrics(&self) -> &Arc<DedupMetrics> {
        &self.metrics
    }

    pub fn next(&self) -> &Arc<dyn Handler> {
        &self.next
    }
}

impl Handler for DedupHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        self.next.enabled(level)
    }

    fn handle(&self, mut record: Record) -> Result<()> {
        record.attrs = self.deduplicate(std::mem::take(&mut record.attrs));
        self.metrics.record_handled();

        self.next.handle(record).map_err(|err| {
            self.metrics.record_sink_failure();
            tracing::debug!(
                handler = self.name(),
                next = self.next.name(),
                error = %err,
                "next handler failed"
            );
            err
        })
    }

    fn flush(&self) -> Result<()> {
        self.next.flush()
    }

    fn name(&self) -> &str {
        self.policy.handler_name()
    }
}

impl fmt::Debug for DedupHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DedupHandler")
            .field("policy", &self.policy)
            .field("batches", &self.chain.len())
            .field("next", &self.next.name())
            .finish()
    }
}

/// Builder for [`DedupHandler`]
///
/// The builder is `Clone`, so a configured one can stamp out handlers for
/// several downstream sinks.
#[derive(Clone, Default)]
pub struct DedupHandlerBuilder {
    policy: DedupPolicy,
    key_compare: KeyCompare,
    resolve_key: Option<Arc<dyn ResolveKey>>,
    metrics: Option<Arc<DedupMetrics>>,
}

impl DedupHandlerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn policy(mut self, policy: DedupPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn key_compare(mut self, key_compare: KeyCompare) -> Self {
        self.key_compare = key_compare;
        self
    }

    #[must_use]
    pub fn key_order(self, order: KeyOrder) -> Self {
        self.key_compare(order.to_compare())
    }

    #[must_use]
    pub fn case_insensitive(self) -> Self {
        self.key_compare(KeyCompare::case_insensitive())
    }

    /// Handling of root attributes named `time`, `level`, `msg` or `source`.
    /// Replaces any resolver set earlier.
    #[must_use]
    pub fn builtin_conflict(mut self, conflict: BuiltinConflict) -> Self {
        self.resolve_key = Some(Arc::new(conflict));
        self
    }

    /// Custom key resolver. Replaces any resolver set earlier.
    #[must_use]
    pub fn resolve_key<R: ResolveKey + 'static>(mut self, resolver: R) -> Self {
        self.resolve_key = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn shared_resolve_key(mut self, resolver: Arc<dyn ResolveKey>) -> Self {
        self.resolve_key = Some(resolver);
        self
    }

    /// Share counters with handlers built elsewhere
    #[must_use]
    pub fn metrics(mut self, metrics: Arc<DedupMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build<H: Handler + 'static>(self, next: H) -> DedupHandler {
        DedupHandler {
            next: Arc::new(next),
            chain: AttrChain::new(),
            policy: self.policy,
            key_compare: self.key_compare,
            resolve_key: self
                .resolve_key
                .unwrap_or_else(|| Arc::new(BuiltinConflict::default())),
            metrics: self.metrics.unwrap_or_default(),
        }
    }
}
