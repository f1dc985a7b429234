//! Handler trait for record destinations and middleware

use super::{error::Result, log_level::LogLevel, record::Record};
use std::sync::Arc;

/// Anything that accepts records: a sink writing them out, or a
/// middleware rewriting them before passing them on.
pub trait Handler: Send + Sync {
    /// Whether records at `level` would be handled at all
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn handle(&self, record: Record) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn enabled(&self, level: LogLevel) -> bool {
        (**self).enabled(level)
    }

    fn handle(&self, record: Record) -> Result<()> {
        (**self).handle(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
