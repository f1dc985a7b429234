//! In-memory appender
//!
//! Keeps every record it receives. Clones share the same buffer, so one
//! clone can be handed to a middleware while another is inspected.

use crate::core::{Handler, LogLevel, Record, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    records: Arc<Mutex<Vec<Record>>>,
    min_level: Option<LogLevel>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Snapshot of the captured records, oldest first
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn last(&self) -> Option<Record> {
        self.records.lock().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.records.lock().len()
    }

    /// Remove and return the captured records
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Handler for MemoryAppender {
    fn enabled(&self, level: LogLevel) -> bool {
        self.min_level.map_or(true, |min| level >= min)
    }

    fn handle(&self, record: Record) -> Result<()> {
        self.records.lock().push(record);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
