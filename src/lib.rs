//! # log_dedup
//!
//! Middleware that removes duplicate attribute keys from structured log
//! records before they reach a sink.
//!
//! Layered loggers easily produce records such as
//! `{"user":"a","user":"b"}`, which JSON parsers and log services treat
//! inconsistently. A [`DedupHandler`] sits in front of the real sink and
//! rebuilds every record's attribute tree with one of four policies:
//!
//! - **Overwrite**: the newest value wins
//! - **Ignore**: the oldest value wins
//! - **Increment**: every value is kept, later ones under `key#01`, `key#02`, ...
//! - **Append**: values are collected into a list
//!
//! Keys that collide with the sink's own fields (`time`, `level`, `msg`,
//! `source`) are moved aside at the root. The [`sinks`] module carries
//! tables for Graylog, Google Cloud Logging and AWS CloudWatch.
//!
//! ```
//! use log_dedup::prelude::*;
//!
//! let sink = MemoryAppender::new();
//! let logger = Logger::new(DedupHandler::overwrite(sink.clone()))
//!     .with(vec![Attr::string("env", "staging")]);
//!
//! logger.info("deployed", vec![Attr::string("env", "prod")]).unwrap();
//! assert_eq!(sink.last().unwrap().attrs, vec![Attr::string("env", "prod")]);
//! ```

pub mod appenders;
pub mod core;
pub mod dedup;
pub mod macros;
pub mod sinks;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    pub use crate::appenders::{JsonAppender, MemoryAppender};
    pub use crate::core::{
        Attr, DedupError, DedupMetrics, Handler, LogLevel, LogValuer, Logger, Record,
        RecordBuilder, Result, Source, TimestampFormat, Value,
    };
    pub use crate::dedup::{
        BuiltinConflict, DedupConfig, DedupHandler, DedupHandlerBuilder, DedupPolicy, KeyOrder,
    };
    pub use crate::sinks::{ResolveReplaceOptions, SinkPreset};
}

#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
pub use appenders::{JsonAppender, MemoryAppender};
pub use core::{
    Attr, DedupError, DedupMetrics, Handler, LogLevel, LogValuer, Logger, Record, RecordBuilder,
    Result, Source, TimestampFormat, Value,
};
pub use dedup::{
    BuiltinConflict, DedupConfig, DedupHandler, DedupHandlerBuilder, DedupPolicy, KeyCompare,
    KeyOrder, ReplaceAttr, ResolveKey,
};
pub use sinks::{ResolveReplaceOptions, Sink, SinkPreset};
