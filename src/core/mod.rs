//! Core record types, the handler trait and the logger front end

pub mod attr;
pub mod error;
pub mod handler;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod record_builder;
pub mod timestamp;
pub mod value;

pub use attr::Attr;
pub use error::{DedupError, Result};
pub use handler::Handler;
pub use log_level::LogLevel;
pub use logger::Logger;
pub use metrics::DedupMetrics;
pub use record::{Record, Source};
pub use record_builder::RecordBuilder;
pub use timestamp::TimestampFormat;
pub use value::{LogValuer, Value};
