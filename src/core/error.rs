//! Error types for the dedup middleware and its sinks

pub type Result<T> = std::result::Result<T, DedupError>;

#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization or config parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A downstream handler refused the record
    #[error("Sink '{sink}' failed: {message}")]
    SinkError { sink: String, message: String },
}

impl DedupError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        DedupError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        DedupError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a downstream sink error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        DedupError::SinkError {
            sink: sink.into(),
            message: message.into(),
        }
    }
}
