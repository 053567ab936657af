use std::path::PathBuf;

/// Result type alias for conveyor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for conveyor operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors, surfaced before any concurrent dispatch begins
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Report template parse or render errors; fatal to the enclosing call
    #[error("template error: {message}")]
    Template { message: String },

    /// A single target's operation failed against the orchestration runtime
    #[error("{}", format_execution_error(.target, .message, .exit_code))]
    Execution {
        target: String,
        message: String,
        exit_code: Option<i32>,
    },

    /// An image publish against one registry failed
    #[error("publish to '{registry}' failed: {message}")]
    Publish { registry: String, message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Engine-level failures (a worker task panicked or could not be joined)
    #[error("internal error: {message}")]
    Internal { message: String },
}

fn format_execution_error(target: &str, message: &str, exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("operation for '{target}' failed with exit code {code}: {message}"),
        None => format!("operation for '{target}' failed: {message}"),
    }
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Internal {
            message: format!("An internal error occurred: {error}"),
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a template error
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Error::Template {
            message: message.into(),
        }
    }

    /// Create a per-target execution error
    #[must_use]
    pub fn execution(
        target: impl Into<String>,
        message: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Error::Execution {
            target: target.into(),
            message: message.into(),
            exit_code,
        }
    }

    /// Create a registry publish error
    #[must_use]
    pub fn publish(registry: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Publish {
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create an internal engine error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal {
            message: message.into(),
        }
    }
}

// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Wrap the error with a caller-supplied context message
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            Error::Configuration {
                message: format!("{}: {}", message.into(), base_error),
            }
        })
    }
}
