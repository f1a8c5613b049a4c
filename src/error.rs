use std::path::PathBuf;
use thiserror::Error;

/// Result type for wuic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the template compiler
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid type specification '{spec}': {reason}")]
    InvalidTypeSpec { spec: String, reason: String },

    #[error("Invalid binding expression '{value}': {reason}")]
    InvalidBinding { value: String, reason: String },

    #[error("Unresolved tag <{name}> in namespace '{namespace}' at line {line}")]
    UnresolvedTag {
        namespace: String,
        name: String,
        line: usize,
    },

    #[error("Malformed template at line {line}: {message}")]
    MalformedTemplate { line: usize, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoUnknown(#[from] std::io::Error),

    #[error("Invalid AST operation: {message}")]
    InvalidNode { message: String },

    #[error("Invalid compiler state: {message}")]
    InvalidState { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create an invalid type spec error
    pub fn invalid_type(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTypeSpec {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_binding(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBinding {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed template error with line information
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            line,
            message: message.into(),
        }
    }

    /// Attach a path to an I/O failure
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_node(message: impl Into<String>) -> Self {
        Self::InvalidNode { message: message.into() }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState { message: message.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }
}
