use std::{io, path::PathBuf};

/// Result type for dependency graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that abort a dependency walk.
///
/// Parse failures only reach the caller for files with a strict extension;
/// everything else is recorded in the graph's `stats` instead.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Failed to read file {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Failed to resolve module '{specifier}' from '{}': {reason}", from.display())]
    Resolution { specifier: String, from: PathBuf, reason: String },

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A specifier the resolver could not map to a file.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct ResolveFailure {
    pub reason: String,
}

impl ResolveFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}
