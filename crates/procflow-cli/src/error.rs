//! Errors reported by the procflow CLI.

use std::ops::Range;

use thiserror::Error;

use procflow::LayoutError;

use crate::config::ConfigError;

/// The error type for a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{message}")]
    Format {
        message: String,
        span: Option<Range<usize>>,
        src: String,
    },

    #[error("edge {from} -> {to} refers to unknown node `{missing}`")]
    UnknownNode {
        from: String,
        to: String,
        missing: String,
    },

    #[error("node `{0}` is defined more than once")]
    DuplicateId(String),

    #[error("edge {from} -> {to} is not a valid connection: {source}")]
    InvalidEdge {
        from: String,
        to: String,
        source: LayoutError,
    },

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Failed to serialize layout: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl CliError {
    /// Wraps a TOML parse error together with the source it was raised on.
    pub fn new_format_error(err: toml::de::Error, src: impl Into<String>) -> Self {
        Self::Format {
            message: err.message().to_string(),
            span: err.span(),
            src: src.into(),
        }
    }
}
