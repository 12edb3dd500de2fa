//! # Error Module
//!
//! Recoverable failures only exist at the configuration boundary: reading the
//! world configuration and decoding its noise graphs. Everything past that point
//! is a deterministic computation over validated inputs, so invariant violations
//! inside storage, status tracking or the world pipeline panic with the offending
//! coordinates instead of returning an error.

use std::path::PathBuf;

/// Errors raised while building a world from its configuration.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("Failed to read world configuration {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed world configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Invalid world configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Unknown noise {component} `{name}` in graph `{graph}`")]
    UnknownNoiseComponent {
        component: &'static str,
        name: String,
        graph: String,
    },

    #[error("Malformed noise parameter `{parameter}` in graph `{graph}`")]
    MalformedNoiseParameter { parameter: String, graph: String },
}

/// Convenience alias used by the configuration and generation setup code.
pub type Result<T> = std::result::Result<T, WorldError>;
