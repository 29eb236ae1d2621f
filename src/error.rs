//! Error types shared across the dashboard shell.
//!
//! None of these abort the shell. Registration and materialization errors are
//! logged by the component that produces them and the shell keeps running in a
//! degraded state.

use thiserror::Error;

/// Route registration gave up after exhausting its retry budget.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("route registration abandoned after {attempts} attempt(s); missing views: {}", .missing.join(", "))]
    Exhausted {
        attempts: u32,
        missing: Vec<String>,
    },
}

/// Fetching a single template fragment failed.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template fragment not found: {0}")]
    NotFound(String),

    #[error("failed to read template {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template URL for {name}: {source}")]
    InvalidUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP {status} while fetching template {name}")]
    Status { name: String, status: u16 },

    #[error("request for template {name} failed: {message}")]
    Request { name: String, message: String },
}

/// A view could not materialize all of its fragments.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("view '{view}' loaded {loaded} of {total} fragment(s); failed: {}", .failed.join(", "))]
    Partial {
        view: String,
        loaded: usize,
        total: usize,
        failed: Vec<String>,
    },
}

/// Configuration file problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}
