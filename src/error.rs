//! Error types for the canvas engine.
//!
//! Nothing in this crate is fatal to the host. Errors surface either as a
//! `Result` from configuration and persistence entry points or, for failures
//! the user should see, as an [`crate::engine::Action::Notify`].

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::doc::ElementId;

/// Grepable error code and retryable flag for structured error reporting.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Errors raised by the engine itself.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),
    #[error("patch would change the kind of element {0}")]
    KindMismatch(ElementId),
}

impl ErrorCode for CanvasError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::InvalidConfig(_) => "E_INVALID_CONFIG",
            Self::ElementNotFound(_) => "E_ELEMENT_NOT_FOUND",
            Self::KindMismatch(_) => "E_KIND_MISMATCH",
        }
    }
}

/// Errors reported by the element persistence collaborator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PersistError {
    #[error("element not found: {0}")]
    NotFound(ElementId),
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl ErrorCode for PersistError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_PERSIST_NOT_FOUND",
            Self::Rejected(_) => "E_PERSIST_REJECTED",
            Self::Transport(_) => "E_PERSIST_TRANSPORT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
