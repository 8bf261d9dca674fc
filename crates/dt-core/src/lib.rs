//! Shared primitives used across Detour crates.

use core::fmt;

/// Result alias used across the workspace.
pub type RedirectResult<T> = Result<T, RedirectError>;

/// Top-level error type. Codes are stable `layer.condition` identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectError {
    pub code: &'static str,
    pub message: String,
}

impl RedirectError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for RedirectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for RedirectError {}
