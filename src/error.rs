//! Classified errors for org resolution and file helpers.
//!
//! Every failure carries a client-facing message (its `Display`), a diagnostic
//! detail, and a stack/trace string. Logging is an explicit call so callers
//! decide whether an error is reported or propagated.
use crate::config::TraceLevel;
use std::path::PathBuf;
use thiserror::Error;

/// Alias label used when no alias was requested.
pub const DEFAULT_ALIAS_LABEL: &str = "default";

/// Render an optional alias the way errors and logs reference it.
pub fn alias_label(alias: Option<&str>) -> String {
    match alias.map(str::trim) {
        Some(alias) if !alias.is_empty() => alias.to_string(),
        _ => DEFAULT_ALIAS_LABEL.to_string(),
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    /// The `sfdx` process could not be launched.
    #[error("unable to run sfdx for org {alias}")]
    ToolUnavailable { alias: String, message: String },

    /// `sfdx` ran but its output was not the expected JSON.
    #[error("sfdx returned unreadable output for org {alias}")]
    MalformedResponse {
        alias: String,
        message: String,
        stack: String,
    },

    /// `sfdx` reported a non-zero status.
    #[error("failed to resolve org {alias}: {message}")]
    ResolutionFailed {
        alias: String,
        message: String,
        stack: String,
    },

    /// A filesystem call failed after the target was found.
    #[error("file operation failed for {}", .path.display())]
    IoFailure { path: PathBuf, message: String },

    #[error("{} does not exist", .path.display())]
    MissingPath { path: PathBuf },
}

impl ConnectError {
    /// Stable snake_case name of the classification.
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectError::ToolUnavailable { .. } => "tool_unavailable",
            ConnectError::MalformedResponse { .. } => "malformed_response",
            ConnectError::ResolutionFailed { .. } => "resolution_failed",
            ConnectError::IoFailure { .. } => "io_failure",
            ConnectError::MissingPath { .. } => "missing_path",
        }
    }

    pub fn client_message(&self) -> String {
        self.to_string()
    }

    /// Diagnostic message from the underlying failure.
    pub fn detail(&self) -> &str {
        match self {
            ConnectError::ToolUnavailable { message, .. }
            | ConnectError::MalformedResponse { message, .. }
            | ConnectError::ResolutionFailed { message, .. }
            | ConnectError::IoFailure { message, .. } => message.as_str(),
            ConnectError::MissingPath { .. } => "path not found",
        }
    }

    /// Stack or trace string; empty when the failure has none.
    pub fn stack(&self) -> &str {
        match self {
            ConnectError::MalformedResponse { stack, .. }
            | ConnectError::ResolutionFailed { stack, .. } => stack.as_str(),
            _ => "",
        }
    }

    /// Alias the failing resolution was asked for, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            ConnectError::ToolUnavailable { alias, .. }
            | ConnectError::MalformedResponse { alias, .. }
            | ConnectError::ResolutionFailed { alias, .. } => Some(alias.as_str()),
            _ => None,
        }
    }

    /// Emit this error at `level`; returns whether anything was logged.
    pub fn log(&self, level: TraceLevel) -> bool {
        if !level.logs_errors() {
            return false;
        }
        if level.is_verbose() {
            tracing::error!(
                kind = self.kind(),
                detail = self.detail(),
                stack = self.stack(),
                "{}",
                self.client_message()
            );
        } else {
            tracing::error!(kind = self.kind(), "{}", self.client_message());
        }
        true
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
