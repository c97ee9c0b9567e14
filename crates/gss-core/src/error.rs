//! Error types for the few operations where "absent" is not enough.
//!
//! Structural lookups and mutations on [`crate::Gss`] never fail: they return
//! `Option` or silently do nothing. [`GssError`] is reserved for the
//! cycle-guarded traversals and for configuration loading.

use std::fmt;
use std::path::PathBuf;

use crate::node::NodeId;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigReadFailed,
    ConfigParseError,
    CycleDetected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "E1001",
            Self::ConfigParseError => "E1002",
            Self::CycleDetected => "E2001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::CycleDetected => "Graph contains a cycle",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigReadFailed => Some("Check that the path exists and is readable."),
            Self::ConfigParseError => Some("Fix the TOML syntax and retry."),
            Self::CycleDetected => {
                Some("Remove one of the listed edges to restore an acyclic graph.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by `gss-core`.
#[derive(Debug, thiserror::Error)]
pub enum GssError {
    /// A traversal that guards against cycles found one.
    ///
    /// `path` starts and ends at the same node.
    #[error("cycle detected through {} nodes", .path.len().saturating_sub(1))]
    CycleDetected { path: Vec<NodeId> },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl GssError {
    /// The stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::ConfigRead { .. } => ErrorCode::ConfigReadFailed,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
        }
    }
}
