//! Error types for scriptforge
//!
//! All modules use `ForgeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for scriptforge operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// All errors that can occur in scriptforge
#[derive(Error, Debug)]
pub enum ForgeError {
    // Manifest errors
    #[error("Invalid package manifest: {reason}")]
    ManifestParse { reason: String },

    // Metadata errors
    #[error("Unreadable build metadata at {path}: {reason}")]
    MetadataCorrupt { path: PathBuf, reason: String },

    // Toolchain errors
    #[error("Toolchain command failed at step '{step}', exit code: {code}")]
    ToolchainCommand { step: String, code: i32 },

    #[error("Unsupported toolchain version [{version}]")]
    UnsupportedToolchain { version: String },

    #[error("Project directory not found: {0}")]
    ProjectDirMissing(PathBuf),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ForgeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a toolchain command error for the given pipeline step
    pub fn toolchain(step: impl Into<String>, code: i32) -> Self {
        Self::ToolchainCommand {
            step: step.into(),
            code,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnsupportedToolchain { .. } => {
                Some("Upgrade the toolchain or lower [toolchain].minimum_version in config")
            }
            Self::CommandFailed { .. } => Some("Check that the toolchain executable is on PATH"),
            _ => None,
        }
    }
}
