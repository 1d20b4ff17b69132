//! Error taxonomy for snapshot comparison
//!
//! Every failure is fatal for the run. Each variant maps to the process
//! exit code the binary reports.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a scratch buffer that could not be created
pub const EXIT_RESOURCE: i32 = 1;
/// Exit code for differing tool output
pub const EXIT_CONTENT_MISMATCH: i32 = 2;
/// Exit code for bad arguments or a non-executable tool
pub const EXIT_CONFIGURATION: i32 = 3;
/// Exit code for a snapshot present in source but not in target
pub const EXIT_MISSING_IN_TARGET: i32 = 4;
/// Exit code for a tool that could not be run to completion
pub const EXIT_TOOL_FAILURE: i32 = 5;
/// Exit code for a source root that could not be listed
pub const EXIT_ENUMERATION: i32 = 6;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot allocate capture buffer in {location}: {source}")]
    ResourceAllocation {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("summarizer failed for {entry} in {}: {reason}", root.display())]
    ToolFailure {
        entry: String,
        root: PathBuf,
        reason: String,
    },
}

impl CompareError {
    pub fn config(msg: impl Into<String>) -> Self {
        CompareError::Configuration(msg.into())
    }

    pub fn tool(entry: &str, root: &std::path::Path, reason: impl Into<String>) -> Self {
        CompareError::ToolFailure {
            entry: entry.to_string(),
            root: root.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            CompareError::Configuration(_) => EXIT_CONFIGURATION,
            CompareError::ResourceAllocation { .. } => EXIT_RESOURCE,
            CompareError::Enumeration { .. } => EXIT_ENUMERATION,
            CompareError::ToolFailure { .. } => EXIT_TOOL_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
