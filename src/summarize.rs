//! Snapshot summarizer
//!
//! The driver only needs "the text a tool prints for this snapshot in this
//! root". [`ProcessSummarizer`] gets it by running the external tool.

use crate::capture::CaptureBuffer;
use crate::error::{CompareError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

#[async_trait]
pub trait Summarizer {
    /// Write the summary of `entry`, as seen from `root`, into `out`
    async fn summarize(&self, entry: &str, root: &Path, out: &mut CaptureBuffer) -> Result<()>;
}

/// Runs `<tool> <entry>` with the root as working directory
#[derive(Debug, Clone)]
pub struct ProcessSummarizer {
    tool: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessSummarizer {
    pub fn new(tool: PathBuf) -> Self {
        Self {
            tool,
            timeout: None,
        }
    }

    /// Kill the tool if a single run exceeds `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Summarizer for ProcessSummarizer {
    async fn summarize(&self, entry: &str, root: &Path, out: &mut CaptureBuffer) -> Result<()> {
        debug!(tool = %self.tool.display(), entry, root = %root.display(), "running summarizer");

        let mut child = Command::new(&self.tool)
            .arg(entry)
            .current_dir(root)
            .stdin(Stdio::null())
            .stdout(out.stdio()?)
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| CompareError::tool(entry, root, format!("spawn failed: {}", e)))?;

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(CompareError::tool(
                        entry,
                        root,
                        format!("timed out after {}s", limit.as_secs_f64()),
                    ));
                }
            },
            None => child.wait().await,
        }
        .map_err(|e| CompareError::tool(entry, root, format!("wait failed: {}", e)))?;

        // The exit status was never part of the comparison; output is still compared.
        if !status.success() {
            warn!(entry, root = %root.display(), code = ?status.code(), "summarizer exited unsuccessfully");
        }
        Ok(())
    }
}
