//! Snapshot comparison driver
//!
//! Walks the planned snapshots in order. For each one the target root must
//! have a directory of the same name, and the summarizer must print the same
//! bytes in both roots. The first failure ends the run.

use crate::capture::CaptureBuffer;
use crate::config::CompareConfig;
use crate::error::{CompareError, Result, EXIT_CONTENT_MISMATCH, EXIT_MISSING_IN_TARGET};
use crate::snapshot::{self, SnapshotPlan};
use crate::summarize::Summarizer;
use std::path::Path;
use tracing::{debug, info};

/// How a run that did not hit an error ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every planned snapshot matched
    AllMatched { compared: Vec<String> },
    /// Target root lacks a directory the source has
    MissingInTarget { name: String },
    /// Summaries differ for `name`
    ContentMismatch {
        name: String,
        source: Vec<u8>,
        target: Vec<u8>,
    },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::AllMatched { .. } => 0,
            Outcome::MissingInTarget { .. } => EXIT_MISSING_IN_TARGET,
            Outcome::ContentMismatch { .. } => EXIT_CONTENT_MISMATCH,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::AllMatched { .. })
    }
}

pub struct Comparator<S> {
    config: CompareConfig,
    summarizer: S,
}

impl<S: Summarizer + Sync> Comparator<S> {
    pub fn new(config: CompareConfig, summarizer: S) -> Self {
        Self { config, summarizer }
    }

    /// Enumerate the source root and compare every planned snapshot
    pub async fn run(&self) -> Result<Outcome> {
        let plan = snapshot::plan(&self.config.source, self.config.noise_filter)?;
        info!(
            base = plan.base.as_deref().unwrap_or("<none>"),
            excluded = plan.excluded.len(),
            to_compare = plan.to_compare.len(),
            "planned comparison"
        );
        self.run_plan(&plan).await
    }

    /// Compare the snapshots of an already computed plan
    pub async fn run_plan(&self, plan: &SnapshotPlan) -> Result<Outcome> {
        let mut compared = Vec::with_capacity(plan.to_compare.len());

        for name in &plan.to_compare {
            if !self.config.target.join(name).is_dir() {
                info!(name = %name, "missing in target");
                return Ok(Outcome::MissingInTarget { name: name.clone() });
            }

            let source = self.capture(name, &self.config.source).await?;
            let target = self.capture(name, &self.config.target).await?;

            if source != target {
                info!(name = %name, "summaries differ");
                return Ok(Outcome::ContentMismatch {
                    name: name.clone(),
                    source,
                    target,
                });
            }

            debug!(name = %name, bytes = source.len(), "summaries match");
            compared.push(name.clone());
        }

        info!(compared = compared.len(), "all snapshots match");
        Ok(Outcome::AllMatched { compared })
    }

    async fn capture(&self, name: &str, root: &Path) -> Result<Vec<u8>> {
        let mut buffer = CaptureBuffer::allocate(self.config.scratch_dir.as_deref())?;
        self.summarizer.summarize(name, root, &mut buffer).await?;
        buffer.contents().map_err(|e| {
            CompareError::tool(name, root, format!("reading captured output: {}", e))
        })
    }
}
