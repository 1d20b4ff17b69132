//! Snapshot enumeration
//!
//! Lists the source root, drops noise entries (`Latest`, in-progress
//! backups) and sets aside the base snapshot, which has no earlier
//! increment to diff against.

use crate::error::{CompareError, Result};
use clap::ValueEnum;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the link pointing at the most recent snapshot
pub const LATEST: &str = "Latest";
/// Suffix of a snapshot that is still being written
pub const IN_PROGRESS_SUFFIX: &str = ".inProgress";

/// How in-progress entries are recognised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NoiseFilter {
    /// Exclude names ending in `.inProgress`
    #[default]
    Suffix,
    /// Unanchored wildcard match: every entry counts as noise
    Literal,
}

impl NoiseFilter {
    /// Whether `name` is skipped before any comparison
    pub fn is_noise(self, name: &str) -> bool {
        if name == LATEST {
            return true;
        }
        match self {
            NoiseFilter::Suffix => name.ends_with(IN_PROGRESS_SUFFIX),
            NoiseFilter::Literal => true,
        }
    }
}

/// Which entries of a source root get compared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotPlan {
    /// Earliest real snapshot, never compared
    pub base: Option<String>,
    /// Entries dropped by the noise filter
    pub excluded: Vec<String>,
    /// Snapshots to compare, in sorted order
    pub to_compare: Vec<String>,
}

impl SnapshotPlan {
    /// Build a plan from raw entry names. Names are sorted byte-wise first.
    pub fn from_entries(mut names: Vec<String>, filter: NoiseFilter) -> Self {
        names.sort();

        let mut excluded = Vec::new();
        let mut kept = Vec::with_capacity(names.len());
        for name in names {
            if filter.is_noise(&name) {
                excluded.push(name);
            } else {
                kept.push(name);
            }
        }

        let mut kept = kept.into_iter();
        let base = kept.next();
        SnapshotPlan {
            base,
            excluded,
            to_compare: kept.collect(),
        }
    }
}

/// Names of the subdirectories of `root`, sorted.
///
/// Symlinks count when they point at a directory, so `Latest` still shows up
/// for the noise filter. Plain files and names that are not UTF-8 are skipped.
pub fn list_entries(root: &Path) -> Result<Vec<String>> {
    let enumeration = |source: std::io::Error| CompareError::Enumeration {
        path: root.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(root).map_err(enumeration)? {
        let entry = entry.map_err(enumeration)?;
        let path = entry.path();
        if !path.is_dir() {
            debug!(path = %path.display(), "skipping non-directory entry");
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "skipping entry with non UTF-8 name"),
        }
    }
    names.sort();
    debug!(root = %root.display(), count = names.len(), "listed source root");
    Ok(names)
}

/// List `root` and plan the comparison in one step
pub fn plan(root: &Path, filter: NoiseFilter) -> Result<SnapshotPlan> {
    Ok(SnapshotPlan::from_entries(list_entries(root)?, filter))
}
