//! Command-line configuration
//!
//! [`Cli`] is what clap parses (flags can also come from the environment or a
//! `.env` file). [`Cli::into_config`] validates it into a [`CompareConfig`].

use crate::error::{CompareError, Result};
use crate::report::ReportOptions;
use crate::snapshot::NoiseFilter;
use clap::{ArgAction, Parser};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "snapcmp")]
#[command(about = "Compare backup snapshots in two roots using an external summary tool")]
#[command(version)]
pub struct Cli {
    /// Executable that prints a summary of the snapshot named by its argument
    pub tool: Option<PathBuf>,

    /// Root holding the original snapshots
    pub source: Option<PathBuf>,

    /// Root holding the copied snapshots
    pub target: Option<PathBuf>,

    /// How in-progress snapshots are recognised
    #[arg(long, value_enum, env = "SNAPCMP_NOISE_FILTER", default_value_t = NoiseFilter::Suffix)]
    pub noise_filter: NoiseFilter,

    /// Kill a summarizer run after this many seconds
    #[arg(long, env = "SNAPCMP_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Directory for scratch capture buffers
    #[arg(long, env = "SNAPCMP_SCRATCH_DIR", value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Changed lines to show on mismatch (0 hides the diff)
    #[arg(long, env = "SNAPCMP_DIFF_LINES", default_value_t = 40)]
    pub diff_lines: usize,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Validated inputs of a comparison run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    pub tool: PathBuf,
    pub source: PathBuf,
    pub target: PathBuf,
    pub noise_filter: NoiseFilter,
    pub timeout: Option<Duration>,
    pub scratch_dir: Option<PathBuf>,
}

impl Cli {
    /// Validate arguments in order: tool, source root, target root
    pub fn into_config(self) -> Result<(CompareConfig, ReportOptions)> {
        let tool = self
            .tool
            .ok_or_else(|| CompareError::config("missing summarizer tool path"))?;
        let tool = resolve_tool(&tool)?;

        let source = self
            .source
            .ok_or_else(|| CompareError::config("missing source root"))?;
        let source = require_dir("source", &strip_trailing_slash(&source))?;

        let target = self
            .target
            .ok_or_else(|| CompareError::config("missing target root"))?;
        let target = require_dir("target", &strip_trailing_slash(&target))?;

        let timeout = match self.timeout {
            Some(0) => return Err(CompareError::config("--timeout must be at least 1 second")),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let config = CompareConfig {
            tool,
            source,
            target,
            noise_filter: self.noise_filter,
            timeout,
            scratch_dir: self.scratch_dir,
        };
        let report = ReportOptions {
            diff_lines: self.diff_lines,
        };
        Ok((config, report))
    }
}

/// Find the tool and make sure it can be executed.
///
/// A bare name is looked up on `PATH` first. The result is always absolute,
/// since the tool runs with each root as its working directory.
pub fn resolve_tool(tool: &Path) -> Result<PathBuf> {
    let candidate = if is_bare_name(tool) {
        which::which(tool).unwrap_or_else(|_| tool.to_path_buf())
    } else {
        tool.to_path_buf()
    };
    let path = std::path::absolute(&candidate).map_err(|e| {
        CompareError::config(format!("cannot resolve {}: {}", tool.display(), e))
    })?;
    verify_executable(&path)?;
    Ok(path)
}

fn is_bare_name(tool: &Path) -> bool {
    let mut components = tool.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Existing regular file with an execute bit
pub fn verify_executable(path: &Path) -> Result<()> {
    let meta = std::fs::metadata(path)
        .map_err(|_| CompareError::config(format!("{} does not exist", path.display())))?;
    if !meta.is_file() {
        return Err(CompareError::config(format!(
            "{} is not a file",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o111 == 0 {
            return Err(CompareError::config(format!(
                "{} is not executable",
                path.display()
            )));
        }
    }

    Ok(())
}

fn require_dir(role: &str, path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(CompareError::config(format!(
            "{} root {} does not exist",
            role,
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(CompareError::config(format!(
            "{} root {} is not a directory",
            role,
            path.display()
        )));
    }
    Ok(path.to_path_buf())
}

/// `/backups/` and `/backups` name the same root
pub fn strip_trailing_slash(path: &Path) -> PathBuf {
    path.components().collect()
}
