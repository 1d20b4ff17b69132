//! snapcmp - compare backup snapshots across two roots
//!
//! Each incremental snapshot under a source root is summarized by an
//! external tool, once in the source root and once in the target root, and
//! the two summaries must be byte-identical. The first missing snapshot or
//! differing summary ends the run.

pub mod capture;
pub mod compare;
pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod snapshot;
pub mod summarize;

pub use compare::{Comparator, Outcome};
pub use config::CompareConfig;
pub use error::{CompareError, Result};
pub use snapshot::{NoiseFilter, SnapshotPlan};
pub use summarize::{ProcessSummarizer, Summarizer};
