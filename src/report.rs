//! Result messages for the terminal

use crate::compare::Outcome;
use difference::{Changeset, Difference};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Changed lines shown for a content mismatch, 0 for none
    pub diff_lines: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { diff_lines: 40 }
    }
}

/// One-line summary, plus a diff body for content mismatches
pub fn render(outcome: &Outcome, options: &ReportOptions) -> String {
    match outcome {
        Outcome::AllMatched { compared } => {
            format!("All {} compared snapshot(s) match", compared.len())
        }
        Outcome::MissingInTarget { name } => {
            format!("{} is missing from the target root", name)
        }
        Outcome::ContentMismatch {
            name,
            source,
            target,
        } => {
            let mut msg = format!("{} differs between source and target", name);
            if options.diff_lines > 0 {
                msg.push('\n');
                msg.push_str(&line_diff(source, target, options.diff_lines));
            }
            msg
        }
    }
}

/// Changed lines only: `-` from source, `+` from target
pub fn line_diff(source: &[u8], target: &[u8], limit: usize) -> String {
    let source = String::from_utf8_lossy(source);
    let target = String::from_utf8_lossy(target);
    let changeset = Changeset::new(&source, &target, "\n");

    let mut changed = Vec::new();
    for diff in &changeset.diffs {
        let (marker, text) = match diff {
            Difference::Same(_) => continue,
            Difference::Rem(text) => ('-', text),
            Difference::Add(text) => ('+', text),
        };
        for line in text.split('\n') {
            changed.push(format!("{}{}", marker, line));
        }
    }

    // Outputs that only differ in bytes the line split hides, e.g. a trailing newline
    if changed.is_empty() {
        return "(outputs differ only in line endings or trailing whitespace)".to_string();
    }

    let mut out = String::new();
    for line in changed.iter().take(limit) {
        let _ = writeln!(out, "{}", line);
    }
    if changed.len() > limit {
        let _ = writeln!(out, "... {} more changed line(s)", changed.len() - limit);
    }
    out
}
