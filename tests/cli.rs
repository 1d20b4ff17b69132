//! End-to-end runs of the snapcmp binary against temporary backup roots

#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BASE: &str = "2008-02-19-000000";
const INCR: &str = "2008-02-19-005705";

/// Source and target roots plus a summarizer that prints `<snapshot>/summary`
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("source")).unwrap();
        std::fs::create_dir(dir.path().join("target")).unwrap();
        let tool = dir.path().join("summarize.sh");
        std::fs::write(&tool, "#!/bin/sh\ncat \"$1/summary\" 2>/dev/null\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir }
    }

    fn source(&self) -> PathBuf {
        self.dir.path().join("source")
    }

    fn target(&self) -> PathBuf {
        self.dir.path().join("target")
    }

    fn tool(&self) -> PathBuf {
        self.dir.path().join("summarize.sh")
    }

    fn snapshot(&self, root: &Path, name: &str, summary: &str) {
        let snap = root.join(name);
        std::fs::create_dir_all(&snap).unwrap();
        std::fs::write(snap.join("summary"), summary).unwrap();
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("snapcmp").unwrap();
        cmd.env_remove("RUST_LOG")
            .env_remove("SNAPCMP_NOISE_FILTER")
            .env_remove("SNAPCMP_TIMEOUT")
            .env_remove("SNAPCMP_SCRATCH_DIR")
            .env_remove("SNAPCMP_DIFF_LINES")
            .current_dir(self.dir.path())
            .arg(self.tool())
            .arg(self.source())
            .arg(self.target());
        cmd
    }

    /// Source: base, incremental, Latest. Target: base, incremental.
    fn time_machine(&self, target_summary: &str) {
        self.snapshot(&self.source(), BASE, "base source\n");
        self.snapshot(&self.source(), INCR, "files: 10\n");
        std::fs::create_dir(self.source().join("Latest")).unwrap();
        self.snapshot(&self.target(), BASE, "base target differs\n");
        self.snapshot(&self.target(), INCR, target_summary);
    }
}

#[test]
fn identical_snapshots_exit_zero() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");

    fx.command()
        .assert()
        .code(0)
        .stdout(predicate::str::contains("All 1 compared snapshot(s) match"));
}

#[test]
fn one_byte_difference_exits_two() {
    let fx = Fixture::new();
    fx.time_machine("files: 11\n");

    fx.command()
        .assert()
        .code(2)
        .stdout(predicate::str::contains(INCR).and(predicate::str::contains("+files: 11")));
}

#[test]
fn missing_target_snapshot_exits_four() {
    let fx = Fixture::new();
    fx.snapshot(&fx.source(), BASE, "x\n");
    fx.snapshot(&fx.source(), INCR, "y\n");
    fx.snapshot(&fx.source(), "2008-02-20-010101", "z\n");
    fx.snapshot(&fx.target(), BASE, "x\n");
    fx.snapshot(&fx.target(), "2008-02-20-010101", "different\n");

    fx.command()
        .assert()
        .code(4)
        .stdout(predicate::str::contains(format!("{} is missing", INCR)));
}

#[test]
fn nonexistent_tool_exits_three_before_roots() {
    let fx = Fixture::new();
    Command::cargo_bin("snapcmp")
        .unwrap()
        .arg(fx.dir.path().join("no-such-tool"))
        .arg("/no/such/source")
        .arg("/no/such/target")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("no-such-tool"));
}

#[test]
fn non_executable_tool_exits_three() {
    let fx = Fixture::new();
    let plain = fx.dir.path().join("plain.txt");
    std::fs::write(&plain, "not a program").unwrap();

    Command::cargo_bin("snapcmp")
        .unwrap()
        .arg(&plain)
        .arg(fx.source())
        .arg(fx.target())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not executable"));
}

#[test]
fn missing_target_argument_exits_three() {
    let fx = Fixture::new();
    Command::cargo_bin("snapcmp")
        .unwrap()
        .arg(fx.tool())
        .arg(fx.source())
        .assert()
        .code(3);
}

#[test]
fn unknown_flag_exits_three() {
    let fx = Fixture::new();
    fx.command().arg("--no-such-flag").assert().code(3);
}

#[test]
fn trailing_slash_on_roots_is_accepted() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");

    Command::cargo_bin("snapcmp")
        .unwrap()
        .arg(fx.tool())
        .arg(format!("{}/", fx.source().display()))
        .arg(format!("{}/", fx.target().display()))
        .assert()
        .code(0);
}

#[test]
fn in_progress_snapshot_is_skipped() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");
    // absent from target, would be exit 4 if compared
    fx.snapshot(&fx.source(), "2008-02-21-000000.inProgress", "partial\n");

    fx.command().assert().code(0);
}

#[test]
fn literal_noise_filter_compares_nothing() {
    let fx = Fixture::new();
    fx.time_machine("files: 11\n");

    fx.command()
        .args(["--noise-filter", "literal"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("All 0 compared"));
}

#[test]
fn missing_scratch_dir_exits_one() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");

    fx.command()
        .arg("--scratch-dir")
        .arg(fx.dir.path().join("no-scratch"))
        .assert()
        .code(1);
}

#[test]
fn slow_tool_times_out() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");
    std::fs::write(fx.tool(), "#!/bin/sh\nsleep 10\n").unwrap();

    fx.command()
        .args(["--timeout", "1"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("timed out"));
}

/// Copy the fixture's summarizer to `bin/summarize.sh` under the fixture dir
fn install_in_bin(fx: &Fixture) {
    let bin = fx.dir.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::copy(fx.tool(), bin.join("summarize.sh")).unwrap();
    std::fs::set_permissions(bin.join("summarize.sh"), std::fs::Permissions::from_mode(0o755))
        .unwrap();
}

fn run_with_tool_arg(fx: &Fixture, tool: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("snapcmp")
        .unwrap()
        .env_remove("SNAPCMP_NOISE_FILTER")
        .env_remove("SNAPCMP_SCRATCH_DIR")
        .current_dir(fx.dir.path())
        .args([tool, "source", "target"])
        .assert()
}

#[test]
fn relative_tool_path_runs_in_both_roots() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");
    install_in_bin(&fx);

    run_with_tool_arg(&fx, "bin/summarize.sh").code(0);
    run_with_tool_arg(&fx, "./bin/summarize.sh").code(0);
}

#[test]
fn relative_tool_path_detects_mismatch() {
    let fx = Fixture::new();
    fx.time_machine("files: 11\n");
    install_in_bin(&fx);

    run_with_tool_arg(&fx, "bin/summarize.sh")
        .code(2)
        .stdout(predicate::str::contains(INCR));
}

#[test]
fn bare_tool_name_in_working_directory() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");

    run_with_tool_arg(&fx, "summarize.sh").code(0);
}

#[test]
fn stray_file_in_source_root_is_not_a_snapshot() {
    let fx = Fixture::new();
    fx.time_machine("files: 10\n");
    // sorts before the dated names; must not displace the base snapshot
    std::fs::write(fx.source().join(".DS_Store"), "finder junk").unwrap();
    // base summaries differ between roots, so comparing the base would exit 2
    fx.command()
        .assert()
        .code(0)
        .stdout(predicate::str::contains("All 1 compared snapshot(s) match"));
}
