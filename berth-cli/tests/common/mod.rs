//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - A small catalog seed file

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Seed with a `standard` category (120/night, 2 guests) and a `suite`
/// category (280/night, 4 guests); unit lists are filled in per test.
const SEED_HEADER: &str = "\
categories:
  - id: standard
    name: Standard Room
    nightly_price: 120
    max_occupancy: 2
    total_units: 4
  - id: suite
    name: Suite
    nightly_price: 280.50
    max_occupancy: 4
    total_units: 1
units:
";

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the berth data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory path is not created; `berth` creates it.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("berth-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Command with only the binary, run from the temporary directory.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("berth").expect("Failed to find berth binary");
        cmd.current_dir(&self.temp_path)
            .env_remove("BERTH_DATA_DIR")
            .env_remove("BERTH_DISABLE_AUTOINIT")
            .env_remove("BERTH_OUTPUT_FORMAT")
            .env_remove("BERTH_LOG_MODE");
        cmd
    }

    /// Command with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file under the temporary directory and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write a seed file with `standard` units S001.. and one suite unit.
    pub fn seed_file(&self, standard_units: u32) -> PathBuf {
        let mut seed = SEED_HEADER.to_string();
        for n in 1..=standard_units {
            seed.push_str(&format!("  - {{ code: S{n:03}, category: standard }}\n"));
        }
        seed.push_str("  - { code: SU01, category: suite, floor: 3 }\n");
        self.write_file("seed.yaml", &seed)
    }

    /// Initialize the data directory with the seed catalog.
    pub fn init_seeded(&self, standard_units: u32) {
        let seed = self.seed_file(standard_units);
        self.command()
            .arg("init")
            .arg("--seed")
            .arg(seed)
            .assert()
            .success();
    }

    /// Book a stay and return the booking reference printed on stdout.
    pub fn book(&self, category: &str, check_in: &str, check_out: &str, extra: &[&str]) -> String {
        let output = self
            .command()
            .args([
                "book",
                "--category",
                category,
                "--check-in",
                check_in,
                "--check-out",
                check_out,
                "--name",
                "Test Guest",
                "--email",
                "guest@example.com",
                "--phone",
                "555-0100",
            ])
            .args(extra)
            .output()
            .expect("Failed to run book command");

        assert!(
            output.status.success(),
            "Book failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Run `list --format json` and parse the output.
    pub fn list_json(&self, extra: &[&str]) -> serde_json::Value {
        let output = self
            .command()
            .args(["list", "--format", "json"])
            .args(extra)
            .output()
            .expect("Failed to run list command");

        assert!(
            output.status.success(),
            "List failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        serde_json::from_slice(&output.stdout).expect("list output is not JSON")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
