#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn hrpay() -> Command {
    cargo_bin_cmd!("hrpay")
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A scratch workspace with its own config, database and blob root.
pub struct Workspace {
    pub dir: TempDir,
    pub config: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create tempdir");
        let config = dir.path().join("config.json");
        let body = serde_json::json!({
            "database": { "path": dir.path().join("hrms.db") },
            "storage": { "root": dir.path().join("data") },
        });
        fs::write(&config, body.to_string()).expect("write config");
        Self { dir, config }
    }

    /// A command already pointed at this workspace's config.
    pub fn cmd(&self) -> Command {
        let mut cmd = hrpay();
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    pub fn data_root(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// Create the schema and the five demo employees.
    pub fn seeded() -> Self {
        let ws = Self::new();
        ws.cmd().args(["init", "--seed"]).assert().success();
        ws
    }
}
