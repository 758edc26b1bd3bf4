//! BDD harness (cucumber-rs).
//!
//! Scenario tests live in `tests/cucumber.rs`; this library holds the workspace scaffolding
//! the steps share.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tempfile::TempDir;

/// A throwaway CocoaPods-style project: `Podfile` at the root and a `Pods/` directory.
#[derive(Debug)]
pub struct ScratchWorkspace {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl ScratchWorkspace {
    pub fn new() -> anyhow::Result<Self> {
        let temp = tempfile::tempdir().context("create temp workspace")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|p| anyhow::anyhow!("non-UTF-8 temp dir: {}", p.display()))?;
        let ws = Self { _temp: temp, root };
        ws.write("Podfile", "platform :ios, '12.0'\n")?;
        fs::create_dir_all(ws.root.join("Pods"))?;
        Ok(ws)
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn manifest(&self) -> Utf8PathBuf {
        self.root.join("Podfile")
    }

    /// Write `contents` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> anyhow::Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(())
    }

    pub fn read(&self, rel: &str) -> anyhow::Result<String> {
        Ok(fs::read_to_string(self.root.join(rel))?)
    }

    /// Parsed `artifacts/importfix/report.json`.
    pub fn report(&self) -> anyhow::Result<serde_json::Value> {
        let text = self.read("artifacts/importfix/report.json")?;
        serde_json::from_str(&text).context("parse report.json")
    }
}
