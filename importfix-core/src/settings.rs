//! Clap-free settings for the sanitize pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use importfix_domain::FileKinds;
use importfix_types::mode::SelectionMode;

/// Settings for one sanitize run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Workspace manifest (`Podfile`); its directory is the project root.
    pub manifest: Utf8PathBuf,
    pub mode: SelectionMode,

    /// sdk: descriptor path. app: directory to sanitize. shell: module directory override.
    pub target: Option<Utf8PathBuf>,

    // Index
    pub patch_file: Option<Utf8PathBuf>,
    pub exclude: Vec<String>,

    // Shell selection
    pub only: Option<Vec<String>>,

    pub dry_run: bool,
    pub kinds: FileKinds,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            manifest: Utf8PathBuf::from("Podfile"),
            mode: SelectionMode::Shell,
            target: None,
            patch_file: None,
            exclude: Vec::new(),
            only: None,
            dry_run: false,
            kinds: FileKinds::default(),
        }
    }
}

impl RunSettings {
    pub fn project_root(&self) -> Utf8PathBuf {
        match self.manifest.parent() {
            Some(p) if !p.as_str().is_empty() => p.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        }
    }

    /// `<project>/artifacts/importfix`.
    pub fn default_out_dir(&self) -> Utf8PathBuf {
        self.project_root().join("artifacts").join("importfix")
    }

    /// Module directory override; only shell mode reads `target` that way.
    pub fn modules_dir_override(&self) -> Option<&Utf8Path> {
        match self.mode {
            SelectionMode::Shell => self.target.as_deref(),
            SelectionMode::Sdk | SelectionMode::App => None,
        }
    }
}
