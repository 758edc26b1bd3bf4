//! Configuration file loading for importfix.
//!
//! Discovers and loads `importfix.toml` from the project root (the manifest's directory).
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use importfix_domain::{DEFAULT_HEADER_EXTENSIONS, DEFAULT_IMPLEMENTATION_EXTENSIONS, FileKinds};
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "importfix.toml";

/// Top-level configuration from importfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImportfixConfig {
    /// Ownership index settings.
    pub index: IndexConfig,

    /// Which extensions count as headers and implementation files.
    pub files: FilesConfig,

    pub run: RunConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Module directories never indexed, in any mode.
    pub exclude: Vec<String>,

    /// Patch document, relative to the project root.
    pub patch_file: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub header_extensions: Option<Vec<String>>,
    pub implementation_extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Compute and report rewrites without writing files.
    pub dry_run: bool,
}

/// Discover the importfix.toml config file.
///
/// Returns `None` if no config file is found.
pub fn discover_config(project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse an importfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<ImportfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<ImportfixConfig> {
    let config: ImportfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(project_root: &Utf8Path) -> anyhow::Result<ImportfixConfig> {
    match discover_config(project_root) {
        Some(path) => load_config(&path),
        None => Ok(ImportfixConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    /// Excluded modules (from config file, extended by CLI).
    pub exclude: Vec<String>,

    /// CLI patch file, else the config one resolved against the project root.
    pub patch_file: Option<Utf8PathBuf>,

    pub dry_run: bool,
    pub kinds: FileKinds,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: ImportfixConfig,
}

impl ConfigMerger {
    pub fn new(config: ImportfixConfig) -> Self {
        Self { config }
    }

    /// Merge with run arguments.
    ///
    /// CLI `exclude` extends the config list; a CLI patch file replaces the configured one;
    /// `--dry-run` can only turn dry runs on.
    pub fn merge_run_args(
        self,
        project_root: &Utf8Path,
        cli_exclude: &[String],
        cli_patch_file: Option<&Utf8Path>,
        cli_dry_run: bool,
    ) -> MergedConfig {
        let mut exclude = self.config.index.exclude;
        for module in cli_exclude {
            if !exclude.contains(module) {
                exclude.push(module.clone());
            }
        }

        let patch_file = match cli_patch_file {
            Some(path) => Some(path.to_path_buf()),
            None => self
                .config
                .index
                .patch_file
                .map(|p| if p.is_absolute() { p } else { project_root.join(p) }),
        };

        let files = self.config.files;
        let kinds = FileKinds::new(
            files.header_extensions.unwrap_or_else(|| to_owned(DEFAULT_HEADER_EXTENSIONS)),
            files
                .implementation_extensions
                .unwrap_or_else(|| to_owned(DEFAULT_IMPLEMENTATION_EXTENSIONS)),
        );

        MergedConfig {
            exclude,
            patch_file,
            dry_run: cli_dry_run || self.config.run.dry_run,
            kinds,
        }
    }
}

fn to_owned(exts: &[&str]) -> Vec<String> {
    exts.iter().map(|e| e.to_string()).collect()
}
