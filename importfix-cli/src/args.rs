//! Command-line surface of `importfix` and its mapping onto [`RunSettings`].

use crate::config::MergedConfig;
use camino::Utf8PathBuf;
use clap::Parser;
use importfix_core::settings::RunSettings;
use importfix_types::mode::SelectionMode;

#[derive(Debug, Parser)]
#[command(
    name = "importfix",
    version,
    about = "Qualify #import directives with the module that owns each header."
)]
pub struct Cli {
    /// Workspace manifest (`Podfile`). Its directory is the project root and holds `Pods/`.
    pub manifest: Utf8PathBuf,

    /// Which files to sanitize.
    #[arg(short, long, value_enum)]
    pub mode: ModeArg,

    /// sdk: module descriptor (`.podspec.json`). app: directory to sanitize.
    /// shell: module directory to use instead of `Pods/`.
    #[arg(short, long)]
    pub target_path: Option<Utf8PathBuf>,

    /// JSON document mapping headers to the module that should own them.
    #[arg(short, long)]
    pub patch_file: Option<Utf8PathBuf>,

    /// Module directories to leave out (shell mode only, comma separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Sanitize only these module directories (shell mode only, comma separated).
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Report the rewrites without touching any file.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Output directory for artifacts (default: <project>/artifacts/importfix).
    #[arg(long)]
    pub out_dir: Option<Utf8PathBuf>,

    /// Skip writing report.json, report.md and patch.diff.
    #[arg(long, default_value_t = false)]
    pub no_artifacts: bool,

    /// Console output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log rewrite decisions (same as RUST_LOG=debug when RUST_LOG is unset).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    Sdk,
    Shell,
    App,
}

impl From<ModeArg> for SelectionMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Sdk => SelectionMode::Sdk,
            ModeArg::Shell => SelectionMode::Shell,
            ModeArg::App => SelectionMode::App,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    /// Reject flag combinations the selected mode cannot honor.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.mode != ModeArg::Shell && !(self.exclude.is_empty() && self.only.is_empty()) {
            anyhow::bail!("--exclude and --only are only valid in shell mode");
        }
        match self.mode {
            ModeArg::Sdk if self.target_path.is_none() => {
                anyhow::bail!("sdk mode needs --target-path pointing at the module descriptor")
            }
            ModeArg::App if self.target_path.is_none() => {
                anyhow::bail!("app mode needs --target-path pointing at the directory to sanitize")
            }
            _ => Ok(()),
        }
    }

    /// Project root as seen from the command line, used to discover `importfix.toml`.
    pub fn project_root(&self) -> Utf8PathBuf {
        RunSettings {
            manifest: self.manifest.clone(),
            ..Default::default()
        }
        .project_root()
    }

    pub fn to_settings(&self, merged: MergedConfig) -> RunSettings {
        RunSettings {
            manifest: self.manifest.clone(),
            mode: self.mode.into(),
            target: self.target_path.clone(),
            patch_file: merged.patch_file,
            exclude: merged.exclude,
            only: (!self.only.is_empty()).then(|| self.only.clone()),
            dry_run: merged.dry_run,
            kinds: merged.kinds,
        }
    }
}
