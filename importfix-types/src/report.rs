use crate::mode::SelectionMode;
use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run report written as `report.json` and rendered as `report.md`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportfixReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub run: RunInfo,
    pub verdict: ReportVerdict,
    pub index: IndexSummary,

    #[serde(default)]
    pub files: Vec<FileReport>,

    /// Source patterns that resolved to no existing directory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_warnings: Vec<PatternWarning>,

    /// Files that could not be read or written.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FileFailure>,

    pub summary: RunSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunInfo {
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    pub mode: SelectionMode,

    /// True when decisions were computed but no file was persisted.
    pub dry_run: bool,

    pub manifest: Utf8PathBuf,
    pub modules_dir: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub status: ReportStatus,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// Nothing needed fixing (or everything was fixed) and nothing is ambiguous.
    Pass,
    /// Ambiguous imports remain, or a dry run found imports to rewrite.
    Warn,
    /// Some files could not be read or written.
    Fail,
}

/// Shape of the ownership index after exclusions and patching.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexSummary {
    pub modules: u64,
    pub headers: u64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded: Vec<String>,

    /// Header names still owned by more than one module.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<DuplicateHeader>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patched: Vec<PatchChange>,

    /// Patch entries naming headers the walk never observed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patch_skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateHeader {
    pub header: String,
    pub owners: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchChange {
    pub header: String,
    pub previous: Vec<String>,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: Utf8PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    pub changed: bool,

    /// False for dry runs and for unchanged files.
    pub written: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewrites: Vec<RewriteRecord>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ambiguous: Vec<AmbiguousImport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewriteKind {
    QuotedWithSlash,
    NoSlash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRecord {
    /// 1-based line of the directive.
    pub line: u32,
    pub kind: RewriteKind,
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousImport {
    pub line: u32,
    pub header: String,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternWarning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub pattern: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: Utf8PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_scanned: u64,
    pub files_changed: u64,
    pub files_written: u64,
    pub rewrites: u64,
    pub ambiguous: u64,
    pub failed: u64,
}

impl RunSummary {
    pub fn from_files(files: &[FileReport], failed: u64) -> Self {
        let mut summary = RunSummary {
            failed,
            ..Default::default()
        };
        for f in files {
            summary.files_scanned += 1;
            if f.changed {
                summary.files_changed += 1;
            }
            if f.written {
                summary.files_written += 1;
            }
            summary.rewrites += f.rewrites.len() as u64;
            summary.ambiguous += f.ambiguous.len() as u64;
        }
        summary
    }
}
