//! Core sanitize pipeline, extracted from the CLI.
//!
//! The entry point is I/O-agnostic: reads go through [`SourceTree`] and writes through
//! [`WritePort`].

use crate::ports::WritePort;
use crate::preview::render_patch;
use crate::settings::RunSettings;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use importfix_domain::{
    ImportfixError, ModuleSelection, OwnershipIndex, Resolution, Sanitizer, SourceTree,
    WorkspaceLayout, load_descriptor, load_patch, resolve_directory_sources,
    resolve_module_sources, resolve_workspace_sources,
};
use importfix_render::render_report_md;
use importfix_types::mode::SelectionMode;
use importfix_types::report::{
    DuplicateHeader, FileFailure, FileReport, ImportfixReport, IndexSummary, ReportStatus,
    ReportVerdict, RunInfo, RunSummary, ToolInfo,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Error type for pipeline results. Every variant is fatal for the run (exit code 1).
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    Workspace(#[from] ImportfixError),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Outcome of [`run`].
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: ImportfixReport,
    /// Unified diff of every rewritten file, relative to the project root.
    pub patch: String,
}

impl RunOutcome {
    /// 0 when every file was processed, 2 when some could not be read or written.
    pub fn exit_code(&self) -> u8 {
        if self.report.failures.is_empty() { 0 } else { 2 }
    }
}

/// Run the sanitize pipeline.
///
/// Builds and patches the ownership index, resolves the file set for the selection mode and
/// rewrites each file. Per-file read and write failures are recorded and the run continues.
///
/// The caller is responsible for writing artifacts to disk (via `WritePort`)
/// or the convenience [`write_run_artifacts`] helper.
pub fn run(
    settings: &RunSettings,
    tree: &dyn SourceTree,
    writer: &dyn WritePort,
    tool: ToolInfo,
) -> Result<RunOutcome, ToolError> {
    let started_at = Utc::now();
    let layout =
        WorkspaceLayout::locate_with(tree, &settings.manifest, settings.modules_dir_override())?;

    let (index, index_summary) = build_index(settings, tree, &layout)?;
    let resolution = resolve_sources(settings, tree, &layout)?;
    info!(
        mode = %settings.mode,
        files = resolution.files.len(),
        dry_run = settings.dry_run,
        "resolved source files"
    );

    let sanitizer = Sanitizer::new(&index);
    let mut files = Vec::with_capacity(resolution.files.len());
    let mut failures = Vec::new();
    let mut before = BTreeMap::new();
    let mut after = BTreeMap::new();

    for source in &resolution.files {
        let rel_path = relative_to(&layout.project_root, &source.path);
        let text = match tree.read_to_string(&source.path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %rel_path, "could not read file: {e:#}");
                failures.push(FileFailure {
                    path: rel_path,
                    message: format!("{e:#}"),
                });
                continue;
            }
        };

        let outcome = sanitizer.sanitize(&text, source.owner.as_ref());
        let mut written = false;
        if outcome.changed {
            if settings.dry_run {
                debug!(path = %rel_path, rewrites = outcome.rewrites.len(), "dry run, not writing");
            } else {
                match writer.write_file(&source.path, outcome.content.as_bytes()) {
                    Ok(()) => {
                        written = true;
                        info!(path = %rel_path, rewrites = outcome.rewrites.len(), "rewrote imports");
                    }
                    Err(e) => {
                        warn!(path = %rel_path, "could not write file: {e:#}");
                        failures.push(FileFailure {
                            path: rel_path.clone(),
                            message: format!("{e:#}"),
                        });
                    }
                }
            }
            before.insert(rel_path.clone(), text);
            after.insert(rel_path.clone(), outcome.content);
        }

        files.push(FileReport {
            path: rel_path,
            module: source.owner.as_ref().map(|o| o.name.clone()),
            changed: outcome.changed,
            written,
            rewrites: outcome.rewrites,
            ambiguous: outcome.ambiguous,
        });
    }

    let patch = render_patch(&before, &after);
    let summary = RunSummary::from_files(&files, failures.len() as u64);
    let verdict = verdict(&summary, &resolution, settings.dry_run);

    let report = ImportfixReport {
        schema: importfix_types::schema::IMPORTFIX_REPORT_V1.to_string(),
        tool,
        run: RunInfo {
            started_at,
            ended_at: Some(Utc::now()),
            mode: settings.mode,
            dry_run: settings.dry_run,
            manifest: layout.manifest.clone(),
            modules_dir: layout.modules_dir.clone(),
            target: settings.target.clone(),
        },
        verdict,
        index: index_summary,
        files,
        pattern_warnings: resolution.warnings,
        failures,
        summary,
    };

    Ok(RunOutcome { report, patch })
}

fn build_index(
    settings: &RunSettings,
    tree: &dyn SourceTree,
    layout: &WorkspaceLayout,
) -> Result<(OwnershipIndex, IndexSummary), ToolError> {
    let index = OwnershipIndex::build(tree, &layout.modules_dir, &settings.exclude, &settings.kinds)?;
    let mut summary = IndexSummary {
        excluded: settings.exclude.clone(),
        ..Default::default()
    };

    let index = match &settings.patch_file {
        Some(path) => {
            let entries = load_patch(tree, path)?;
            let outcome = index.apply_patch(&entries);
            summary.patched = outcome.changes;
            summary.patch_skipped = outcome.skipped;
            outcome.index
        }
        None => index,
    };

    summary.modules = index.modules().len() as u64;
    summary.headers = index.len() as u64;
    summary.duplicates = index
        .duplicates()
        .into_iter()
        .map(|(header, owners)| DuplicateHeader { header, owners })
        .collect();
    for dup in &summary.duplicates {
        warn!(
            header = %dup.header,
            owners = %dup.owners.join(","),
            "header name shipped by several modules"
        );
    }

    Ok((index, summary))
}

fn resolve_sources(
    settings: &RunSettings,
    tree: &dyn SourceTree,
    layout: &WorkspaceLayout,
) -> Result<Resolution, ToolError> {
    let resolution = match settings.mode {
        SelectionMode::Sdk => {
            let descriptor_path = settings
                .target
                .as_deref()
                .context("sdk mode needs the module descriptor path as target")?;
            let descriptor = load_descriptor(tree, descriptor_path)?;
            let module_root = descriptor_path.parent().unwrap_or(Utf8Path::new("."));
            resolve_module_sources(tree, &descriptor, module_root, &settings.kinds)?
        }
        SelectionMode::Shell => {
            let selection = ModuleSelection {
                exclude: settings.exclude.clone(),
                only: settings.only.clone(),
            };
            resolve_workspace_sources(tree, &layout.modules_dir, &selection, &settings.kinds)?
        }
        SelectionMode::App => {
            let dir = settings
                .target
                .as_deref()
                .context("app mode needs the application directory as target")?;
            resolve_directory_sources(tree, dir, &settings.kinds)?
        }
    };
    Ok(resolution)
}

fn verdict(summary: &RunSummary, resolution: &Resolution, dry_run: bool) -> ReportVerdict {
    let mut reasons = Vec::new();
    if summary.failed > 0 {
        reasons.push(format!("{} file(s) could not be read or written", summary.failed));
    }
    if summary.ambiguous > 0 {
        reasons.push(format!(
            "{} ambiguous import(s) need a manual fix or a patch entry",
            summary.ambiguous
        ));
    }
    if !resolution.warnings.is_empty() {
        reasons.push(format!(
            "{} source pattern(s) matched no directory",
            resolution.warnings.len()
        ));
    }
    if dry_run && summary.rewrites > 0 {
        reasons.push(format!(
            "dry run: {} import(s) in {} file(s) would be rewritten",
            summary.rewrites, summary.files_changed
        ));
    }

    let status = if summary.failed > 0 {
        ReportStatus::Fail
    } else if reasons.is_empty() {
        ReportStatus::Pass
    } else {
        ReportStatus::Warn
    };
    ReportVerdict { status, reasons }
}

fn relative_to(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    path.strip_prefix(root)
        .map(Utf8Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Write `report.json`, `report.md` and `patch.diff` to the output directory.
pub fn write_run_artifacts(
    outcome: &RunOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let report_md = render_report_md(&outcome.report);
    writer.write_file(&out_dir.join("report.md"), report_md.as_bytes())?;

    writer.write_file(&out_dir.join("patch.diff"), outcome.patch.as_bytes())?;

    debug!(out_dir = %out_dir, "wrote run artifacts");
    Ok(())
}
