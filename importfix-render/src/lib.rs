//! Rendering helpers (markdown, console) for human-readable artifacts.

use importfix_types::report::{ImportfixReport, ReportStatus, RewriteKind};

pub fn render_report_md(report: &ImportfixReport) -> String {
    let mut out = String::new();
    out.push_str("# importfix report\n\n");
    out.push_str(&format!(
        "- Status: `{}`\n- Mode: `{}`{}\n",
        status_label(report.verdict.status),
        report.run.mode,
        if report.run.dry_run { " (dry run)" } else { "" }
    ));
    let s = &report.summary;
    out.push_str(&format!(
        "- Files scanned: {}\n- Files changed: {} (written {})\n- Rewrites: {}\n- Ambiguous imports: {}\n- Failed files: {}\n",
        s.files_scanned, s.files_changed, s.files_written, s.rewrites, s.ambiguous, s.failed
    ));
    out.push_str(&format!(
        "- Index: {} headers across {} modules\n",
        report.index.headers, report.index.modules
    ));
    for reason in &report.verdict.reasons {
        out.push_str(&format!("- Note: {}\n", reason));
    }
    out.push('\n');

    if !report.index.duplicates.is_empty() {
        out.push_str("## Duplicate headers\n\n");
        for d in &report.index.duplicates {
            out.push_str(&format!("- `{}`: {}\n", d.header, d.owners.join(", ")));
        }
        out.push('\n');
    }

    if !report.index.patched.is_empty() || !report.index.patch_skipped.is_empty() {
        out.push_str("## Patched ownership\n\n");
        for p in &report.index.patched {
            out.push_str(&format!(
                "- `{}`: {} → {}\n",
                p.header,
                p.previous.join(", "),
                p.owner
            ));
        }
        for h in &report.index.patch_skipped {
            out.push_str(&format!("- `{}`: not indexed, skipped\n", h));
        }
        out.push('\n');
    }

    if !report.pattern_warnings.is_empty() {
        out.push_str("## Pattern warnings\n\n");
        for w in &report.pattern_warnings {
            let module = w.module.as_deref().unwrap_or("-");
            out.push_str(&format!("- `{}` in {}: {}\n", w.pattern, module, w.message));
        }
        out.push('\n');
    }

    out.push_str("## Files\n\n");
    let touched: Vec<_> = report
        .files
        .iter()
        .filter(|f| f.changed || !f.ambiguous.is_empty())
        .collect();
    if touched.is_empty() {
        out.push_str("_No imports needed rewriting._\n");
    }
    for f in touched {
        out.push_str(&format!("### `{}`\n\n", f.path));
        if let Some(module) = &f.module {
            out.push_str(&format!("- Module: `{}`\n", module));
        }
        out.push_str(&format!("- Written: `{}`\n", f.written));
        if !f.rewrites.is_empty() {
            out.push_str("\n**Rewrites**\n\n");
            for r in &f.rewrites {
                out.push_str(&format!(
                    "- line {} ({}): `{}` → `{}`\n",
                    r.line,
                    kind_label(r.kind),
                    r.before,
                    r.after
                ));
            }
        }
        if !f.ambiguous.is_empty() {
            out.push_str("\n**Ambiguous**\n\n");
            for a in &f.ambiguous {
                out.push_str(&format!(
                    "- line {}: `{}` belongs to {}\n",
                    a.line,
                    a.header,
                    a.candidates.join(", ")
                ));
            }
        }
        out.push('\n');
    }

    if !report.failures.is_empty() {
        out.push_str("## Failures\n\n");
        for f in &report.failures {
            out.push_str(&format!("- `{}`: {}\n", f.path, f.message));
        }
    }

    out
}

/// Short plain-text summary for the terminal.
pub fn render_summary_text(report: &ImportfixReport) -> String {
    let s = &report.summary;
    let mut out = format!(
        "importfix {}: {} file(s) scanned, {} changed, {} rewrite(s), {} ambiguous, {} failed",
        status_label(report.verdict.status),
        s.files_scanned,
        s.files_changed,
        s.rewrites,
        s.ambiguous,
        s.failed
    );
    if report.run.dry_run {
        out.push_str(" (dry run)");
    }
    out.push('\n');
    for reason in &report.verdict.reasons {
        out.push_str(&format!("  - {}\n", reason));
    }
    out
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Warn => "warn",
        ReportStatus::Fail => "fail",
    }
}

fn kind_label(k: RewriteKind) -> &'static str {
    match k {
        RewriteKind::QuotedWithSlash => "quoted path",
        RewriteKind::NoSlash => "bare header",
    }
}
