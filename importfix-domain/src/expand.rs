//! Source pattern expansion and source file resolution.
//!
//! A declared pattern such as `Kit/{Core,UI}/**/*.{h,m}` is cut at its first leaf segment
//! (`**`); the segments before it expand to concrete directories (`Kit/Core`, `Kit/UI`) and
//! file matching inside those directories is a plain recursive listing.

use crate::error::{ImportfixError, ImportfixResult};
use crate::files::FileKinds;
use crate::ports::SourceTree;
use crate::workspace::{ModuleIdentity, SourceFile};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use importfix_types::descriptor::ModuleDescriptor;
use importfix_types::report::PatternWarning;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Resolved source files plus non-fatal pattern diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub files: Vec<SourceFile>,
    pub warnings: Vec<PatternWarning>,
}

impl Resolution {
    fn push_unique(&mut self, seen: &mut BTreeSet<Utf8PathBuf>, file: SourceFile) {
        if seen.insert(file.path.clone()) {
            self.files.push(file);
        }
    }
}

/// Which module directories a workspace-wide run covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSelection {
    pub exclude: Vec<String>,
    /// When set, only these modules are covered.
    pub only: Option<Vec<String>>,
}

impl ModuleSelection {
    pub fn includes(&self, module: &str) -> bool {
        if self.exclude.iter().any(|m| m == module) {
            return false;
        }
        match &self.only {
            Some(only) => only.iter().any(|m| m == module),
            None => true,
        }
    }
}

/// Expand one pattern into the relative directories its non-leaf prefix denotes.
///
/// Order is depth-first, first alternative first. An empty string stands for the module root.
pub fn expand_pattern(pattern: &str) -> ImportfixResult<Vec<String>> {
    check_braces(pattern)?;

    let segments: Vec<&str> = pattern
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    let mut prefix: Vec<Vec<String>> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        let alternatives = segment_alternatives(pattern, segment)?;
        if is_leaf(segment, &alternatives, i + 1 == segments.len()) {
            break;
        }
        prefix.push(alternatives);
    }

    let mut out = Vec::new();
    product(&prefix, &mut Vec::new(), &mut out);
    Ok(out)
}

fn is_leaf(segment: &str, alternatives: &[String], last: bool) -> bool {
    if segment.contains(['*', '?']) {
        return true;
    }
    last && alternatives
        .iter()
        .any(|alt| Utf8Path::new(alt).extension().is_some())
}

/// Validate brace structure over the whole pattern: no nesting, no stray or unclosed braces.
fn check_braces(pattern: &str) -> ImportfixResult<()> {
    let mut open = false;
    for c in pattern.chars() {
        match c {
            '{' if open => return Err(ImportfixError::invalid_pattern(pattern, "nested `{`")),
            '{' => open = true,
            '}' if !open => return Err(ImportfixError::invalid_pattern(pattern, "unmatched `}`")),
            '}' => open = false,
            _ => {}
        }
    }
    if open {
        return Err(ImportfixError::invalid_pattern(pattern, "unclosed `{`"));
    }
    Ok(())
}

/// Literal alternatives of a segment, e.g. `Kit{Core,UI}` -> `KitCore`, `KitUI`.
fn segment_alternatives(pattern: &str, segment: &str) -> ImportfixResult<Vec<String>> {
    let mut out = vec![String::new()];
    let mut rest = segment;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            return Err(ImportfixError::invalid_pattern(
                pattern,
                format!("brace group in `{segment}` spans a `/`"),
            ));
        };
        let literal = &rest[..start];
        let group = &rest[start + 1..start + len];
        if group.is_empty() {
            return Err(ImportfixError::invalid_pattern(pattern, "empty brace group"));
        }
        out = out
            .iter()
            .flat_map(|head| group.split(',').map(move |alt| format!("{head}{literal}{alt}")))
            .collect();
        rest = &rest[start + len + 1..];
    }
    if rest.contains('}') {
        return Err(ImportfixError::invalid_pattern(
            pattern,
            format!("brace group in `{segment}` spans a `/`"),
        ));
    }
    for head in out.iter_mut() {
        head.push_str(rest);
    }
    Ok(out)
}

fn product(segments: &[Vec<String>], current: &mut Vec<String>, out: &mut Vec<String>) {
    let Some((first, rest)) = segments.split_first() else {
        let joined = current
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("/");
        out.push(joined);
        return;
    };
    for alt in first {
        current.push(alt.clone());
        product(rest, current, out);
        current.pop();
    }
}

fn source_files_in(
    tree: &dyn SourceTree,
    dir: &Utf8Path,
    kinds: &FileKinds,
) -> ImportfixResult<Vec<Utf8PathBuf>> {
    let files = tree
        .files_under(dir)
        .with_context(|| format!("list sources under {}", dir))?;
    Ok(files.into_iter().filter(|f| kinds.is_source(f)).collect())
}

/// Files declared by a module descriptor (sdk selection).
///
/// A malformed pattern aborts the resolution; a pattern whose directories are all missing
/// only records a warning.
pub fn resolve_module_sources(
    tree: &dyn SourceTree,
    descriptor: &ModuleDescriptor,
    module_root: &Utf8Path,
    kinds: &FileKinds,
) -> ImportfixResult<Resolution> {
    let owner = ModuleIdentity::from_descriptor(descriptor);
    let mut resolution = Resolution::default();
    let mut seen = BTreeSet::new();

    for pattern in &descriptor.source_files {
        let dirs = expand_pattern(pattern)?;
        debug!(pattern = %pattern, dirs = ?dirs, "expanded source pattern");

        let mut found = false;
        for rel in dirs {
            let dir = if rel.is_empty() {
                module_root.to_path_buf()
            } else {
                module_root.join(&rel)
            };
            if !tree.is_dir(&dir) {
                debug!(dir = %dir, "pattern directory does not exist");
                continue;
            }
            found = true;
            for path in source_files_in(tree, &dir, kinds)? {
                resolution.push_unique(
                    &mut seen,
                    SourceFile {
                        path,
                        owner: Some(owner.clone()),
                    },
                );
            }
        }

        if !found {
            warn!(module = %descriptor.name, pattern = %pattern, "source pattern matched no directory");
            resolution.warnings.push(PatternWarning {
                module: Some(descriptor.name.clone()),
                pattern: pattern.clone(),
                message: "no directory matched this pattern".to_string(),
            });
        }
    }

    Ok(resolution)
}

/// Files of every selected module directory (shell selection).
pub fn resolve_workspace_sources(
    tree: &dyn SourceTree,
    modules_dir: &Utf8Path,
    selection: &ModuleSelection,
    kinds: &FileKinds,
) -> ImportfixResult<Resolution> {
    if !tree.is_dir(modules_dir) {
        return Err(ImportfixError::WorkspaceNotFound {
            path: modules_dir.to_path_buf(),
        });
    }

    let mut resolution = Resolution::default();
    let mut seen = BTreeSet::new();
    let mut covered = BTreeSet::new();

    for dir in tree.child_dirs(modules_dir)? {
        let Some(module) = dir.file_name().map(str::to_string) else {
            continue;
        };
        if !selection.includes(&module) {
            debug!(module = %module, "module not selected");
            continue;
        }
        let owner = ModuleIdentity::named(module.clone());
        for path in source_files_in(tree, &dir, kinds)? {
            resolution.push_unique(
                &mut seen,
                SourceFile {
                    path,
                    owner: Some(owner.clone()),
                },
            );
        }
        covered.insert(module);
    }

    if let Some(only) = &selection.only {
        for module in only.iter().filter(|m| !covered.contains(*m)) {
            warn!(module = %module, "selected module not found in {}", modules_dir);
        }
    }

    Ok(resolution)
}

/// Every project source under a directory, with no owning module (app selection).
pub fn resolve_directory_sources(
    tree: &dyn SourceTree,
    dir: &Utf8Path,
    kinds: &FileKinds,
) -> ImportfixResult<Resolution> {
    if !tree.is_dir(dir) {
        return Err(ImportfixError::WorkspaceNotFound {
            path: dir.to_path_buf(),
        });
    }
    let files = source_files_in(tree, dir, kinds)?
        .into_iter()
        .map(|path| SourceFile { path, owner: None })
        .collect();
    Ok(Resolution {
        files,
        warnings: Vec::new(),
    })
}
