use crate::error::{ImportfixError, ImportfixResult};
use crate::files::FileKinds;
use crate::ports::SourceTree;
use anyhow::Context;
use camino::Utf8Path;
use importfix_types::patch::PatchEntry;
use importfix_types::report::PatchChange;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Header file name -> modules that ship a header with that exact name.
///
/// Owner lists keep first-seen order and never repeat a module. The value is immutable once
/// built; [`apply_patch`](Self::apply_patch) produces a new index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    headers: BTreeMap<String, Vec<String>>,
    modules: Vec<String>,
}

/// Result of applying a patch document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    pub index: OwnershipIndex,
    pub changes: Vec<PatchChange>,
    /// Headers named by the patch that the walk never observed.
    pub skipped: Vec<String>,
}

impl OwnershipIndex {
    /// Walk every module directory under `modules_dir` and index its headers.
    ///
    /// Modules named in `excluded` are dropped before indexing.
    pub fn build(
        tree: &dyn SourceTree,
        modules_dir: &Utf8Path,
        excluded: &[String],
        kinds: &FileKinds,
    ) -> ImportfixResult<Self> {
        if !tree.is_dir(modules_dir) {
            return Err(ImportfixError::WorkspaceNotFound {
                path: modules_dir.to_path_buf(),
            });
        }

        let mut index = OwnershipIndex::default();
        for dir in tree.child_dirs(modules_dir)? {
            let Some(module) = dir.file_name() else {
                continue;
            };
            if excluded.iter().any(|m| m == module) {
                debug!(module = %module, "excluded from index");
                continue;
            }
            index.modules.push(module.to_string());

            let files = tree
                .files_under(&dir)
                .with_context(|| format!("list headers of {}", module))?;
            for file in files.iter().filter(|f| kinds.is_header(f)) {
                if let Some(name) = file.file_name() {
                    index.insert(name, module);
                }
            }
        }

        info!(
            modules = index.modules.len(),
            headers = index.headers.len(),
            "built header ownership index"
        );
        Ok(index)
    }

    /// Build an index directly from `(header, module)` pairs.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut index = OwnershipIndex::default();
        for (header, module) in entries {
            if !index.modules.iter().any(|m| m == module) {
                index.modules.push(module.to_string());
            }
            index.insert(header, module);
        }
        index
    }

    fn insert(&mut self, header: &str, module: &str) {
        let owners = self.headers.entry(header.to_string()).or_default();
        if !owners.iter().any(|m| m == module) {
            owners.push(module.to_string());
        }
    }

    pub fn owners(&self, header: &str) -> Option<&[String]> {
        self.headers.get(header).map(Vec::as_slice)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Indexed module names, in walk order.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Headers owned by more than one module.
    pub fn duplicates(&self) -> BTreeMap<String, Vec<String>> {
        self.headers
            .iter()
            .filter(|(_, owners)| owners.len() > 1)
            .map(|(h, owners)| (h.clone(), owners.clone()))
            .collect()
    }

    /// Force each patched header's owner set to the single named module.
    ///
    /// Entries for headers the index never saw are skipped: a patch cannot introduce headers.
    pub fn apply_patch(self, overrides: &[PatchEntry]) -> PatchOutcome {
        let mut index = self;
        let mut changes = Vec::new();
        let mut skipped = Vec::new();

        for entry in overrides {
            let Some(owners) = index.headers.get_mut(&entry.name) else {
                debug!(header = %entry.name, "patch entry names an unknown header");
                skipped.push(entry.name.clone());
                continue;
            };
            let previous = std::mem::replace(owners, vec![entry.pod.clone()]);
            info!(
                header = %entry.name,
                from = ?previous,
                to = %entry.pod,
                "patched header ownership"
            );
            changes.push(PatchChange {
                header: entry.name.clone(),
                previous,
                owner: entry.pod.clone(),
            });
        }

        PatchOutcome {
            index,
            changes,
            skipped,
        }
    }
}
