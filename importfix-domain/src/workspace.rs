use crate::error::{ImportfixError, ImportfixResult};
use crate::ports::SourceTree;
use camino::{Utf8Path, Utf8PathBuf};
use importfix_types::descriptor::ModuleDescriptor;
use importfix_types::patch::{PatchEntry, parse_patch_document};
use tracing::debug;

/// Conventional name of the module directory next to the manifest.
pub const MODULES_DIR_NAME: &str = "Pods";

/// Where a workspace lives: the manifest (`Podfile`) and its sibling module directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub manifest: Utf8PathBuf,
    pub project_root: Utf8PathBuf,
    pub modules_dir: Utf8PathBuf,
}

impl WorkspaceLayout {
    pub fn locate(tree: &dyn SourceTree, manifest: &Utf8Path) -> ImportfixResult<Self> {
        Self::locate_with(tree, manifest, None)
    }

    /// Like [`locate`](Self::locate), with an explicit module directory instead of the sibling.
    pub fn locate_with(
        tree: &dyn SourceTree,
        manifest: &Utf8Path,
        modules_dir: Option<&Utf8Path>,
    ) -> ImportfixResult<Self> {
        if !tree.is_file(manifest) {
            return Err(ImportfixError::WorkspaceNotFound {
                path: manifest.to_path_buf(),
            });
        }
        let project_root = manifest
            .parent()
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| Utf8PathBuf::from("."));
        let modules_dir = modules_dir
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|| project_root.join(MODULES_DIR_NAME));
        if !tree.is_dir(&modules_dir) {
            return Err(ImportfixError::WorkspaceNotFound { path: modules_dir });
        }
        debug!(manifest = %manifest, modules_dir = %modules_dir, "located workspace");
        Ok(Self {
            manifest: manifest.to_path_buf(),
            project_root,
            modules_dir,
        })
    }
}

/// Identity of the module that owns a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleIdentity {
    /// Directory or descriptor name.
    pub name: String,
    /// Canonical compiled module name, when it differs.
    pub module_name: Option<String>,
}

impl ModuleIdentity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_name: None,
        }
    }

    pub fn from_descriptor(descriptor: &ModuleDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            module_name: descriptor.module_name.clone(),
        }
    }

    /// True when `module` names this module under either identifier.
    pub fn is(&self, module: &str) -> bool {
        self.name == module || self.module_name.as_deref() == Some(module)
    }
}

/// A resolved file to sanitize and the module it belongs to (none in app mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: Utf8PathBuf,
    pub owner: Option<ModuleIdentity>,
}

pub fn load_descriptor(tree: &dyn SourceTree, path: &Utf8Path) -> ImportfixResult<ModuleDescriptor> {
    if !tree.is_file(path) {
        return Err(ImportfixError::WorkspaceNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = tree.read_to_string(path)?;
    ModuleDescriptor::from_json(&contents).map_err(|e| ImportfixError::Document {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

pub fn load_patch(tree: &dyn SourceTree, path: &Utf8Path) -> ImportfixResult<Vec<PatchEntry>> {
    let contents = tree.read_to_string(path)?;
    parse_patch_document(&contents).map_err(|e| ImportfixError::Document {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
