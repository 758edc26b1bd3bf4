//! Domain logic: decide which import directives need qualifying and rewrite them.
//!
//! This crate owns *what* gets rewritten and why. Reading the workspace goes through the
//! [`SourceTree`] port; persisting rewritten files is the `importfix-core` crate's job.

mod error;
mod expand;
mod files;
mod index;
mod ports;
mod sanitizer;
mod syntax;
mod workspace;

pub use error::{ImportfixError, ImportfixResult};
pub use expand::{
    ModuleSelection, Resolution, expand_pattern, resolve_directory_sources,
    resolve_module_sources, resolve_workspace_sources,
};
pub use files::{DEFAULT_HEADER_EXTENSIONS, DEFAULT_IMPLEMENTATION_EXTENSIONS, FileKinds};
pub use index::{OwnershipIndex, PatchOutcome};
pub use ports::{FsSourceTree, MemoryTree, SourceTree};
pub use sanitizer::{Decision, KeepReason, SanitizeOutcome, Sanitizer};
pub use syntax::{Delimiter, ImportOccurrence, Scan, SyntaxKind, scan};
pub use workspace::{
    MODULES_DIR_NAME, ModuleIdentity, SourceFile, WorkspaceLayout, load_descriptor, load_patch,
};
