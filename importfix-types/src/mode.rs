use serde::{Deserialize, Serialize};
use std::fmt;

/// Which files a run repairs and how each file's owning module is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Files declared by one module descriptor; the owner is the descriptor's module.
    Sdk,
    /// Every module directory of the workspace; the owner is the directory a file lives in.
    Shell,
    /// A host application directory; files have no owning module.
    App,
}

impl SelectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMode::Sdk => "sdk",
            SelectionMode::Shell => "shell",
            SelectionMode::App => "app",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
