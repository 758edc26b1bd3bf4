use serde::{Deserialize, Serialize};

/// One ownership override: header file `name` belongs to module `pod`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEntry {
    /// Header file name, e.g. `UIView+Layout.h`.
    pub name: String,
    /// Module that should own the header.
    pub pod: String,
}

/// Parse a patch document (an ordered JSON list of [`PatchEntry`]).
pub fn parse_patch_document(s: &str) -> serde_json::Result<Vec<PatchEntry>> {
    serde_json::from_str(s)
}
