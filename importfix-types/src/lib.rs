//! Shared DTOs (schemas-as-code) for the importfix workspace.
//!
//! # Design constraints
//! - Descriptor and patch types are read from documents written by other tools; be tolerant.
//! - Report types are serialized to disk. Prefer adding optional fields over changing semantics.

pub mod descriptor;
pub mod mode;
pub mod patch;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const IMPORTFIX_REPORT_V1: &str = "importfix.report.v1";
}
