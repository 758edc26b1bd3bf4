//! Embeddable core library for importfix.
//!
//! Provides a clap-free, I/O-abstracted entry point suitable for linking
//! into other host processes.
//!
//! # Port traits
//!
//! Reads go through the domain's [`SourceTree`]; writes go through
//! [`WritePort`](ports::WritePort). The [`adapters`] module provides the
//! filesystem-backed and in-memory implementations.
//!
//! # Entry points
//!
//! - [`run`](pipeline::run) sanitizes the selected files and builds the report
//! - [`write_run_artifacts`](pipeline::write_run_artifacts) persists report and diff

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod preview;
pub mod settings;

// Re-export the read port so callers don't need importfix-domain directly.
pub use importfix_domain::{FsSourceTree, MemoryTree, SourceTree};
