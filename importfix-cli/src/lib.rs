//! Library half of the `importfix` binary: argument model and config loading.

pub mod args;
pub mod config;
