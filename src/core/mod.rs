// LogMerge - core/mod.rs
//
// Core merge engine: parsing, loading, merging, writing.
// Must NOT depend on: app, platform, or the CLI.

pub mod loader;
pub mod merge;
pub mod model;
pub mod parser;
pub mod writer;
