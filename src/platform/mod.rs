// LogMerge - platform/mod.rs
//
// Platform services: configuration file location and loading, directory
// preparation for the CLI.

pub mod config;
pub mod fs;
