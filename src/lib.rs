// LogMerge - lib.rs
//
// Library entry point. The merge engine lives here so it can be driven by
// the CLI in `main.rs`, by integration tests, or programmatically.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
