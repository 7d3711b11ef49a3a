// LogMerge - app/mod.rs
//
// Application layer: wires the core stages into a complete merge run.

pub mod pipeline;
