// QueryBench - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or touch the filesystem or network.

pub mod executor;
pub mod extractor;
pub mod model;
pub mod monitor;
pub mod report;
pub mod runner;
