// QueryBench - platform/mod.rs
//
// Platform layer: configuration files, filesystem access, database driver.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
pub mod mysql;
