// QueryBench - app/mod.rs
//
// Application layer: session orchestration.
// Dependencies: core and platform layers.

pub mod session;
