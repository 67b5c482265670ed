//! Common Test Utilities
//!
//! Shared fixtures used across test modules: seeded stores wired to an
//! in-memory backend, a manual clock and a signed-in game master.

pub mod fixtures;

pub use fixtures::*;
