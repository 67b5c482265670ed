//! Test modules for Loremaster
//!
//! Run all tests: `cargo test`
//! Run only property tests: `cargo test property`

mod common;
mod mocks;
mod property;
