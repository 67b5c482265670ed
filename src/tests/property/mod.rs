//! Property-based tests for Loremaster
//!
//! Property tests verify invariants that should hold for all inputs, rather
//! than testing specific cases.
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property --release
//! ```
//!
//! ## Test Modules
//!
//! - `slug_props`: Tests for id derivation from titles
//!   - Output uses only `[a-z0-9-]`
//!   - No leading, trailing or doubled hyphens
//!   - Idempotent
//!
//! - `combine_props`: Tests for the combine workflow
//!   - Reference lists are the duplicate-free union of the sources'
//!   - Every source ends up confirmed with exactly one new note
//!
//! - `expiry_props`: Tests for session evaluation
//!   - A passed deadline always means expired
//!   - Warnings only inside the threshold, never after a deadline
//!
//! ## Configuration
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```

mod combine_props;
mod expiry_props;
mod slug_props;
