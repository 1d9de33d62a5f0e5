//! Shared test utilities for the lap timing crates.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Float assertion macro
//! - [`fixtures`] - The reference three-checkpoint track and a scripted drive over it
//! - [`prelude`] - Convenience re-exports
//!
//! ```rust,ignore
//! use laptime_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic, reason = "test-only crate")]

pub mod assertions;
pub mod fixtures;
pub mod must;
pub mod prelude;

pub use must::*;
