//! This library is an internal component of [`torque`],
//! which defines the core mathematical types and functions used by its physics.
//! Do not depend on this library; use only [`torque`] instead.
//!
//! [`torque`]: https://crates.io/crates/torque/

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![warn(clippy::missing_inline_in_public_items)]

/// Do not use this module directly; its contents are re-exported from `torque`.
pub mod math;

/// Do not use this module directly; its contents are re-exported from `torque`.
pub mod time;

/// Do not use this module directly; its contents are re-exported from `torque`.
pub mod util;

// reexport for convenience of our tests
#[doc(hidden)]
pub use euclid;
