//! Tools that we could imagine being in the Rust standard library, but aren't.

#[doc(inline)]
pub use torque_base::util::*;
