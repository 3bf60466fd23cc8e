//! Tools that we could imagine being in the Rust standard library, but aren't.

mod log;
pub use self::log::*;
