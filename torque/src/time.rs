//! Data types for simulated time.

#[doc(inline)]
pub use torque_base::time::*;
