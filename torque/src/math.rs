//! Mathematical utilities and decisions.

#[doc(inline)]
pub use torque_base::math::*;
