//! Rigid-body motion of vehicles and its collision response against the block grid.
//!
//! Each tick, force-generating components accumulate forces into the [`RigidBody`];
//! one of the collision strategies then corrects the velocity the body is about to take
//! ([`resolve_contacts()`] or [`step_axes()`]), and finally [`RigidBody::integrate()`]
//! moves the body.

mod body;
pub use body::*;

mod contact;
pub use contact::*;

mod stepper;
pub use stepper::*;

#[cfg(test)]
mod tests;
