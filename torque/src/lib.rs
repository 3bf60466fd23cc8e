//! Torque is a rigid-body physics engine for vehicles in worlds made of cubical blocks.
//!
//! A vehicle is a single rigid body whose motion is computed from forces (gravity, drag,
//! buoyancy) and from collisions against the block grid of the host's world. The host owns
//! the world and calls into this crate once per fixed simulation step.
//!
//! ## Concepts
//!
//! * A [`Vehicle`] is an ordered collection of [`VehicleComponent`]s. Each component has
//!   a [`TickStage`]; every tick, the vehicle runs the force components, then the
//!   collision response, then integration of the body's motion, then anything else.
//!   Components never refer to each other directly, but look up their siblings by type
//!   during their tick.
//! * A [`VehicleType`] is the declarative description a vehicle is built from: its mass,
//!   its box geometry (from which the inertia tensor is derived), and its components with
//!   their configuration. Vehicle types are usually parsed from JSON.
//! * The [`VehicleManager`] owns the registries of component types, models and vehicle
//!   types, and all live vehicles, and ticks them.
//! * The host supplies block queries through the [`World`] trait, and persists vehicles
//!   through the [`DataInput`] and [`DataOutput`] traits. It passes its driver's controls
//!   to a vehicle as a [`DriverInput`], which the wheel and steering components read.
//!
//! There are two interchangeable collision strategies: [`Collision`], an iterative
//! impulse solver, and [`SimpleCollision`], a cheaper per-axis test which can climb
//! single-block steps.
//!
//! ## Coordinate system
//!
//! World coordinates are in meters, with +Y up. Each block occupies a unit [`Cube`].
//! Vehicle geometry is authored in model pixels, 16 to the meter.
//!
//! ## Dependencies and global state
//!
//! `torque` has no global state. It writes log messages using the [`log`] crate and is
//! therefore subject to that global configuration; see [`util::standard_filter()`].
//!
//! `torque` re-exports [`euclid`], which its vector types come from.
//!
//! [`Collision`]: crate::components::Collision
//! [`Cube`]: crate::math::Cube
//! [`DataInput`]: crate::save::DataInput
//! [`DataOutput`]: crate::save::DataOutput
//! [`DriverInput`]: crate::input::DriverInput
//! [`SimpleCollision`]: crate::components::SimpleCollision
//! [`TickStage`]: crate::component::TickStage
//! [`Vehicle`]: crate::vehicle::Vehicle
//! [`VehicleComponent`]: crate::component::VehicleComponent
//! [`VehicleManager`]: crate::vehicle::VehicleManager
//! [`VehicleType`]: crate::vehicle::VehicleType
//! [`World`]: crate::world::World
// Lenience for tests.
#![cfg_attr(test,
    allow(clippy::float_cmp), // deterministic tests
    allow(clippy::redundant_clone), // prefer regularity over efficiency
)]

pub mod math;

pub mod component;
pub mod components;
pub mod debug;
mod identifier;
pub use identifier::{Identifier, IdentifierError};
pub mod input;
pub mod physics;
pub mod save;
pub mod time;
pub mod util;
pub mod vehicle;
pub mod world;

/// Re-export the version of the `euclid` vector math library we're using.
pub use euclid;
