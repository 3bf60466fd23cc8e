//! The built-in [`VehicleComponent`](crate::component::VehicleComponent)s.
//!
//! | Identifier                 | Component           | Stage       |
//! |----------------------------|---------------------|-------------|
//! | `torque:rigid_body`        | [`RigidBody`]       | Integration |
//! | `torque:gravity`           | [`Gravity`]         | Forces      |
//! | `torque:drag`              | [`Drag`]            | Forces      |
//! | `torque:float`             | [`Float`]           | Forces      |
//! | `torque:collision`         | [`Collision`]       | Constraints |
//! | `torque:simple_collision`  | [`SimpleCollision`] | Constraints |
//! | `torque:orientation_lock`  | [`OrientationLock`] | Behavior    |
//! | `torque:steering_wheel`    | [`SteeringWheel`]   | Forces      |
//! | `torque:wheels`            | [`Wheels`]          | Forces      |
//!
//! Every component other than [`RigidBody`] and [`SteeringWheel`] acts on the vehicle's
//! rigid body, and does nothing if the vehicle has none. List the steering wheel before the
//! wheels so that they steer by this tick's angle rather than the last one.
//!
//! [`RigidBody`]: crate::physics::RigidBody

use crate::component::ComponentType;
use crate::physics::RigidBody;

mod collision;
pub use collision::*;

mod drag;
pub use drag::*;

mod float;
pub use float::*;

mod gravity;
pub use gravity::*;

mod orientation_lock;
pub use orientation_lock::*;

mod rigid_body;

mod simple_collision;
pub use simple_collision::*;

mod steering_wheel;
pub use steering_wheel::*;

mod wheels;
pub use wheels::*;

/// Returns the [`ComponentType`]s of all built-in components.
pub fn builtin_types() -> [ComponentType; 9] {
    [
        RigidBody::component_type(),
        Gravity::component_type(),
        Drag::component_type(),
        Float::component_type(),
        Collision::component_type(),
        SimpleCollision::component_type(),
        OrientationLock::component_type(),
        SteeringWheel::component_type(),
        Wheels::component_type(),
    ]
}
