use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::identifier::Identifier;
use crate::math::{FreeCoordinate, FreeVector, GEOMETRY_EPSILON, Rotation};
use crate::physics::RigidBody;

/// Configuration of [`OrientationLock`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct OrientationLockConfig {
    /// Fraction, from 0 to 1, of the way toward upright that the vehicle is moved each tick.
    pub smoothing: FreeCoordinate,
}

impl Default for OrientationLockConfig {
    fn default() -> Self {
        Self { smoothing: 0.3 }
    }
}

/// Gradually rights the vehicle: pitch and roll are blended away each tick, leaving only
/// rotation about the world Y axis (yaw).
#[derive(Clone, Debug, PartialEq)]
pub struct OrientationLock {
    config: OrientationLockConfig,
}

impl OrientationLock {
    /// Identifier of the orientation lock component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "orientation_lock");

    #[allow(missing_docs)]
    pub fn new(config: OrientationLockConfig) -> Self {
        Self { config }
    }

    /// Returns the component type which builds [`OrientationLock`] from an
    /// [`OrientationLockConfig`].
    pub fn component_type() -> ComponentType {
        ComponentType::with_config::<OrientationLockConfig>(
            Self::IDENTIFIER,
            |init: ComponentInit<'_>| Box::new(OrientationLock::new(init.config())),
        )
    }
}

/// Returns the twist of `rotation` about the world Y axis: the rotation about Y alone
/// that is left after removing any tilt of the Y axis (swing-twist decomposition).
///
/// Returns [`None`] if `rotation` turns Y upside down, where the twist is undefined.
pub fn yaw_twist(rotation: Rotation) -> Option<Rotation> {
    let norm = rotation.j.hypot(rotation.r);
    if norm < GEOMETRY_EPSILON {
        return None;
    }
    Some(Rotation::quaternion(
        0.0,
        rotation.j / norm,
        0.0,
        rotation.r / norm,
    ))
}

impl VehicleComponent for OrientationLock {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Behavior
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        let Some(body) = context.siblings.get_mut::<RigidBody>() else {
            return;
        };
        let t = self.config.smoothing.clamp(0.0, 1.0);

        let yaw_only = FreeVector::new(0.0, body.angular_velocity.y, 0.0);
        body.angular_velocity = body.angular_velocity.lerp(yaw_only, t);

        if let Some(twist) = yaw_twist(body.orientation) {
            body.orientation = body.orientation.slerp(&twist, t);
        }
    }
}
