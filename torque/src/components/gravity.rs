use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::identifier::Identifier;
use crate::math::{FreeCoordinate, FreeVector};
use crate::physics::RigidBody;

/// Configuration of [`Gravity`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct GravityConfig {
    /// Downward acceleration, in m/s².
    pub acceleration: FreeCoordinate,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self { acceleration: 9.8 }
    }
}

/// Pulls the vehicle downward, along world −Y, in proportion to its mass.
#[derive(Clone, Debug, PartialEq)]
pub struct Gravity {
    config: GravityConfig,
}

impl Gravity {
    /// Identifier of the gravity component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "gravity");

    #[allow(missing_docs)]
    pub fn new(config: GravityConfig) -> Self {
        Self { config }
    }

    /// Returns the component type which builds [`Gravity`] from a [`GravityConfig`].
    pub fn component_type() -> ComponentType {
        ComponentType::with_config::<GravityConfig>(Self::IDENTIFIER, |init: ComponentInit<'_>| {
            Box::new(Gravity::new(init.config()))
        })
    }

    /// The force of gravity on a body of the given mass.
    pub fn force(&self, mass: FreeCoordinate) -> FreeVector {
        FreeVector::new(0.0, -self.config.acceleration * mass, 0.0)
    }
}

impl VehicleComponent for Gravity {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Forces
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        let Some(body) = context.siblings.get_mut::<RigidBody>() else {
            return;
        };
        let force = self.force(body.mass());
        let position = body.position;
        body.add_force(force, position);
    }
}
