use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::identifier::Identifier;
use crate::math::{Cube, FreeCoordinate, FreeVector};
use crate::physics::RigidBody;

/// Configuration of [`Float`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct FloatConfig {
    /// Upward force while in water, in newtons.
    pub buoyant_force: FreeCoordinate,
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            buoyant_force: 1000.0,
        }
    }
}

/// Buoyancy: pushes the vehicle upward with a fixed force while its origin is in a
/// waterlogged block.
#[derive(Clone, Debug, PartialEq)]
pub struct Float {
    config: FloatConfig,
}

impl Float {
    /// Identifier of the float component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "float");

    #[allow(missing_docs)]
    pub fn new(config: FloatConfig) -> Self {
        Self { config }
    }

    /// Returns the component type which builds [`Float`] from a [`FloatConfig`].
    pub fn component_type() -> ComponentType {
        ComponentType::with_config::<FloatConfig>(Self::IDENTIFIER, |init: ComponentInit<'_>| {
            Box::new(Float::new(init.config()))
        })
    }
}

impl VehicleComponent for Float {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Forces
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        let world = context.world;
        let Some(body) = context.siblings.get_mut::<RigidBody>() else {
            return;
        };
        // The host addresses blocks by truncated position.
        let Some(cube) = Cube::truncating(body.position) else {
            return;
        };
        if world.is_block_waterlogged(cube) {
            let position = body.position;
            body.add_force(FreeVector::new(0.0, self.config.buoyant_force, 0.0), position);
        }
    }
}
