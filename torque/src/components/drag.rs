use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::identifier::Identifier;
use crate::math::{FreeCoordinate, FreeVector};
use crate::physics::RigidBody;

/// Below this squared speed (m²/s²) there is no drag.
const MIN_SPEED_SQUARED: FreeCoordinate = 0.01;

/// Configuration of [`Drag`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct DragConfig {
    /// Dimensionless drag coefficient.
    pub drag_coefficient: FreeCoordinate,
    /// Density of the air, in kg/m³.
    pub air_density: FreeCoordinate,
    /// Frontal area, in m².
    pub cross_sectional_area: FreeCoordinate,
    /// Whether drag also damps rotation.
    pub angular_damping: bool,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_coefficient: 50.3,
            air_density: 1.225,
            cross_sectional_area: 2.0,
            angular_damping: false,
        }
    }
}

impl DragConfig {
    /// Returns the drag force on a body moving at `velocity`:
    /// `−½ · Cd · ρ · A · |v|² · v̂`.
    ///
    /// Returns [`None`] if the speed is below 0.1 m/s.
    pub fn force(&self, velocity: FreeVector) -> Option<FreeVector> {
        let speed_squared = velocity.square_length();
        if !(speed_squared >= MIN_SPEED_SQUARED) {
            return None;
        }
        let magnitude = 0.5
            * self.drag_coefficient
            * self.air_density
            * self.cross_sectional_area
            * speed_squared;
        Some(-velocity.normalize() * magnitude)
    }
}

/// Air resistance opposing the vehicle's motion, applied at the body origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Drag {
    config: DragConfig,
}

impl Drag {
    /// Identifier of the drag component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "drag");

    #[allow(missing_docs)]
    pub fn new(config: DragConfig) -> Self {
        Self { config }
    }

    /// Returns the component type which builds [`Drag`] from a [`DragConfig`].
    pub fn component_type() -> ComponentType {
        ComponentType::with_config::<DragConfig>(Self::IDENTIFIER, |init: ComponentInit<'_>| {
            Box::new(Drag::new(init.config()))
        })
    }

    #[allow(missing_docs)]
    pub fn config(&self) -> &DragConfig {
        &self.config
    }
}

impl VehicleComponent for Drag {
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
        let Some(force) = self.config.force(body.velocity) else {
            return;
        };
        let position = body.position;
        body.add_force(force, position);

        if self.config.angular_damping {
            let factor = if body.angular_velocity.square_length() < 0.1 {
                0.2
            } else {
                0.8
            };
            body.angular_velocity *= factor;
        }
    }
}
