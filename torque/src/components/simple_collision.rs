use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::identifier::Identifier;
use crate::math::Cube;
use crate::physics::{RigidBody, step_axes};

/// Per-axis collision response which keeps the vehicle on the ground and lets it drive up
/// single-block steps. See [`step_axes()`].
///
/// This is an alternative to [`Collision`](super::Collision); a vehicle should have one
/// or the other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleCollision {
    on_ground: bool,
    colliding: bool,
    highest_collision_block: Option<Cube>,
}

impl SimpleCollision {
    /// Identifier of the simple collision component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "simple_collision");

    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the component type which builds [`SimpleCollision`].
    pub fn component_type() -> ComponentType {
        ComponentType::new(Self::IDENTIFIER, |_: ComponentInit<'_>| {
            Box::new(SimpleCollision::new())
        })
    }

    /// Whether the vehicle was moving down onto a block in the most recent tick.
    ///
    /// If the vehicle is not upright, "down" is toward its own underside.
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Whether any of the vehicle's motion was blocked in the most recent tick.
    pub fn is_colliding(&self) -> bool {
        self.colliding
    }

    /// The highest collidable block found in the most recent tick.
    pub fn highest_collision_block(&self) -> Option<Cube> {
        self.highest_collision_block
    }
}

impl VehicleComponent for SimpleCollision {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Constraints
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        let world = context.world;
        let dt = context.tick.delta_t();
        let Some(body) = context.siblings.get_mut::<RigidBody>() else {
            *self = Self::default();
            return;
        };

        let (velocity, angular_velocity) = body.predicted_velocities(dt);
        let step = step_axes(&body.hull(), velocity, dt, world, context.debug.as_deref_mut());
        if let Some(step_up) = step.step_up {
            body.position += step_up;
        }
        body.commit_velocities(step.velocity, angular_velocity);

        self.on_ground = step.on_ground;
        self.colliding = step.colliding;
        self.highest_collision_block = step.highest_collision_block;
    }
}
