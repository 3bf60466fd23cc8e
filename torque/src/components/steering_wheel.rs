use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::identifier::Identifier;
use crate::math::FreeCoordinate;
use crate::save::DataOutput;

/// Save data key of the steering wheel's angle.
const ANGLE_KEY: &str = "angle";

/// Fraction of the angle kept each tick; the wheel recenters when let go.
const RETURN_FACTOR: FreeCoordinate = 0.9;

/// Radians turned per tick while a steering control is held.
const TURN_PER_TICK: FreeCoordinate = 0.1;

/// The steering wheel the driver turns with [`DriverInput::left`] and
/// [`DriverInput::right`].
///
/// Its angle, in radians with positive meaning right, is what [`Wheels`] steers by.
/// It has no effect on the rigid body by itself.
///
/// [`DriverInput::left`]: crate::input::DriverInput::left
/// [`DriverInput::right`]: crate::input::DriverInput::right
/// [`Wheels`]: crate::components::Wheels
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SteeringWheel {
    angle: FreeCoordinate,
}

impl SteeringWheel {
    /// Identifier of the steering wheel component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "steering_wheel");

    /// Constructs a steering wheel turned to `angle` radians.
    pub fn new(angle: FreeCoordinate) -> Self {
        Self { angle }
    }

    /// Returns the component type which builds [`SteeringWheel`]s, restoring their angle.
    pub fn component_type() -> ComponentType {
        ComponentType::new(Self::IDENTIFIER, |init: ComponentInit<'_>| {
            Box::new(SteeringWheel::new(init.data.read_float(ANGLE_KEY, 0.0)))
        })
    }

    /// Returns the current angle in radians. Positive is turned right.
    pub fn angle(&self) -> FreeCoordinate {
        self.angle
    }

    #[allow(missing_docs)]
    pub fn set_angle(&mut self, angle: FreeCoordinate) {
        self.angle = angle;
    }
}

impl VehicleComponent for SteeringWheel {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Forces
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        let input = context.driver_input;
        self.angle *= RETURN_FACTOR;
        if input.left {
            self.angle -= TURN_PER_TICK;
        }
        if input.right {
            self.angle += TURN_PER_TICK;
        }
    }

    fn save(&self, data: &mut dyn DataOutput) {
        data.write_float(ANGLE_KEY, self.angle);
    }
}
