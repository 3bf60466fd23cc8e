use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::identifier::Identifier;
use crate::physics::RigidBody;
use crate::save::DataOutput;

impl RigidBody {
    /// Identifier of the rigid body component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "rigid_body");

    /// Returns the component type which builds rigid bodies using the mass properties of
    /// the vehicle type.
    pub fn component_type() -> ComponentType {
        ComponentType::new(Self::IDENTIFIER, |init: ComponentInit<'_>| {
            Box::new(RigidBody::load(*init.vehicle_type.mass_properties(), init.data))
        })
    }
}

impl VehicleComponent for RigidBody {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Integration
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        self.integrate(context.tick);
    }

    fn save(&self, data: &mut dyn DataOutput) {
        RigidBody::save(self, data);
    }
}
