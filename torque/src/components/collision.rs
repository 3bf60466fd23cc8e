use crate::component::{ComponentContext, ComponentInit, ComponentType, TickStage, VehicleComponent};
use crate::debug::Marker;
use crate::identifier::Identifier;
use crate::math::FreeVector;
use crate::physics::{
    ContactPoint, ContactResolution, RigidBody, SolverBody, find_contacts, resolve_contacts,
};

/// Impulse-based collision response against the block grid.
///
/// Each tick, this finds the contacts of the vehicle's hull with collidable blocks and,
/// if there are any, replaces the body's velocities with the contact-resolved prediction
/// of where the accumulated forces would take them (see [`resolve_contacts()`]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collision {
    contacts: Vec<ContactPoint>,
    last_resolution: Option<ContactResolution>,
}

impl Collision {
    /// Identifier of the collision component type.
    pub const IDENTIFIER: Identifier = Identifier::from_static("torque", "collision");

    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the component type which builds [`Collision`].
    pub fn component_type() -> ComponentType {
        ComponentType::new(Self::IDENTIFIER, |_: ComponentInit<'_>| {
            Box::new(Collision::new())
        })
    }

    /// The contacts found during the most recent tick, with the impulses applied at them.
    pub fn contacts(&self) -> &[ContactPoint] {
        &self.contacts
    }

    /// The outcome of contact resolution in the most recent tick, or [`None`] if there
    /// were no contacts.
    pub fn last_resolution(&self) -> Option<&ContactResolution> {
        self.last_resolution.as_ref()
    }
}

impl VehicleComponent for Collision {
    fn identifier(&self) -> Identifier {
        Self::IDENTIFIER
    }

    fn stage(&self) -> TickStage {
        TickStage::Constraints
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        self.contacts.clear();
        self.last_resolution = None;

        let world = context.world;
        let dt = context.tick.delta_t();
        let Some(body) = context.siblings.get_mut::<RigidBody>() else {
            return;
        };

        self.contacts = find_contacts(&body.hull(), world, context.debug.as_deref_mut());
        if self.contacts.is_empty() {
            return;
        }

        let resolution = resolve_contacts(&SolverBody::predicted(body, dt), &mut self.contacts);
        body.commit_velocities(resolution.velocity, resolution.angular_velocity);
        self.last_resolution = Some(resolution);

        if let Some(debug) = context.debug.as_deref_mut() {
            for contact in &self.contacts {
                if contact.impulse != FreeVector::zero() {
                    debug.push(Marker::Vector {
                        origin: contact.position,
                        vector: contact.impulse / body.mass(),
                    });
                }
            }
            debug.note(format!(
                "{} contacts resolved in {} iterations; energy {:.1} J -> {:.1} J",
                self.contacts.len(),
                resolution.iterations,
                resolution.energy_before,
                resolution.energy_after,
            ));
        }
    }
}
