//! Vehicles, the declarative types they are built from, and the manager that owns them.

use core::any::{Any, TypeId};
use core::fmt;
use std::sync::Arc;

use crate::component::{ComponentContext, Siblings, TickStage, VehicleComponent};
use crate::debug::DebugMarkers;
use crate::identifier::Identifier;
use crate::input::DriverInput;
use crate::physics::RigidBody;
use crate::save::{DataInput, DataOutput};
use crate::time::Tick;
use crate::world::World;

mod manager;
pub use manager::*;

mod model;
pub use model::*;

mod registry;
pub use registry::*;

mod vehicle_type;
pub use vehicle_type::*;

#[cfg(test)]
mod tests;

/// Save data key of the vehicle's type.
pub(crate) const VEHICLE_TYPE_KEY: &str = "vehicle_type";
/// Save data key of the scope holding one child scope per component.
pub(crate) const COMPONENTS_KEY: &str = "components";

/// A simulated vehicle: an ordered collection of [`VehicleComponent`]s built from a
/// [`VehicleType`].
///
/// A vehicle holds at most one component of each concrete type, and components are found
/// by that type with [`Vehicle::component()`].
pub struct Vehicle {
    vehicle_type: Arc<VehicleType>,
    components: Vec<Box<dyn VehicleComponent>>,
    driver_input: DriverInput,
}

impl fmt::Debug for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vehicle")
            .field("vehicle_type", self.vehicle_type.identifier())
            .field("components", &self.components)
            .field("driver_input", &self.driver_input)
            .finish()
    }
}

/// vehicle already has a component of type {0}
#[derive(Clone, Debug, Eq, PartialEq, displaydoc::Display, thiserror::Error)]
pub struct DuplicateComponent(pub Identifier);

impl Vehicle {
    /// Constructs a vehicle of the given type with no components.
    ///
    /// Use [`VehicleType::instantiate()`] to get a vehicle with the type's components.
    pub fn new(vehicle_type: Arc<VehicleType>) -> Self {
        Self {
            vehicle_type,
            components: Vec::new(),
            driver_input: DriverInput::NONE,
        }
    }

    /// Builds a vehicle from its type's components, restoring each one from the data
    /// previously written by [`Vehicle::save()`].
    pub fn load(vehicle_type: Arc<VehicleType>, data: &dyn DataInput) -> Self {
        let mut vehicle = Self::new(Arc::clone(&vehicle_type));
        let saved_components = data.child(COMPONENTS_KEY);
        for component in vehicle_type.construct_components(saved_components) {
            if let Err(error) = vehicle.add_component(component) {
                log::warn!("{error}; skipping it in {}", vehicle_type.identifier());
            }
        }
        vehicle
    }

    /// Appends a component, which will run after the existing components of the same stage.
    pub fn add_component(
        &mut self,
        component: Box<dyn VehicleComponent>,
    ) -> Result<(), DuplicateComponent> {
        let type_id = concrete_type_id(&*component);
        if self
            .components
            .iter()
            .any(|existing| concrete_type_id(&**existing) == type_id)
        {
            return Err(DuplicateComponent(component.identifier()));
        }
        self.components.push(component);
        Ok(())
    }

    /// Returns this vehicle's type.
    pub fn vehicle_type(&self) -> &Arc<VehicleType> {
        &self.vehicle_type
    }

    /// Returns the component of type `T`, if the vehicle has one.
    pub fn component<T: VehicleComponent>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|component| {
                let any: &dyn Any = &**component;
                any.downcast_ref::<T>()
            })
    }

    /// Returns the component of type `T` for modification, if the vehicle has one.
    pub fn component_mut<T: VehicleComponent>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(|component| {
                let any: &mut dyn Any = &mut **component;
                any.downcast_mut::<T>()
            })
    }

    /// Iterates over the components in the order they were added.
    pub fn components(&self) -> impl Iterator<Item = &dyn VehicleComponent> + '_ {
        self.components.iter().map(|component| &**component)
    }

    /// Returns the vehicle's [`RigidBody`], if it has one.
    pub fn body(&self) -> Option<&RigidBody> {
        self.component::<RigidBody>()
    }

    /// Returns the vehicle's [`RigidBody`] for modification, if it has one.
    pub fn body_mut(&mut self) -> Option<&mut RigidBody> {
        self.component_mut::<RigidBody>()
    }

    /// Sets the controls the driver is holding, which apply to every following tick.
    ///
    /// The driver's input is not saved.
    pub fn set_driver_input(&mut self, input: DriverInput) {
        self.driver_input = input;
    }

    #[allow(missing_docs)]
    pub fn driver_input(&self) -> DriverInput {
        self.driver_input
    }

    /// Writes the vehicle's type and the persistent state of each of its components.
    pub fn save(&self, data: &mut dyn DataOutput) {
        data.write_identifier(VEHICLE_TYPE_KEY, self.vehicle_type.identifier());
        let components = data.child_mut(COMPONENTS_KEY);
        for component in &self.components {
            component.save(components.child_mut(&component.identifier().to_string()));
        }
    }

    /// Advances the vehicle by one tick.
    ///
    /// The rigid body's force accumulators are cleared, and then each [`TickStage`] runs
    /// in order, ticking its components in the order they were added.
    /// Does nothing if the tick is paused.
    pub fn tick(&mut self, tick: Tick, world: &dyn World, mut debug: Option<&mut DebugMarkers>) {
        if tick.paused() {
            return;
        }
        if let Some(body) = self.body_mut() {
            body.reset_accumulators();
        }

        let vehicle_type = &*self.vehicle_type;
        let driver_input = self.driver_input;
        for stage in TickStage::ALL {
            for index in 0..self.components.len() {
                if self.components[index].stage() != stage {
                    continue;
                }
                let Some((component, siblings)) = Siblings::split(&mut self.components, index)
                else {
                    unreachable!("component index out of bounds");
                };
                let mut context = ComponentContext::new(
                    tick,
                    vehicle_type,
                    world,
                    driver_input,
                    siblings,
                    debug.as_deref_mut(),
                );
                component.tick(&mut context);
            }
        }
    }
}

fn concrete_type_id(component: &dyn VehicleComponent) -> TypeId {
    let any: &dyn Any = component;
    any.type_id()
}

/// Identifies a vehicle owned by a [`VehicleManager`].
///
/// Ids are never reused by the same manager.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VehicleId(u64);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle #{}", self.0)
    }
}
