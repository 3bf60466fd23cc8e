use std::collections::BTreeMap;
use std::sync::Arc;

use crate::component::ComponentType;
use crate::debug::DebugMarkers;
use crate::identifier::Identifier;
use crate::math::FreePoint;
use crate::save::{DataCompound, DataInput};
use crate::time::Tick;
use crate::vehicle::{
    ComponentRegistry, Registry, RegistryError, VEHICLE_TYPE_KEY, Vehicle, VehicleId,
    VehicleModel, VehicleType, VehicleTypeError,
};
use crate::world::World;

/// Error from loading or spawning a vehicle.
#[derive(Clone, Debug, Eq, PartialEq, displaydoc::Display, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// no vehicle type is registered as {0}
    UnknownVehicleType(Identifier),
    /// saved vehicle data does not name a vehicle type
    MissingVehicleType,
}

/// Owns the registered component types, models and vehicle types, and all live vehicles,
/// and ticks the vehicles together.
#[derive(Debug, Default)]
pub struct VehicleManager {
    component_types: ComponentRegistry,
    models: Registry<Arc<VehicleModel>>,
    vehicle_types: Registry<Arc<VehicleType>>,
    /// Ordered by id, which is the order vehicles were added in.
    vehicles: BTreeMap<VehicleId, Vehicle>,
    next_id: u64,
}

impl VehicleManager {
    /// Constructs a manager with the built-in component types and no vehicles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an additional component type for vehicle types to use.
    pub fn register_component_type(
        &mut self,
        component_type: ComponentType,
    ) -> Result<(), RegistryError> {
        self.component_types.register(component_type)
    }

    #[allow(missing_docs)]
    pub fn component_types(&self) -> &ComponentRegistry {
        &self.component_types
    }

    /// Registers a model for vehicle types to refer to.
    pub fn register_model(
        &mut self,
        identifier: Identifier,
        model: VehicleModel,
    ) -> Result<(), RegistryError> {
        self.models.register(identifier, Arc::new(model))
    }

    /// Registers a vehicle type under its own identifier.
    pub fn register_vehicle_type(
        &mut self,
        vehicle_type: VehicleType,
    ) -> Result<Arc<VehicleType>, RegistryError> {
        let vehicle_type = Arc::new(vehicle_type);
        self.vehicle_types
            .register(vehicle_type.identifier().clone(), Arc::clone(&vehicle_type))?;
        Ok(vehicle_type)
    }

    /// Parses a vehicle type definition (see [`VehicleType::from_json()`]) against the
    /// registered component types and models, and registers it.
    pub fn register_vehicle_type_json(
        &mut self,
        identifier: Identifier,
        json: &str,
    ) -> Result<Arc<VehicleType>, VehicleTypeError> {
        if self.vehicle_types.contains(&identifier) {
            return Err(RegistryError::Duplicate(identifier).into());
        }
        let vehicle_type =
            VehicleType::from_json(identifier, json, &self.component_types, &self.models)?;
        Ok(self.register_vehicle_type(vehicle_type)?)
    }

    /// Returns the vehicle type registered as `identifier`.
    pub fn vehicle_type(&self, identifier: &Identifier) -> Option<&Arc<VehicleType>> {
        self.vehicle_types.get(identifier)
    }

    /// Creates a new vehicle of the given type, at rest with its rigid body (if any) at
    /// `position`.
    pub fn spawn_vehicle(
        &mut self,
        vehicle_type: &Identifier,
        position: FreePoint,
    ) -> Result<VehicleId, LoadError> {
        let vehicle_type = self.lookup_vehicle_type(vehicle_type)?;
        let mut vehicle = vehicle_type.instantiate();
        if let Some(body) = vehicle.body_mut() {
            body.position = position;
        }
        let id = self.insert(vehicle);
        log::debug!(
            "spawned {id} of type {} at {:?}",
            vehicle_type.identifier(),
            position.to_array()
        );
        Ok(id)
    }

    /// Restores a vehicle from data written by [`VehicleManager::save_vehicle()`] or
    /// [`Vehicle::save()`].
    pub fn load_vehicle(&mut self, data: &dyn DataInput) -> Result<VehicleId, LoadError> {
        let type_id = data
            .read_identifier(VEHICLE_TYPE_KEY, None)
            .ok_or(LoadError::MissingVehicleType)?;
        let vehicle_type = self.lookup_vehicle_type(&type_id)?;
        let id = self.insert(Vehicle::load(vehicle_type, data));
        log::debug!("loaded {id} of type {type_id}");
        Ok(id)
    }

    /// Removes a vehicle, returning it if it existed.
    pub fn remove_vehicle(&mut self, id: VehicleId) -> Option<Vehicle> {
        let removed = self.vehicles.remove(&id);
        if removed.is_some() {
            log::debug!("removed {id}");
        }
        removed
    }

    /// Saves the vehicle with the given id, if it exists.
    pub fn save_vehicle(&self, id: VehicleId) -> Option<DataCompound> {
        let vehicle = self.vehicles.get(&id)?;
        let mut data = DataCompound::new();
        vehicle.save(&mut data);
        Some(data)
    }

    /// Saves every vehicle, in the order they were added.
    pub fn save_all(&self) -> Vec<(VehicleId, DataCompound)> {
        self.vehicles
            .keys()
            .filter_map(|&id| Some((id, self.save_vehicle(id)?)))
            .collect()
    }

    /// Saves every vehicle and then removes them all, as when the world is unloaded.
    pub fn save_and_unload_all(&mut self) -> Vec<(VehicleId, DataCompound)> {
        let saved = self.save_all();
        log::debug!("unloading {} vehicles", self.vehicles.len());
        self.vehicles.clear();
        saved
    }

    #[allow(missing_docs)]
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    #[allow(missing_docs)]
    pub fn vehicle_mut(&mut self, id: VehicleId) -> Option<&mut Vehicle> {
        self.vehicles.get_mut(&id)
    }

    /// Iterates over the vehicles in the order they were added.
    pub fn vehicles(&self) -> impl Iterator<Item = (VehicleId, &Vehicle)> + '_ {
        self.vehicles.iter().map(|(&id, vehicle)| (id, vehicle))
    }

    /// Returns the number of live vehicles.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Advances every vehicle by one tick, in the order they were added.
    pub fn tick(&mut self, tick: Tick, world: &dyn World, mut debug: Option<&mut DebugMarkers>) {
        for vehicle in self.vehicles.values_mut() {
            vehicle.tick(tick, world, debug.as_deref_mut());
        }
    }

    fn lookup_vehicle_type(&self, identifier: &Identifier) -> Result<Arc<VehicleType>, LoadError> {
        match self.vehicle_types.get(identifier) {
            Some(vehicle_type) => Ok(Arc::clone(vehicle_type)),
            None => {
                log::warn!("unknown vehicle type {identifier}");
                Err(LoadError::UnknownVehicleType(identifier.clone()))
            }
        }
    }

    fn insert(&mut self, vehicle: Vehicle) -> VehicleId {
        let id = VehicleId(self.next_id);
        self.next_id += 1;
        self.vehicles.insert(id, vehicle);
        id
    }
}
