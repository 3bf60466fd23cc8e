//! The parts vehicles are assembled from.
//!
//! A [`Vehicle`](crate::vehicle::Vehicle) owns an ordered list of [`VehicleComponent`]s.
//! Components never hold references to each other; during its tick a component finds the
//! others it needs through [`Siblings`], by concrete type.

use core::any::Any;
use core::fmt;
use std::sync::Arc;

use crate::debug::DebugMarkers;
use crate::identifier::Identifier;
use crate::input::DriverInput;
use crate::save::{DataInput, DataOutput};
use crate::time::Tick;
use crate::vehicle::VehicleType;
use crate::world::World;

/// A behavior or piece of state belonging to one vehicle.
pub trait VehicleComponent: fmt::Debug + Any {
    /// The identifier of this component's [`ComponentType`].
    fn identifier(&self) -> Identifier;

    /// Which part of the tick this component runs in.
    fn stage(&self) -> TickStage;

    /// Advances this component by one tick.
    fn tick(&mut self, context: &mut ComponentContext<'_>);

    /// Writes this component's persistent state, if it has any.
    fn save(&self, data: &mut dyn DataOutput) {
        let _ = data;
    }
}

/// The phases of a vehicle tick, in the order they run.
///
/// Within each stage, components run in the order they were added to the vehicle.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum TickStage {
    /// Components add forces and torques to the rigid body.
    Forces,
    /// Components correct the body's motion, such as collision response.
    Constraints,
    /// The rigid body moves according to its velocity.
    Integration,
    /// Anything that adjusts the result of movement.
    Behavior,
}

impl TickStage {
    /// All stages, in the order they run.
    pub const ALL: [Self; 4] = [
        Self::Forces,
        Self::Constraints,
        Self::Integration,
        Self::Behavior,
    ];
}

/// Everything a component may access while it is ticked.
#[non_exhaustive]
pub struct ComponentContext<'a> {
    /// The amount of time passing.
    pub tick: Tick,
    /// The type of the vehicle the component belongs to.
    pub vehicle_type: &'a VehicleType,
    /// The world the vehicle is in.
    pub world: &'a dyn World,
    /// The controls the vehicle's driver is holding.
    pub driver_input: DriverInput,
    /// The other components of the same vehicle.
    pub siblings: Siblings<'a>,
    /// Where to record debug visualization, if it is wanted this tick.
    pub debug: Option<&'a mut DebugMarkers>,
}

impl fmt::Debug for ComponentContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContext")
            .field("tick", &self.tick)
            .field("vehicle_type", &self.vehicle_type.identifier())
            .field("driver_input", &self.driver_input)
            .field("siblings", &self.siblings)
            .field("debug", &self.debug.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(
        tick: Tick,
        vehicle_type: &'a VehicleType,
        world: &'a dyn World,
        driver_input: DriverInput,
        siblings: Siblings<'a>,
        debug: Option<&'a mut DebugMarkers>,
    ) -> Self {
        Self {
            tick,
            vehicle_type,
            world,
            driver_input,
            siblings,
            debug,
        }
    }
}

/// The components of a vehicle other than the one currently being ticked.
#[derive(Debug)]
pub struct Siblings<'a> {
    before: &'a mut [Box<dyn VehicleComponent>],
    after: &'a mut [Box<dyn VehicleComponent>],
}

impl<'a> Siblings<'a> {
    /// Splits `components` into the one at `index` and the rest.
    ///
    /// Returns [`None`] if `index` is out of bounds.
    pub(crate) fn split(
        components: &'a mut [Box<dyn VehicleComponent>],
        index: usize,
    ) -> Option<(&'a mut Box<dyn VehicleComponent>, Self)> {
        let (before, rest) = components.split_at_mut_checked(index)?;
        let (current, after) = rest.split_first_mut()?;
        Some((current, Self { before, after }))
    }

    /// Returns the first sibling of type `T`, in vehicle order.
    pub fn get<T: VehicleComponent>(&self) -> Option<&T> {
        self.before
            .iter()
            .chain(self.after.iter())
            .find_map(|component| {
                let any: &dyn Any = &**component;
                any.downcast_ref::<T>()
            })
    }

    /// Returns the first sibling of type `T`, in vehicle order, for modification.
    pub fn get_mut<T: VehicleComponent>(&mut self) -> Option<&mut T> {
        self.before
            .iter_mut()
            .chain(self.after.iter_mut())
            .find_map(|component| {
                let any: &mut dyn Any = &mut **component;
                any.downcast_mut::<T>()
            })
    }

    /// Iterates over the siblings in vehicle order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn VehicleComponent> + '_ {
        self.before
            .iter()
            .chain(self.after.iter())
            .map(|component| &**component)
    }
}

/// Constructs a component of some type.
pub type ComponentConstructor = fn(ComponentInit<'_>) -> Box<dyn VehicleComponent>;

/// Parses the JSON configuration object of a component type.
pub type ConfigParser = fn(&serde_json::Value) -> Result<ParsedConfig, serde_json::Error>;

/// A component configuration which has been parsed, of a type known only to the
/// component type that parsed it.
pub type ParsedConfig = Arc<dyn Any + Send + Sync>;

/// What a component is constructed from.
#[derive(Clone, Copy)]
#[non_exhaustive]
pub struct ComponentInit<'a> {
    /// The type of the vehicle being constructed.
    pub vehicle_type: &'a VehicleType,
    /// The configuration given for this component in the vehicle type, if any.
    pub config: Option<&'a ParsedConfig>,
    /// Previously saved state of this component; empty for a new vehicle.
    pub data: &'a dyn DataInput,
}

impl fmt::Debug for ComponentInit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInit")
            .field("vehicle_type", &self.vehicle_type.identifier())
            .field("config", &self.config.is_some())
            .finish_non_exhaustive()
    }
}

impl ComponentInit<'_> {
    /// Returns the parsed configuration if it is of type `C`, and otherwise the default
    /// configuration.
    pub fn config<C: Any + Clone + Default>(&self) -> C {
        self.config
            .and_then(|config| config.downcast_ref::<C>())
            .cloned()
            .unwrap_or_default()
    }
}

/// A kind of component which vehicle types can be built from: an identifier, a
/// constructor, and optionally a parser for per-vehicle-type configuration.
#[derive(Clone)]
pub struct ComponentType {
    identifier: Identifier,
    constructor: ComponentConstructor,
    config_parser: Option<ConfigParser>,
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentType")
            .field("identifier", &self.identifier)
            .field("configurable", &self.config_parser.is_some())
            .finish_non_exhaustive()
    }
}

impl ComponentType {
    /// Constructs a component type which takes no configuration.
    pub fn new(identifier: Identifier, constructor: ComponentConstructor) -> Self {
        Self {
            identifier,
            constructor,
            config_parser: None,
        }
    }

    /// Constructs a component type whose configuration is deserialized as `C`.
    pub fn with_config<C>(identifier: Identifier, constructor: ComponentConstructor) -> Self
    where
        C: serde::de::DeserializeOwned + Send + Sync + 'static,
    {
        Self {
            identifier,
            constructor,
            config_parser: Some(parse_config::<C>),
        }
    }

    /// The identifier vehicle types refer to this component type by.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Returns whether this component type accepts configuration.
    pub fn is_configurable(&self) -> bool {
        self.config_parser.is_some()
    }

    /// Parses a configuration object for this component type.
    ///
    /// Returns `Ok(None)` if the type accepts no configuration.
    pub fn parse_config(
        &self,
        json: &serde_json::Value,
    ) -> Result<Option<ParsedConfig>, serde_json::Error> {
        self.config_parser.map(|parse| parse(json)).transpose()
    }

    /// Constructs a component of this type.
    pub fn construct(&self, init: ComponentInit<'_>) -> Box<dyn VehicleComponent> {
        (self.constructor)(init)
    }
}

fn parse_config<C>(json: &serde_json::Value) -> Result<ParsedConfig, serde_json::Error>
where
    C: serde::de::DeserializeOwned + Send + Sync + 'static,
{
    Ok(Arc::new(C::deserialize(json)?))
}
