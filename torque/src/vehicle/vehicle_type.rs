use core::fmt;
use std::sync::Arc;

use hashbrown::HashSet;
use serde::de::Error as _;

use crate::component::{ComponentInit, ComponentType, ParsedConfig, VehicleComponent};
use crate::identifier::{Identifier, IdentifierError};
use crate::math::FreeCoordinate;
use crate::math::inertia::InertiaError;
use crate::physics::MassProperties;
use crate::save::{DataCompound, DataInput};
use crate::vehicle::{ComponentRegistry, Registry, RegistryError, Vehicle, VehicleModel};

/// Key of a component entry's type in vehicle type JSON.
const TYPE_KEY: &str = "type";

/// The declarative description of a kind of vehicle: its geometry, its mass, and the
/// components (with their configuration) that each vehicle of this type is built from.
///
/// Mass properties are derived from the geometry once, when the type is constructed.
pub struct VehicleType {
    identifier: Identifier,
    model_id: Identifier,
    model: Arc<VehicleModel>,
    components: Vec<(ComponentType, Option<ParsedConfig>)>,
    mass_properties: MassProperties,
}

impl fmt::Debug for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VehicleType")
            .field("identifier", &self.identifier)
            .field("model", &self.model_id)
            .field(
                "components",
                &self
                    .components
                    .iter()
                    .map(|(component_type, _)| component_type.identifier())
                    .collect::<Vec<_>>(),
            )
            .field("mass_properties", &self.mass_properties)
            .finish_non_exhaustive()
    }
}

/// Error from constructing a [`VehicleType`].
#[derive(Debug, displaydoc::Display, thiserror::Error)]
#[non_exhaustive]
pub enum VehicleTypeError {
    /// invalid vehicle type JSON
    Json(#[from] serde_json::Error),

    /// vehicle type is missing required field `{0}`
    MissingField(&'static str),

    /// vehicle mass must be positive and finite, but was {0}
    InvalidMass(FreeCoordinate),

    /// no component type is registered as {0}
    UnknownComponentType(Identifier),

    /// no model is registered as {0}
    UnknownModel(Identifier),

    /// invalid identifier
    InvalidIdentifier(#[from] IdentifierError),

    /// component type {0} is listed more than once
    DuplicateComponent(Identifier),

    /// invalid configuration for component {component}
    ComponentConfig {
        /// The component type whose configuration was rejected.
        component: Identifier,
        #[allow(missing_docs)]
        #[source]
        source: serde_json::Error,
    },

    /// vehicle geometry cannot carry mass
    DegenerateGeometry(#[from] InertiaError),

    /// {0}
    Registry(#[from] RegistryError),
}

#[derive(serde::Deserialize)]
struct VehicleTypeSchema {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    mass_kg: Option<FreeCoordinate>,
    #[serde(default)]
    components: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
}

impl VehicleType {
    /// Constructs a vehicle type, deriving its mass properties from `model`.
    ///
    /// `components` are the types each vehicle is built from, in order, with their parsed
    /// configuration (see [`ComponentType::parse_config()`]).
    pub fn new(
        identifier: Identifier,
        model_id: Identifier,
        model: Arc<VehicleModel>,
        mass: FreeCoordinate,
        components: Vec<(ComponentType, Option<ParsedConfig>)>,
    ) -> Result<Self, VehicleTypeError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(VehicleTypeError::InvalidMass(mass));
        }
        let mass_properties = MassProperties::from_elements(mass, model.elements())?;
        Ok(Self {
            identifier,
            model_id,
            model,
            components,
            mass_properties,
        })
    }

    /// Parses and validates a vehicle type definition.
    ///
    /// The definition names its model, its mass in kilograms, and its components:
    ///
    /// ```json
    /// {
    ///     "model": "example:car",
    ///     "mass_kg": 1500.0,
    ///     "components": [
    ///         { "type": "torque:rigid_body" },
    ///         { "type": "torque:drag", "drag_coefficient": 0.3 }
    ///     ]
    /// }
    /// ```
    ///
    /// Each component's fields other than `type` are its configuration. Component types
    /// and the model are looked up in the given registries.
    pub fn from_json(
        identifier: Identifier,
        json: &str,
        component_types: &ComponentRegistry,
        models: &Registry<Arc<VehicleModel>>,
    ) -> Result<Self, VehicleTypeError> {
        let schema: VehicleTypeSchema = serde_json::from_str(json)?;

        let model_id: Identifier = schema
            .model
            .ok_or(VehicleTypeError::MissingField("model"))?
            .parse()?;
        let model = models
            .get(&model_id)
            .cloned()
            .ok_or_else(|| VehicleTypeError::UnknownModel(model_id.clone()))?;
        let mass = schema
            .mass_kg
            .ok_or(VehicleTypeError::MissingField("mass_kg"))?;

        let mut seen = HashSet::new();
        let mut components = Vec::new();
        for mut fields in schema
            .components
            .ok_or(VehicleTypeError::MissingField("components"))?
        {
            let type_name: String = serde_json::from_value(
                fields
                    .remove(TYPE_KEY)
                    .ok_or(VehicleTypeError::MissingField(TYPE_KEY))?,
            )?;
            let component_id: Identifier = type_name.parse()?;
            let component_type = component_types
                .get(&component_id)
                .ok_or_else(|| VehicleTypeError::UnknownComponentType(component_id.clone()))?;
            if !seen.insert(component_id.clone()) {
                return Err(VehicleTypeError::DuplicateComponent(component_id));
            }

            let config = if component_type.is_configurable() {
                component_type.parse_config(&serde_json::Value::Object(fields))
            } else if let Some(unexpected) = fields.keys().next() {
                Err(serde_json::Error::unknown_field(unexpected, &[]))
            } else {
                Ok(None)
            }
            .map_err(|source| VehicleTypeError::ComponentConfig {
                component: component_id,
                source,
            })?;
            components.push((component_type.clone(), config));
        }

        Self::new(identifier, model_id, model, mass, components)
    }

    /// The identifier this type is registered under.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The identifier of this type's model.
    pub fn model_id(&self) -> &Identifier {
        &self.model_id
    }

    #[allow(missing_docs)]
    pub fn model(&self) -> &VehicleModel {
        &self.model
    }

    /// Mass and inertia of every vehicle of this type.
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass_properties
    }

    /// Iterates over the identifiers of this type's components, in order.
    pub fn component_types(&self) -> impl Iterator<Item = &Identifier> + '_ {
        self.components
            .iter()
            .map(|(component_type, _)| component_type.identifier())
    }

    /// Builds a new vehicle of this type.
    pub fn instantiate(self: &Arc<Self>) -> Vehicle {
        Vehicle::load(Arc::clone(self), DataCompound::empty())
    }

    /// Constructs this type's components, each from the child of `saved` named by its
    /// component type's identifier.
    pub(crate) fn construct_components<'a>(
        &'a self,
        saved: &'a dyn DataInput,
    ) -> impl Iterator<Item = Box<dyn VehicleComponent>> + 'a {
        self.components.iter().map(move |(component_type, config)| {
            component_type.construct(ComponentInit {
                vehicle_type: self,
                config: config.as_ref(),
                data: saved.child(&component_type.identifier().to_string()),
            })
        })
    }
}
