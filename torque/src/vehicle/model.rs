use crate::math::inertia::{ElementRotation, ModelElement};
use crate::math::{Axis, FreeCoordinate, ModelPoint};

/// The authored box geometry of a vehicle, from which its mass distribution is derived.
///
/// This is the part of a block model that the physics uses: the `elements` array, with
/// coordinates in model pixels (16 to a meter). Elements whose name starts with `.` are
/// hidden and have no mass. See [`crate::math::inertia`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VehicleModel {
    elements: Vec<ModelElement>,
}

#[derive(serde::Deserialize)]
struct ModelSchema {
    #[serde(default)]
    elements: Vec<ElementSchema>,
}

#[derive(serde::Deserialize)]
struct ElementSchema {
    from: [FreeCoordinate; 3],
    to: [FreeCoordinate; 3],
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rotation: Option<RotationSchema>,
}

#[derive(serde::Deserialize)]
struct RotationSchema {
    origin: [FreeCoordinate; 3],
    axis: AxisSchema,
    angle: FreeCoordinate,
}

#[derive(Clone, Copy, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum AxisSchema {
    X,
    Y,
    Z,
}

impl From<AxisSchema> for Axis {
    fn from(axis: AxisSchema) -> Self {
        match axis {
            AxisSchema::X => Axis::X,
            AxisSchema::Y => Axis::Y,
            AxisSchema::Z => Axis::Z,
        }
    }
}

impl From<ElementSchema> for ModelElement {
    fn from(schema: ElementSchema) -> Self {
        let mut element = ModelElement::new(
            ModelPoint::from(schema.from),
            ModelPoint::from(schema.to),
        );
        if let Some(name) = schema.name {
            element = element.with_name(name);
        }
        if let Some(rotation) = schema.rotation {
            element = element.with_rotation(ElementRotation::new(
                ModelPoint::from(rotation.origin),
                rotation.axis.into(),
                rotation.angle,
            ));
        }
        element
    }
}

impl VehicleModel {
    #[allow(missing_docs)]
    pub fn new(elements: Vec<ModelElement>) -> Self {
        Self { elements }
    }

    /// Parses the geometry of a block model in JSON form.
    ///
    /// Only `elements` and, within each element, `from`, `to`, `name` and `rotation`
    /// are read; anything else in the model (textures, faces, display settings) is ignored.
    ///
    /// ```
    /// use torque::vehicle::VehicleModel;
    ///
    /// let model = VehicleModel::from_json(r#"{
    ///     "elements": [
    ///         { "from": [0, 0, 0], "to": [16, 16, 16] },
    ///         { "from": [4, 16, 4], "to": [12, 24, 12],
    ///           "rotation": { "origin": [8, 16, 8], "axis": "y", "angle": 45 } }
    ///     ]
    /// }"#).unwrap();
    /// assert_eq!(model.elements().len(), 2);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let schema: ModelSchema = serde_json::from_str(json)?;
        Ok(Self::new(
            schema.elements.into_iter().map(ModelElement::from).collect(),
        ))
    }

    #[allow(missing_docs)]
    pub fn elements(&self) -> &[ModelElement] {
        &self.elements
    }
}
