//! Mass properties of bodies described by authored box geometry.
//!
//! A vehicle's shape is given as a list of [`ModelElement`]s: axis-aligned boxes in
//! [`ModelPixel`](crate::math::ModelPixel) units, each optionally rotated about a single
//! axis. The body is assumed to be of uniform density, so each element's mass is
//! proportional to its volume. All functions here are pure: the same elements and mass
//! always produce bit-identical results.

use euclid::Vector3D;

use crate::math::{
    Axis, FreeCoordinate, FreePoint, FreeVector, GEOMETRY_EPSILON, Matrix3, ModelPoint,
    PIXELS_TO_METERS, degrees,
};

/// Elements whose name starts with this prefix are hidden, and do not contribute mass.
pub const HIDDEN_PREFIX: &str = ".";

/// A box of authored geometry.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct ModelElement {
    /// One corner of the box.
    pub from: ModelPoint,
    /// The opposite corner of the box.
    pub to: ModelPoint,
    /// Name given to the element by its author, if any.
    pub name: Option<String>,
    /// Rotation of the element about a single axis, if any.
    pub rotation: Option<ElementRotation>,
}

/// Rotation of a [`ModelElement`] about a single coordinate axis through a given origin.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct ElementRotation {
    /// The point the element is rotated about.
    pub origin: ModelPoint,
    /// The axis the element is rotated about.
    pub axis: Axis,
    /// The angle of rotation, in degrees, right-handed.
    pub angle: FreeCoordinate,
}

impl ElementRotation {
    /// Constructs an [`ElementRotation`].
    #[inline]
    pub fn new(origin: ModelPoint, axis: Axis, angle: FreeCoordinate) -> Self {
        Self {
            origin,
            axis,
            angle,
        }
    }

    /// Returns the rotation as a matrix.
    #[inline]
    pub fn matrix(&self) -> Matrix3 {
        Matrix3::rotation_about(self.axis, degrees(self.angle))
    }
}

impl ModelElement {
    /// Constructs an unnamed, unrotated [`ModelElement`] spanning the given corners.
    #[inline]
    pub fn new(from: ModelPoint, to: ModelPoint) -> Self {
        Self {
            from,
            to,
            name: None,
            rotation: None,
        }
    }

    /// Sets the name of the element.
    #[must_use]
    #[inline]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the rotation of the element.
    #[must_use]
    #[inline]
    pub fn with_rotation(mut self, rotation: ElementRotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Whether this element is excluded from mass computations because its name starts
    /// with [`HIDDEN_PREFIX`].
    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.starts_with(HIDDEN_PREFIX))
    }

    /// Size of the element along each axis, in meters. Always non-negative.
    #[inline]
    pub fn size(&self) -> FreeVector {
        let size = (self.to - self.from) * PIXELS_TO_METERS;
        size.abs()
    }

    /// Volume of the element, in cubic meters.
    #[inline]
    pub fn volume(&self) -> FreeCoordinate {
        let size = self.size();
        size.x * size.y * size.z
    }

    /// Center of the element before any rotation is applied, in meters.
    #[inline]
    pub fn unrotated_center(&self) -> FreePoint {
        self.from.lerp(self.to, 0.5) * PIXELS_TO_METERS
    }

    /// Center of the element after its rotation is applied, in meters.
    #[inline]
    pub fn center(&self) -> FreePoint {
        let center = self.unrotated_center();
        match self.rotation {
            None => center,
            Some(rotation) => {
                // c' = R (c - o) + o
                let origin = rotation.origin * PIXELS_TO_METERS;
                origin + rotation.matrix().transform_vector(center - origin)
            }
        }
    }
}

/// Errors from deriving mass properties of degenerate geometry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, displaydoc::Display, thiserror::Error)]
#[non_exhaustive]
pub enum InertiaError {
    /// geometry has no visible volume to distribute mass over
    ZeroVolume,
    /// inertia tensor is singular and cannot be inverted
    Singular,
}

/// Total volume of the visible elements, in cubic meters.
pub fn total_volume<'a>(elements: impl IntoIterator<Item = &'a ModelElement>) -> FreeCoordinate {
    visible(elements).map(ModelElement::volume).sum()
}

/// Uniform density of a body of the given mass (kg) and geometry, in kg/m³.
#[inline]
pub fn density(mass: FreeCoordinate, elements: &[ModelElement]) -> Result<FreeCoordinate, InertiaError> {
    let volume = total_volume(elements);
    if !(volume > GEOMETRY_EPSILON) || !volume.is_finite() {
        return Err(InertiaError::ZeroVolume);
    }
    Ok(mass / volume)
}

/// Iterates over the visible elements together with their share of the mass, in kg.
#[inline]
pub fn element_masses(
    mass: FreeCoordinate,
    elements: &[ModelElement],
) -> Result<impl Iterator<Item = (&ModelElement, FreeCoordinate)>, InertiaError> {
    let density = density(mass, elements)?;
    Ok(visible(elements).map(move |element| (element, density * element.volume())))
}

/// Computes the inertia tensor, in kg·m², of a body of uniform density with the given
/// mass (kg) and geometry, about the model origin.
///
/// Each element's own tensor uses its half-extents `h` as
/// `(1/12) · m · diag(h_y² + h_z², h_x² + h_z², h_x² + h_y²)`,
/// is rotated as `R · I · Rᵀ` if the element is rotated,
/// and is moved to the origin by the parallel axis theorem,
/// `I + m · (|r|² · 𝟙 − r · rᵀ)` where `r` is the element's (rotated) center.
#[inline]
pub fn inertia_tensor(
    mass: FreeCoordinate,
    elements: &[ModelElement],
) -> Result<Matrix3, InertiaError> {
    Ok(element_masses(mass, elements)?
        .map(|(element, element_mass)| element_inertia_tensor(element, element_mass))
        .sum())
}

/// Computes the inverse of [`inertia_tensor()`].
#[inline]
pub fn inverse_inertia_tensor(
    mass: FreeCoordinate,
    elements: &[ModelElement],
) -> Result<Matrix3, InertiaError> {
    inertia_tensor(mass, elements)?
        .inverse()
        .ok_or(InertiaError::Singular)
}

/// Volume-weighted average of the centers of the visible elements, in meters.
///
/// Returns [`None`] if there is no visible volume.
#[inline]
pub fn center_of_mass(elements: &[ModelElement]) -> Option<FreePoint> {
    let volume = total_volume(elements);
    if !(volume > GEOMETRY_EPSILON) {
        return None;
    }
    let weighted_sum = visible(elements).fold(FreeVector::zero(), |sum, element| {
        sum + element.center().to_vector() * (element.volume() / volume)
    });
    Some(weighted_sum.to_point())
}

fn element_inertia_tensor(element: &ModelElement, element_mass: FreeCoordinate) -> Matrix3 {
    let h = element.size() * 0.5;
    let local = Matrix3::from_diagonal(Vector3D::new(
        h.y * h.y + h.z * h.z,
        h.x * h.x + h.z * h.z,
        h.x * h.x + h.y * h.y,
    )) * (element_mass / 12.0);

    let rotated = match element.rotation {
        None => local,
        Some(rotation) => rotation.matrix().conjugate(&local),
    };

    let r = element.center().to_vector();
    rotated + (Matrix3::IDENTITY * r.square_length() - Matrix3::outer_product(r, r)) * element_mass
}

fn visible<'a>(
    elements: impl IntoIterator<Item = &'a ModelElement>,
) -> impl Iterator<Item = &'a ModelElement> {
    elements.into_iter().filter(|element| !element.is_hidden())
}
