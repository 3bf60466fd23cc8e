use std::collections::BTreeSet;

use crate::math::{Axis, Cube, FreeCoordinate, FreePoint, FreeVector, GEOMETRY_EPSILON, Rotation};

/// Offset from a vehicle body's origin to the center of its collision hull, in the body's
/// local frame.
pub const HULL_OFFSET: FreeVector = FreeVector::new(0.0, 0.8, 0.0);

/// Half-extents of a vehicle body's collision hull.
pub const HULL_HALF_SIZE: FreeVector = FreeVector::new(1.0, 0.8, 2.25);

/// Oriented bounding box: a box with a center, half-extents along its own local axes, and
/// an arbitrary rotation of those axes relative to world space.
///
/// This is an immutable value; bodies recompute theirs from their current pose every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obb {
    center: FreePoint,
    half_size: FreeVector,
    rotation: Rotation,
}

impl Obb {
    /// Constructs an [`Obb`] from its center (in world space), its half-extents along each
    /// of its local axes, and the rotation of the local axes into world space.
    #[inline]
    pub fn new(center: FreePoint, half_size: FreeVector, rotation: Rotation) -> Self {
        Self {
            center,
            half_size,
            rotation,
        }
    }

    /// Constructs the collision hull of a vehicle body whose origin is at `position` and
    /// which is rotated by `orientation`: [`HULL_HALF_SIZE`] centered at [`HULL_OFFSET`]
    /// in the body's frame.
    ///
    /// ```
    /// # extern crate torque_base as torque;
    /// use torque::math::{FreePoint, Obb, Rotation};
    ///
    /// let hull = Obb::for_body(FreePoint::new(0.0, 10.0, 0.0), Rotation::identity());
    /// assert_eq!(hull.center(), FreePoint::new(0.0, 10.8, 0.0));
    /// ```
    #[inline]
    pub fn for_body(position: FreePoint, orientation: Rotation) -> Self {
        Self::new(
            position + orientation.transform_vector3d(HULL_OFFSET),
            HULL_HALF_SIZE,
            orientation,
        )
    }

    /// The center of the box, in world space.
    #[inline]
    pub fn center(&self) -> FreePoint {
        self.center
    }

    /// The half-extents of the box along its own local axes.
    #[inline]
    pub fn half_size(&self) -> FreeVector {
        self.half_size
    }

    /// The rotation from the box's local axes to world space.
    #[inline]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Returns whether any half-extent is too small (or not a number) for the box to
    /// enclose any volume.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let h = self.half_size;
        !(h.x > GEOMETRY_EPSILON && h.y > GEOMETRY_EPSILON && h.z > GEOMETRY_EPSILON)
            || !(h.x.is_finite() && h.y.is_finite() && h.z.is_finite())
    }

    /// The box's local X, Y, and Z unit axes, expressed in world space.
    #[inline]
    pub fn axes(&self) -> [FreeVector; 3] {
        Axis::ALL.map(|axis| self.rotation.transform_vector3d(axis.unit_vector()))
    }

    /// Iterates over the eight corner points of the box, in world space.
    ///
    /// The ordering is that bit 0 of the index selects the positive X side, bit 1 the
    /// positive Y side, and bit 2 the positive Z side.
    #[inline]
    pub fn corner_points(&self) -> impl ExactSizeIterator<Item = FreePoint> + use<> {
        let Self {
            center,
            half_size: h,
            rotation,
        } = *self;
        (0..8).map(move |i: u8| {
            let local = FreeVector::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            );
            center + rotation.transform_vector3d(local)
        })
    }

    /// Returns whether the point lies inside or on the surface of the box.
    #[inline]
    pub fn contains(&self, point: FreePoint) -> bool {
        let local = self
            .rotation
            .inverse()
            .transform_vector3d(point - self.center);
        local.x.abs() <= self.half_size.x
            && local.y.abs() <= self.half_size.y
            && local.z.abs() <= self.half_size.z
    }

    /// Returns the set of cubes which the box approximately occupies.
    ///
    /// Starting at the most negative corner, this samples points at unit spacing along each
    /// of the box's rotated local axes, `floor(2 * half_size) + 1` samples per axis, and
    /// collects the cubes containing those points. This is a sampling approximation and not
    /// an exact voxelization: it can miss cubes which the box only slightly overlaps, and it
    /// can include cubes which a rotated box does not actually overlap.
    ///
    /// A degenerate box (see [`Obb::is_degenerate()`]) occupies no cubes.
    ///
    /// ```
    /// # extern crate torque_base as torque;
    /// use torque::math::{Cube, FreePoint, FreeVector, Obb, Rotation};
    ///
    /// let obb = Obb::new(
    ///     FreePoint::new(0.5, 0.5, 0.5),
    ///     FreeVector::new(0.5, 0.5, 0.5),
    ///     Rotation::identity(),
    /// );
    /// assert!(obb.cubes_inside_approx().contains(&Cube::new(0, 0, 0)));
    /// ```
    #[allow(clippy::missing_inline_in_public_items)]
    pub fn cubes_inside_approx(&self) -> BTreeSet<Cube> {
        let mut cubes = BTreeSet::new();
        if self.is_degenerate() {
            return cubes;
        }

        let [direction_x, direction_y, direction_z] = self.axes();
        let start = self.center + self.rotation.transform_vector3d(-self.half_size);
        let steps = |half: FreeCoordinate| (2.0 * half).floor() as u32;

        for step_x in 0..=steps(self.half_size.x) {
            let offset_x = direction_x * FreeCoordinate::from(step_x);
            for step_y in 0..=steps(self.half_size.y) {
                let offset_y = direction_y * FreeCoordinate::from(step_y);
                for step_z in 0..=steps(self.half_size.z) {
                    let offset_z = direction_z * FreeCoordinate::from(step_z);
                    if let Some(cube) = Cube::containing(start + offset_x + offset_y + offset_z) {
                        cubes.insert(cube);
                    }
                }
            }
        }
        cubes
    }
}
