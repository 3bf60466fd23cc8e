use core::fmt;

use euclid::Angle;

use crate::math::inertia::{self, ModelElement};
use crate::math::{
    FreeCoordinate, FreePoint, FreeVector, Matrix3, Obb, Rotation, vector_is_finite,
};
use crate::save::{DataInput, DataOutput};
use crate::time::Tick;

/// Angular steps smaller than this, in radians, leave the orientation unchanged.
const ROTATION_EPSILON: FreeCoordinate = 1e-6;

/// Mass and rotational inertia of a body, in the body's local frame.
///
/// These are derived once from a vehicle type's geometry and shared by all of its vehicles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MassProperties {
    mass: FreeCoordinate,
    inertia: Matrix3,
    inverse_inertia: Matrix3,
}

impl MassProperties {
    /// Derives mass properties from the total mass (kg) and box geometry of a body of
    /// uniform density. See [`inertia::inertia_tensor()`].
    pub fn from_elements(
        mass: FreeCoordinate,
        elements: &[ModelElement],
    ) -> Result<Self, inertia::InertiaError> {
        let tensor = inertia::inertia_tensor(mass, elements)?;
        Self::from_tensor(mass, tensor).ok_or(inertia::InertiaError::Singular)
    }

    /// Constructs mass properties from a mass (kg) and an inertia tensor (kg·m²).
    ///
    /// Returns [`None`] if the tensor is not invertible.
    pub fn from_tensor(mass: FreeCoordinate, inertia: Matrix3) -> Option<Self> {
        Some(Self {
            mass,
            inertia,
            inverse_inertia: inertia.inverse()?,
        })
    }

    /// Mass properties of a solid box of the given mass and full size (m), centered
    /// on the body origin.
    pub fn solid_box(mass: FreeCoordinate, size: FreeVector) -> Option<Self> {
        let FreeVector { x, y, z, .. } = size;
        let tensor = Matrix3::from_diagonal(FreeVector::new(
            y * y + z * z,
            x * x + z * z,
            x * x + y * y,
        )) * (mass / 12.0);
        Self::from_tensor(mass, tensor)
    }

    /// Total mass, in kg.
    pub fn mass(&self) -> FreeCoordinate {
        self.mass
    }

    /// Inertia tensor in the body's local frame.
    pub fn inertia(&self) -> &Matrix3 {
        &self.inertia
    }

    /// Inverse of the inertia tensor in the body's local frame.
    pub fn inverse_inertia(&self) -> &Matrix3 {
        &self.inverse_inertia
    }

    /// The inertia tensor in world space for a body with the given orientation,
    /// `R · I · Rᵀ`.
    pub fn world_inertia(&self, orientation: Rotation) -> Matrix3 {
        Matrix3::from_rotation(orientation).conjugate(&self.inertia)
    }

    /// The inverse inertia tensor in world space for a body with the given orientation,
    /// `R · I⁻¹ · Rᵀ`.
    pub fn world_inverse_inertia(&self, orientation: Rotation) -> Matrix3 {
        Matrix3::from_rotation(orientation).conjugate(&self.inverse_inertia)
    }
}

/// The physical state of a vehicle: where it is, how it is moving, and the forces acting
/// on it during the current tick.
///
/// Forces and torques are only ever added during a tick, by [`RigidBody::add_force()`]
/// and [`RigidBody::add_torque()`]; they are cleared at the start of each tick and when
/// consumed by [`RigidBody::integrate()`] or [`RigidBody::commit_velocities()`].
#[derive(Clone, PartialEq)]
#[non_exhaustive]
pub struct RigidBody {
    /// Position of the body origin (also its center of mass), in meters.
    pub position: FreePoint,
    /// Rotation from the body's local frame to world space.
    pub orientation: Rotation,
    /// Velocity, in meters per second.
    pub velocity: FreeVector,
    /// Angular velocity in world space, in radians per second.
    pub angular_velocity: FreeVector,

    mass: MassProperties,
    net_force: FreeVector,
    net_torque: FreeVector,
}

impl fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidBody")
            .field("position", &self.position.to_array())
            .field("orientation", &self.orientation)
            .field("velocity", &self.velocity.to_array())
            .field("angular_velocity", &self.angular_velocity.to_array())
            .field("mass", &self.mass.mass)
            .field("net_force", &self.net_force.to_array())
            .field("net_torque", &self.net_torque.to_array())
            .finish()
    }
}

impl RigidBody {
    /// Constructs a body at rest at `position`, in its default orientation.
    pub fn new(mass: MassProperties, position: FreePoint) -> Self {
        Self {
            position,
            orientation: Rotation::identity(),
            velocity: FreeVector::zero(),
            angular_velocity: FreeVector::zero(),
            mass,
            net_force: FreeVector::zero(),
            net_torque: FreeVector::zero(),
        }
    }

    /// Restores a body saved by [`RigidBody::save()`]. Missing fields take the values
    /// of a body at rest at the origin.
    pub fn load(mass: MassProperties, data: &dyn DataInput) -> Self {
        Self {
            position: data.read_vector("position", FreeVector::zero()).to_point(),
            orientation: data.read_quaternion("orientation", Rotation::identity()),
            velocity: data.read_vector("velocity", FreeVector::zero()),
            angular_velocity: data.read_vector("angular_velocity", FreeVector::zero()),
            ..Self::new(mass, FreePoint::origin())
        }
    }

    /// Writes the persistent state of the body. The force accumulators are not persistent.
    pub fn save(&self, data: &mut dyn DataOutput) {
        data.write_vector("position", self.position.to_vector());
        data.write_quaternion("orientation", self.orientation);
        data.write_vector("velocity", self.velocity);
        data.write_vector("angular_velocity", self.angular_velocity);
    }

    /// Returns the body's mass properties.
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass
    }

    /// Returns the mass of the body, in kg.
    pub fn mass(&self) -> FreeCoordinate {
        self.mass.mass
    }

    /// Returns the sum of forces added so far this tick, in newtons.
    pub fn net_force(&self) -> FreeVector {
        self.net_force
    }

    /// Returns the sum of torques added so far this tick, in newton-meters.
    pub fn net_torque(&self) -> FreeVector {
        self.net_torque
    }

    /// Applies `force` (N) at the world-space point `point`, which also produces the
    /// torque `(point − position) × force`.
    ///
    /// A force or point that is not finite is ignored, with a warning.
    pub fn add_force(&mut self, force: FreeVector, point: FreePoint) {
        let arm = point - self.position;
        if !vector_is_finite(force) || !vector_is_finite(arm) {
            log::warn!(
                "ignoring non-finite force {force:?} at {point:?}",
                force = force.to_array(),
                point = point.to_array(),
            );
            return;
        }
        self.net_force += force;
        self.net_torque += arm.cross(force);
    }

    /// Applies a pure torque (N·m).
    ///
    /// A torque that is not finite is ignored, with a warning.
    pub fn add_torque(&mut self, torque: FreeVector) {
        if !vector_is_finite(torque) {
            log::warn!("ignoring non-finite torque {:?}", torque.to_array());
            return;
        }
        self.net_torque += torque;
    }

    /// Clears the accumulated force and torque.
    pub fn reset_accumulators(&mut self) {
        self.net_force = FreeVector::zero();
        self.net_torque = FreeVector::zero();
    }

    /// The inverse inertia tensor for the body's current orientation.
    pub fn world_inverse_inertia(&self) -> Matrix3 {
        self.mass.world_inverse_inertia(self.orientation)
    }

    /// Returns the velocity and angular velocity the body would have after `dt` seconds
    /// under the forces accumulated so far, if nothing else acted on it.
    pub fn predicted_velocities(&self, dt: FreeCoordinate) -> (FreeVector, FreeVector) {
        (
            self.velocity + self.net_force * (dt / self.mass.mass),
            self.angular_velocity
                + self.world_inverse_inertia().transform_vector(self.net_torque) * dt,
        )
    }

    /// Replaces the velocities with ones that already account for the accumulated forces,
    /// such as collision-resolved [`RigidBody::predicted_velocities()`], and clears the
    /// accumulators so that integration does not apply the forces a second time.
    pub fn commit_velocities(&mut self, velocity: FreeVector, angular_velocity: FreeVector) {
        self.velocity = velocity;
        self.angular_velocity = angular_velocity;
        self.reset_accumulators();
    }

    /// Total kinetic energy, linear plus rotational, in joules.
    pub fn kinetic_energy(&self) -> FreeCoordinate {
        kinetic_energy(
            self.mass.mass,
            &self.mass.world_inertia(self.orientation),
            self.velocity,
            self.angular_velocity,
        )
    }

    /// The collision hull of the body in its current pose.
    pub fn hull(&self) -> Obb {
        Obb::for_body(self.position, self.orientation)
    }

    /// Advances the body by one tick of explicit Euler integration of the accumulated
    /// force and torque, then clears the accumulators.
    ///
    /// Does nothing if the tick is paused.
    pub fn integrate(&mut self, tick: Tick) {
        if tick.paused() {
            return;
        }
        let dt = tick.delta_t();

        self.velocity += self.net_force * (dt / self.mass.mass);
        self.position += self.velocity * dt;

        self.angular_velocity +=
            self.world_inverse_inertia().transform_vector(self.net_torque) * dt;
        let angle = self.angular_velocity.length() * dt;
        if angle > ROTATION_EPSILON {
            // Angular velocity is in world space, so the step is applied after the
            // existing orientation.
            let step = Rotation::around_axis(self.angular_velocity, Angle::radians(angle));
            self.orientation = self.orientation.then(&step).normalize();
        }

        self.reset_accumulators();
    }
}

/// Kinetic energy `½·m·|v|² + ½·ωᵀ·I·ω` of a body with mass `mass` and world-space inertia
/// tensor `inertia`.
pub fn kinetic_energy(
    mass: FreeCoordinate,
    inertia: &Matrix3,
    velocity: FreeVector,
    angular_velocity: FreeVector,
) -> FreeCoordinate {
    0.5 * mass * velocity.square_length()
        + 0.5 * angular_velocity.dot(inertia.transform_vector(angular_velocity))
}
