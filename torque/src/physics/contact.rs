use crate::debug::{DebugMarkers, HighlightStyle, Marker};
use crate::math::{FreeCoordinate, FreePoint, FreeVector, Matrix3, Obb};
use crate::physics::{RigidBody, kinetic_energy};
use crate::world::World;

/// Maximum number of passes [`resolve_contacts()`] makes over the contacts.
pub const MAX_ITERATIONS: u32 = 10;

/// Contacts whose normal relative velocity is greater than this (m/s) are separating
/// or resting, and receive no impulse.
const SEPARATING_VELOCITY: FreeCoordinate = -0.01;

/// Impulses smaller than this (N·s) are discarded.
const MIN_IMPULSE: FreeCoordinate = 1e-3;

/// Coefficient of restitution: contacts are fully inelastic.
const RESTITUTION: FreeCoordinate = 0.0;

/// Extra factor applied when resolution had to be scaled back to avoid creating energy.
const ENERGY_PENALTY: FreeCoordinate = 0.9;

/// A point at which a body touches the block grid.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct ContactPoint {
    /// Where the contact is, in world space.
    pub position: FreePoint,
    /// Unit normal of the surface touched, pointing away from the surface.
    pub normal: FreeVector,
    /// Total impulse applied at this contact during the current resolution.
    pub impulse: FreeVector,
}

impl ContactPoint {
    /// Constructs a contact with no impulse yet applied.
    pub fn new(position: FreePoint, normal: FreeVector) -> Self {
        Self {
            position,
            normal,
            impulse: FreeVector::zero(),
        }
    }
}

/// Finds the contacts between a body's collision hull and the world.
///
/// Every collidable cube which the hull [approximately occupies](Obb::cubes_inside_approx)
/// produces one contact, at the center of the cube's top face with an upward normal.
/// Contacts are returned in ascending cube order.
pub fn find_contacts(
    hull: &Obb,
    world: &dyn World,
    mut debug: Option<&mut DebugMarkers>,
) -> Vec<ContactPoint> {
    if let Some(debug) = debug.as_deref_mut() {
        debug.push(Marker::Obb(*hull));
    }
    let mut contacts = Vec::new();
    for cube in hull.cubes_inside_approx() {
        let collidable = world.is_block_collidable(cube);
        if let Some(debug) = debug.as_deref_mut() {
            debug.push(Marker::BlockHighlight {
                cube,
                style: if collidable {
                    HighlightStyle::Full
                } else {
                    HighlightStyle::Small
                },
            });
        }
        if collidable {
            contacts.push(ContactPoint::new(
                cube.top_face_center(),
                FreeVector::new(0.0, 1.0, 0.0),
            ));
        }
    }
    contacts
}

/// The motion state of a body, as seen by [`resolve_contacts()`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct SolverBody {
    /// Center of mass, in world space.
    pub center_of_mass: FreePoint,
    /// Mass, in kg.
    pub mass: FreeCoordinate,
    /// Inertia tensor, in world space.
    pub inertia: Matrix3,
    /// Inverse inertia tensor, in world space.
    pub inverse_inertia: Matrix3,
    /// Velocity before resolution.
    pub velocity: FreeVector,
    /// Angular velocity before resolution.
    pub angular_velocity: FreeVector,
}

impl SolverBody {
    /// Describes `body` moving with the velocities it is predicted to reach after `dt`
    /// seconds under its accumulated forces.
    pub fn predicted(body: &RigidBody, dt: FreeCoordinate) -> Self {
        let (velocity, angular_velocity) = body.predicted_velocities(dt);
        let mass = body.mass_properties();
        Self {
            center_of_mass: body.position,
            mass: mass.mass(),
            inertia: mass.world_inertia(body.orientation),
            inverse_inertia: mass.world_inverse_inertia(body.orientation),
            velocity,
            angular_velocity,
        }
    }

    /// Returns the total kinetic energy of the body moving with the given velocities.
    pub fn kinetic_energy(&self, velocity: FreeVector, angular_velocity: FreeVector) -> FreeCoordinate {
        kinetic_energy(self.mass, &self.inertia, velocity, angular_velocity)
    }
}

/// Result of [`resolve_contacts()`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct ContactResolution {
    /// Velocity after resolution.
    pub velocity: FreeVector,
    /// Angular velocity after resolution.
    pub angular_velocity: FreeVector,
    /// Number of passes made over the contacts.
    pub iterations: u32,
    /// Whether the pass limit [`MAX_ITERATIONS`] was reached while impulses were still
    /// being applied. The result is still usable.
    pub hit_iteration_limit: bool,
    /// Kinetic energy of the body's velocities before resolution.
    pub energy_before: FreeCoordinate,
    /// Kinetic energy of the returned velocities.
    pub energy_after: FreeCoordinate,
    /// Whether the velocities were scaled down because resolution would otherwise have
    /// increased the kinetic energy.
    pub energy_clamped: bool,
}

/// Computes the velocities of `body` after sequential impulses remove approaching motion
/// at each of the `contacts`.
///
/// Each pass visits the contacts in order; a contact approaching faster than 0.01 m/s
/// receives a fully inelastic impulse along its normal, which is immediately applied
/// to the velocities used for the following contacts and added to the contact's
/// [`ContactPoint::impulse`]. Passes repeat until one applies no impulse, or up to
/// [`MAX_ITERATIONS`]. If the result has more kinetic energy than `body` started with,
/// both velocities are scaled by `0.9 · sqrt(E_before / E_after)`, which leaves 81% of the
/// starting energy.
pub fn resolve_contacts(body: &SolverBody, contacts: &mut [ContactPoint]) -> ContactResolution {
    let mut velocity = body.velocity;
    let mut angular_velocity = body.angular_velocity;
    for contact in contacts.iter_mut() {
        contact.impulse = FreeVector::zero();
    }

    let mut iterations = 0;
    let mut converged = contacts.is_empty();
    while !converged && iterations < MAX_ITERATIONS {
        iterations += 1;
        converged = true;
        for contact in contacts.iter_mut() {
            let n = contact.normal;
            let r = contact.position - body.center_of_mass;
            let relative_velocity = (velocity + angular_velocity.cross(r)).dot(n);
            if relative_velocity > SEPARATING_VELOCITY {
                continue;
            }

            let angular_response = body
                .inverse_inertia
                .transform_vector(r.cross(n))
                .cross(r)
                .dot(n);
            let effective_mass = 1.0 / (1.0 / body.mass + angular_response);
            let magnitude = -(1.0 + RESTITUTION) * relative_velocity * effective_mass;
            if !(magnitude >= MIN_IMPULSE) {
                continue;
            }

            let impulse = n * magnitude;
            velocity += impulse / body.mass;
            angular_velocity += body.inverse_inertia.transform_vector(r.cross(impulse));
            contact.impulse += impulse;
            converged = false;
            log::trace!(
                "contact at {:?}: v_rel {relative_velocity:.4}, impulse {magnitude:.4}",
                contact.position.to_array()
            );
        }
    }
    let hit_iteration_limit = !converged;
    if hit_iteration_limit {
        log::debug!(
            "contact resolution did not converge in {MAX_ITERATIONS} iterations \
            ({} contacts); accepting result",
            contacts.len()
        );
    }

    let energy_before = body.kinetic_energy(body.velocity, body.angular_velocity);
    let mut energy_after = body.kinetic_energy(velocity, angular_velocity);
    let energy_clamped = energy_after > energy_before;
    if energy_clamped {
        let scale = if energy_before > 0.0 {
            (energy_before / energy_after).sqrt() * ENERGY_PENALTY
        } else {
            0.0
        };
        log::debug!(
            "contact resolution increased energy from {energy_before} J to {energy_after} J; \
            scaling velocities by {scale}"
        );
        velocity *= scale;
        angular_velocity *= scale;
        energy_after = body.kinetic_energy(velocity, angular_velocity);
    }

    ContactResolution {
        velocity,
        angular_velocity,
        iterations,
        hit_iteration_limit,
        energy_before,
        energy_after,
        energy_clamped,
    }
}
