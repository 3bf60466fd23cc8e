use euclid::{point3, vec3};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::debug::{DebugMarkers, HighlightStyle, Marker};
use crate::math::{Cube, FreeCoordinate, FreePoint, FreeVector, Obb, Rotation, degrees};
use crate::physics::{
    ContactPoint, MAX_ITERATIONS, MassProperties, RigidBody, SolverBody, find_contacts,
    resolve_contacts, step_axes,
};
use crate::save::DataCompound;
use crate::time::Tick;
use crate::world::{BlockKind, SparseWorld};

const DT: FreeCoordinate = 0.05;

fn car_mass() -> MassProperties {
    MassProperties::solid_box(1500.0, vec3(2.0, 1.6, 4.5)).unwrap()
}

fn test_body() -> RigidBody {
    RigidBody::new(car_mass(), point3(0.0, 0.0, 0.0))
}

fn solver_body(velocity: FreeVector, angular_velocity: FreeVector) -> SolverBody {
    let mass = car_mass();
    SolverBody {
        center_of_mass: FreePoint::origin(),
        mass: mass.mass(),
        inertia: *mass.inertia(),
        inverse_inertia: *mass.inverse_inertia(),
        velocity,
        angular_velocity,
    }
}

fn up_contact(x: FreeCoordinate, y: FreeCoordinate, z: FreeCoordinate) -> ContactPoint {
    ContactPoint::new(point3(x, y, z), vec3(0.0, 1.0, 0.0))
}

fn approx_eq(a: FreeVector, b: FreeVector) -> bool {
    (a - b).length() < 1e-9
}

/// Shows solver diagnostics in the output of tests that exercise them.
fn init_test_logging() {
    let _ = simplelog::TestLogger::init(log::LevelFilter::Trace, simplelog::Config::default());
}

// --- RigidBody ---

#[test]
fn stationary_body_stays_exactly_put() {
    let mut body = test_body();
    body.position = point3(3.25, 7.5, -1.0);
    let before = body.clone();
    body.integrate(Tick::STANDARD);
    assert_eq!(body, before);
}

#[test]
fn force_off_center_produces_torque() {
    let mut body = test_body();
    body.position = point3(1.0, 1.0, 1.0);
    body.add_force(vec3(0.0, 10.0, 0.0), point3(2.0, 1.0, 1.0));
    body.add_force(vec3(0.0, 5.0, 0.0), point3(1.0, 1.0, 1.0));
    body.add_torque(vec3(0.0, 0.0, 1.0));
    assert_eq!(body.net_force(), vec3(0.0, 15.0, 0.0));
    // (1, 0, 0) × (0, 10, 0) = (0, 0, 10)
    assert_eq!(body.net_torque(), vec3(0.0, 0.0, 11.0));
}

#[rstest]
#[case(vec3(FreeCoordinate::NAN, 0.0, 0.0), point3(0.0, 0.0, 0.0))]
#[case(vec3(0.0, FreeCoordinate::INFINITY, 0.0), point3(0.0, 0.0, 0.0))]
#[case(vec3(0.0, 1.0, 0.0), point3(0.0, 0.0, FreeCoordinate::NEG_INFINITY))]
fn non_finite_force_is_ignored(#[case] force: FreeVector, #[case] point: FreePoint) {
    let mut body = test_body();
    body.add_force(vec3(1.0, 2.0, 3.0), point3(0.0, 0.0, 0.0));
    body.add_force(force, point);
    body.add_torque(vec3(FreeCoordinate::NAN, 0.0, 0.0));
    assert_eq!(body.net_force(), vec3(1.0, 2.0, 3.0));
    assert_eq!(body.net_torque(), FreeVector::zero());
}

#[test]
fn integrate_applies_force_then_velocity() {
    let mut body = test_body();
    body.velocity = vec3(1.0, 0.0, 0.0);
    body.add_force(vec3(0.0, -1500.0 * 9.8, 0.0), body.position);
    body.integrate(Tick::from_seconds(DT));

    assert!(approx_eq(body.velocity, vec3(1.0, -0.49, 0.0)));
    assert!(approx_eq(body.position.to_vector(), vec3(0.05, -0.49 * DT, 0.0)));
    assert_eq!(body.net_force(), FreeVector::zero());
    assert_eq!(body.orientation, Rotation::identity());
}

#[test]
fn integrate_rotates_by_angular_velocity() {
    let mut body = test_body();
    body.angular_velocity = vec3(0.0, std::f64::consts::PI, 0.0);
    for _ in 0..10 {
        body.integrate(Tick::from_seconds(DT));
    }
    // Half a second at π rad/s is a quarter turn, which maps +X to -Z.
    let x = body.orientation.transform_vector3d(vec3(1.0, 0.0, 0.0));
    assert!(approx_eq(x, vec3(0.0, 0.0, -1.0)), "{x:?}");
}

#[test]
fn integrate_torque_uses_world_inertia() {
    // The same torque about world Y must produce the same spin whichever way the body
    // is yawed, because the box is rotated about that same axis.
    let torque = vec3(0.0, 100.0, 0.0);
    let mut results = Vec::new();
    for yaw in [0.0, 90.0] {
        let mut body = test_body();
        body.orientation = Rotation::around_y(degrees(yaw));
        body.add_torque(torque);
        body.integrate(Tick::from_seconds(DT));
        results.push(body.angular_velocity);
    }
    assert!(approx_eq(results[0], results[1]));

    // But about world X, a 90° yaw swaps which local axis resists.
    let mut spins = Vec::new();
    for yaw in [0.0, 90.0] {
        let mut body = test_body();
        body.orientation = Rotation::around_y(degrees(yaw));
        body.add_torque(vec3(100.0, 0.0, 0.0));
        body.integrate(Tick::from_seconds(DT));
        spins.push(body.angular_velocity.x);
    }
    let inverse = car_mass().inverse_inertia().diagonal();
    assert!((spins[0] - 100.0 * inverse.x * DT).abs() < 1e-12);
    assert!((spins[1] - 100.0 * inverse.z * DT).abs() < 1e-12);
}

#[test]
fn paused_tick_does_not_integrate() {
    let mut body = test_body();
    body.velocity = vec3(1.0, 2.0, 3.0);
    body.add_force(vec3(10.0, 0.0, 0.0), body.position);
    let before = body.clone();
    body.integrate(Tick::STANDARD.pause());
    assert_eq!(body, before);
}

#[test]
fn commit_consumes_accumulated_force() {
    let mut body = test_body();
    body.add_force(vec3(0.0, -1500.0, 0.0), body.position);
    let (velocity, angular_velocity) = body.predicted_velocities(DT);
    assert_eq!(velocity, vec3(0.0, -0.05, 0.0));
    body.commit_velocities(velocity, angular_velocity);
    body.integrate(Tick::from_seconds(DT));
    assert_eq!(body.velocity, vec3(0.0, -0.05, 0.0));
}

#[test]
fn save_then_load_restores_motion() {
    let mut body = test_body();
    body.position = point3(1.0, 2.0, 3.0);
    body.orientation = Rotation::around_y(degrees(40.0));
    body.velocity = vec3(-4.0, 0.5, 0.0);
    body.angular_velocity = vec3(0.0, 0.25, 0.0);
    body.add_force(vec3(9.0, 9.0, 9.0), body.position);

    let mut data = DataCompound::new();
    body.save(&mut data);
    let loaded = RigidBody::load(car_mass(), &data);

    body.reset_accumulators();
    assert_eq!(loaded, body);
}

#[test]
fn load_from_empty_data_is_at_rest() {
    let body = RigidBody::load(car_mass(), DataCompound::empty());
    assert_eq!(body, test_body());
}

// --- Contacts ---

#[test]
fn find_contacts_uses_top_faces_in_cube_order() {
    let mut world = SparseWorld::new();
    world.set(Cube::new(1, 0, 0), BlockKind::Solid);
    world.set(Cube::new(0, 0, 0), BlockKind::Solid);
    world.set(Cube::new(0, 0, 1), BlockKind::Water);
    world.set(Cube::new(50, 0, 0), BlockKind::Solid);

    let hull = Obb::for_body(point3(0.5, 0.5, 0.5), Rotation::identity());
    let mut debug = DebugMarkers::new();
    let contacts = find_contacts(&hull, &world, Some(&mut debug));

    assert_eq!(
        contacts,
        vec![up_contact(0.5, 1.0, 0.5), up_contact(1.5, 1.0, 0.5)]
    );

    let markers = debug.flush();
    assert_eq!(markers[0], Marker::Obb(hull));
    assert_eq!(markers.len(), 1 + hull.cubes_inside_approx().len());
    let full = markers
        .iter()
        .filter(|m| {
            matches!(
                m,
                Marker::BlockHighlight {
                    style: HighlightStyle::Full,
                    ..
                }
            )
        })
        .count();
    assert_eq!(full, 2);
}

#[test]
fn find_contacts_without_debug_or_blocks() {
    let hull = Obb::for_body(point3(0.5, 10.0, 0.5), Rotation::identity());
    assert_eq!(find_contacts(&hull, &SparseWorld::new(), None), vec![]);
}

#[test]
fn head_on_contact_stops_approach() {
    let body = solver_body(vec3(0.0, -0.49, 0.0), FreeVector::zero());
    let mut contacts = [up_contact(0.0, -0.8, 0.0)];
    let result = resolve_contacts(&body, &mut contacts);

    assert!(result.velocity.y.abs() < 1e-9, "{result:?}");
    assert_eq!(result.angular_velocity, FreeVector::zero());
    assert_eq!(result.iterations, 2);
    assert!(!result.hit_iteration_limit);
    assert!(!result.energy_clamped);
    assert!((contacts[0].impulse.y - 1500.0 * 0.49).abs() < 1e-6);
}

#[test]
fn separating_contact_is_ignored() {
    let body = solver_body(vec3(0.0, 2.0, 0.0), vec3(0.0, 0.0, 0.0));
    let mut contacts = [up_contact(0.0, -0.8, 2.0)];
    let result = resolve_contacts(&body, &mut contacts);
    assert_eq!(result.velocity, vec3(0.0, 2.0, 0.0));
    assert_eq!(result.iterations, 1);
    assert_eq!(contacts[0].impulse, FreeVector::zero());
    assert_eq!(result.energy_after, result.energy_before);
}

#[test]
fn off_center_contact_induces_spin() {
    let body = solver_body(vec3(0.0, -1.0, 0.0), FreeVector::zero());
    let mut contacts = [up_contact(0.0, -0.8, 2.0)];
    let result = resolve_contacts(&body, &mut contacts);
    // Pushing up on the front end pitches the nose up: negative rotation about X.
    assert!(result.angular_velocity.x < 0.0);
    assert!(result.velocity.y > -1.0);
    let r = vec3(0.0, -0.8, 2.0);
    let contact_velocity = result.velocity + result.angular_velocity.cross(r);
    assert!(contact_velocity.y > -0.01);
}

#[rstest]
#[case(vec3(0.0, -1.0, 0.0), vec3(0.0, 0.0, 0.0), 1)]
#[case(vec3(0.0, -20.0, 0.0), vec3(0.3, 0.0, 0.2), 4)]
#[case(vec3(3.0, -5.0, -2.0), vec3(-1.0, 2.0, 0.5), 4)]
#[case(vec3(0.0, -100.0, 0.0), vec3(0.0, 0.0, 0.0), 2)]
#[case(vec3(0.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0), 2)]
fn resolution_never_adds_energy(
    #[case] velocity: FreeVector,
    #[case] angular_velocity: FreeVector,
    #[case] contact_count: usize,
) {
    let corners = [
        up_contact(1.0, -0.8, 2.0),
        up_contact(-1.0, -0.8, -2.0),
        up_contact(1.0, -0.8, -2.0),
        up_contact(-1.0, -0.8, 2.0),
    ];
    let mut contacts = corners[..contact_count].to_vec();
    let body = solver_body(velocity, angular_velocity);
    let result = resolve_contacts(&body, &mut contacts);
    assert!(
        result.energy_after <= result.energy_before,
        "{result:#?}"
    );
    assert_eq!(
        result.energy_before,
        body.kinetic_energy(velocity, angular_velocity)
    );
}

#[test]
fn narrow_wedge_hits_iteration_limit() {
    init_test_logging();
    // Two steep walls meeting below the body: each impulse mostly redirects the motion
    // into the other wall, so passes keep applying impulses.
    let angle = degrees(5.0).get();
    let mut contacts = [
        ContactPoint::new(point3(0.0, 0.0, 0.0), vec3(angle.cos(), angle.sin(), 0.0)),
        ContactPoint::new(point3(0.0, 0.0, 0.0), vec3(-angle.cos(), angle.sin(), 0.0)),
    ];
    let body = solver_body(vec3(0.0, -10.0, 0.0), FreeVector::zero());
    let result = resolve_contacts(&body, &mut contacts);
    assert_eq!(result.iterations, MAX_ITERATIONS);
    assert!(result.hit_iteration_limit);
    assert!(result.energy_after < result.energy_before);
}

#[test]
fn energy_increase_is_scaled_back() {
    init_test_logging();
    // An inverse inertia too large for the inertia lets the impulse create rotational
    // energy, which the safeguard removes.
    let mut body = solver_body(vec3(0.0, -1.0, 0.0), FreeVector::zero());
    body.inverse_inertia = body.inverse_inertia * 20.0;
    let mut contacts = [up_contact(0.0, -0.8, 2.0)];
    let result = resolve_contacts(&body, &mut contacts);
    assert!(result.energy_clamped);
    assert!((result.energy_after - 0.81 * result.energy_before).abs() < 1e-6);
}

#[test]
fn no_contacts_changes_nothing() {
    let body = solver_body(vec3(1.0, -2.0, 3.0), vec3(0.1, 0.0, 0.0));
    let result = resolve_contacts(&body, &mut []);
    assert_eq!(result.velocity, body.velocity);
    assert_eq!(result.angular_velocity, body.angular_velocity);
    assert_eq!(result.iterations, 0);
}

// --- Per-axis stepping ---

fn stepper_hull() -> Obb {
    Obb::for_body(point3(0.5, 1.0, 0.5), Rotation::identity())
}

fn floor_world() -> SparseWorld {
    let mut world = SparseWorld::new();
    world.fill_layer(0, 3, BlockKind::Solid);
    world
}

#[test]
fn stepper_lands_on_ground() {
    let step = step_axes(&stepper_hull(), vec3(0.0, -2.0, 0.0), DT, &floor_world(), None);
    assert_eq!(step.velocity, FreeVector::zero());
    assert!(step.on_ground);
    assert!(step.colliding);
    assert_eq!(step.step_up, None);
    assert_eq!(step.highest_collision_block, Some(Cube::new(-1, 0, -2)));
}

#[test]
fn stepper_blocked_by_wall() {
    let mut world = SparseWorld::new();
    for y in 1..=2 {
        for z in -3..=3 {
            world.set(Cube::new(1, y, z), BlockKind::Solid);
        }
    }
    let step = step_axes(&stepper_hull(), vec3(5.0, 0.0, 0.0), DT, &world, None);
    assert_eq!(step.velocity, FreeVector::zero());
    assert!(!step.on_ground);
    assert!(step.colliding);
    assert_eq!(step.step_up, None);
    assert_eq!(step.highest_collision_block, Some(Cube::new(1, 2, -2)));
}

#[test]
fn stepper_steps_up_onto_curb() {
    let mut world = floor_world();
    world.set(Cube::new(1, 1, 0), BlockKind::Solid);
    let step = step_axes(&stepper_hull(), vec3(5.0, -1.0, 0.0), DT, &world, None);
    assert_eq!(step.velocity, vec3(5.0, 0.0, 0.0));
    assert_eq!(step.step_up, Some(vec3(0.0, 1.0, 0.0)));
    assert!(step.on_ground);
    assert_eq!(step.highest_collision_block, Some(Cube::new(1, 1, 0)));
}

#[test]
fn stepper_in_free_air() {
    let mut debug = DebugMarkers::new();
    let step = step_axes(
        &stepper_hull(),
        vec3(5.0, -1.0, 0.0),
        DT,
        &SparseWorld::new(),
        Some(&mut debug),
    );
    assert_eq!(step.velocity, vec3(5.0, -1.0, 0.0));
    assert!(!step.colliding);
    assert!(!step.on_ground);
    assert_eq!(step.highest_collision_block, None);
    // Hull, then 2 × 5 samples on the right face and 3 × 5 on the bottom face.
    assert_eq!(debug.markers().len(), 1 + 10 + 15);
}
