use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use euclid::{point3, vec3};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::component::{ComponentContext, ComponentType, TickStage, VehicleComponent};
use crate::components::{Collision, Drag, DragConfig, Gravity, SimpleCollision, SteeringWheel};
use crate::identifier::Identifier;
use crate::input::DriverInput;
use crate::math::{Cube, FreeVector, Rotation, degrees};
use crate::physics::RigidBody;
use crate::save::{DataCompound, DataInput as _, DataOutput as _, DataValue};
use crate::time::Tick;
use crate::vehicle::{
    ComponentRegistry, DuplicateComponent, LoadError, Registry, RegistryError, Vehicle,
    VehicleManager, VehicleModel, VehicleType, VehicleTypeError,
};
use crate::world::{BlockKind, SparseWorld};

const CAR: Identifier = Identifier::from_static("test", "car");
const CAR_MODEL: Identifier = Identifier::from_static("test", "car_model");

/// A 2 m × 1.6 m × 4.5 m box resting on the body origin.
const CAR_MODEL_JSON: &str = r#"{
    "elements": [
        { "from": [-16, 0, -36], "to": [16, 25.6, 36], "name": "body" },
        { "from": [-4, 25.6, -4], "to": [4, 32, 4], "name": ".seat" }
    ]
}"#;

const CAR_JSON: &str = r#"{
    "model": "test:car_model",
    "mass_kg": 1500.0,
    "components": [
        { "type": "torque:gravity" },
        { "type": "torque:drag", "drag_coefficient": 0.3 },
        { "type": "torque:collision" },
        { "type": "torque:rigid_body" }
    ]
}"#;

fn models() -> Registry<Arc<VehicleModel>> {
    let mut models = Registry::new();
    models
        .register(
            CAR_MODEL,
            Arc::new(VehicleModel::from_json(CAR_MODEL_JSON).unwrap()),
        )
        .unwrap();
    models
}

fn vehicle_type(components: Vec<ComponentType>) -> Arc<VehicleType> {
    Arc::new(
        VehicleType::new(
            CAR,
            CAR_MODEL,
            Arc::new(VehicleModel::from_json(CAR_MODEL_JSON).unwrap()),
            1500.0,
            components.into_iter().map(|t| (t, None)).collect(),
        )
        .unwrap(),
    )
}

fn manager() -> VehicleManager {
    let mut manager = VehicleManager::new();
    manager
        .register_model(CAR_MODEL, VehicleModel::from_json(CAR_MODEL_JSON).unwrap())
        .unwrap();
    manager.register_vehicle_type_json(CAR, CAR_JSON).unwrap();
    manager
}

type Log = Rc<RefCell<Vec<&'static str>>>;

/// Notes when it is ticked, and what it can see of its siblings.
#[derive(Debug)]
struct Recorder<const N: usize> {
    stage: TickStage,
    log: Log,
}

impl<const N: usize> Recorder<N> {
    const NAMES: [&'static str; 4] = ["a", "b", "c", "d"];

    fn boxed(stage: TickStage, log: &Log) -> Box<dyn VehicleComponent> {
        Box::new(Self {
            stage,
            log: Rc::clone(log),
        })
    }
}

impl<const N: usize> VehicleComponent for Recorder<N> {
    fn identifier(&self) -> Identifier {
        Identifier::from_static("test", "recorder")
    }

    fn stage(&self) -> TickStage {
        self.stage
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        let mut log = self.log.borrow_mut();
        log.push(Self::NAMES[N]);
        if context.siblings.get::<Self>().is_some() {
            log.push("saw itself");
        }
        if context.siblings.get::<RigidBody>().is_some() {
            log.push("saw body");
        }
    }
}

/// Records the rigid body's accumulated force once the force stage is over.
#[derive(Debug, Default)]
struct ForceRecorder {
    net_force: Option<FreeVector>,
}

impl VehicleComponent for ForceRecorder {
    fn identifier(&self) -> Identifier {
        Identifier::from_static("test", "force_recorder")
    }

    fn stage(&self) -> TickStage {
        TickStage::Constraints
    }

    fn tick(&mut self, context: &mut ComponentContext<'_>) {
        self.net_force = context.siblings.get::<RigidBody>().map(RigidBody::net_force);
    }
}

// --- Vehicle ---

#[test]
fn stages_run_in_order_then_insertion_order() {
    let log = Log::default();
    let mut vehicle = Vehicle::new(vehicle_type(vec![]));
    vehicle
        .add_component(Recorder::<0>::boxed(TickStage::Behavior, &log))
        .unwrap();
    vehicle
        .add_component(Recorder::<1>::boxed(TickStage::Forces, &log))
        .unwrap();
    vehicle
        .add_component(Recorder::<2>::boxed(TickStage::Behavior, &log))
        .unwrap();
    vehicle
        .add_component(Recorder::<3>::boxed(TickStage::Constraints, &log))
        .unwrap();

    vehicle.tick(Tick::STANDARD, &SparseWorld::new(), None);

    assert_eq!(*log.borrow(), vec!["b", "d", "a", "c"]);
}

#[test]
fn siblings_exclude_self() {
    let log = Log::default();
    let mut vehicle = vehicle_type(vec![RigidBody::component_type()]).instantiate();
    vehicle
        .add_component(Recorder::<0>::boxed(TickStage::Forces, &log))
        .unwrap();

    vehicle.tick(Tick::STANDARD, &SparseWorld::new(), None);

    assert_eq!(*log.borrow(), vec!["a", "saw body"]);
}

#[test]
fn paused_tick_does_nothing() {
    let log = Log::default();
    let mut vehicle = vehicle_type(vec![
        Gravity::component_type(),
        RigidBody::component_type(),
    ])
    .instantiate();
    vehicle
        .add_component(Recorder::<0>::boxed(TickStage::Forces, &log))
        .unwrap();

    vehicle.tick(Tick::STANDARD.pause(), &SparseWorld::new(), None);

    assert_eq!(*log.borrow(), Vec::<&str>::new());
    assert_eq!(vehicle.body().unwrap().velocity, FreeVector::zero());
}

#[test]
fn duplicate_component_rejected() {
    let mut vehicle = vehicle_type(vec![Gravity::component_type()]).instantiate();
    let error = vehicle
        .add_component(Box::new(Gravity::new(Default::default())))
        .unwrap_err();
    assert_eq!(error, DuplicateComponent(Gravity::IDENTIFIER));
    assert_eq!(
        error.to_string(),
        "vehicle already has a component of type torque:gravity"
    );
    assert_eq!(vehicle.components().count(), 1);
}

#[test]
fn accumulators_reset_each_tick() {
    let mut vehicle = vehicle_type(vec![RigidBody::component_type()]).instantiate();
    vehicle.add_component(Box::new(ForceRecorder::default())).unwrap();
    vehicle
        .body_mut()
        .unwrap()
        .add_force(vec3(1.0, 0.0, 0.0), point3(0.0, 0.0, 0.0));

    vehicle.tick(Tick::STANDARD, &SparseWorld::new(), None);

    let recorder = vehicle.component::<ForceRecorder>().unwrap();
    assert_eq!(recorder.net_force, Some(FreeVector::zero()));
    assert_eq!(vehicle.body().unwrap().velocity, FreeVector::zero());
}

#[test]
fn body_at_rest_stays_at_rest() {
    let mut vehicle = vehicle_type(vec![
        Collision::component_type(),
        RigidBody::component_type(),
    ])
    .instantiate();
    vehicle.body_mut().unwrap().position = point3(2.5, 10.0, -3.0);
    let before = vehicle.body().unwrap().clone();

    vehicle.tick(Tick::STANDARD, &SparseWorld::new(), None);

    assert_eq!(vehicle.body().unwrap(), &before);
}

/// A body whose hull starts out overlapping the block at cube y = 1 is held in place by
/// contacts from the first tick: gravity never gets to move it.
#[test]
fn body_embedded_in_block_is_held() {
    let mut world = SparseWorld::new();
    world.set(Cube::new(0, 1, 0), BlockKind::Solid);
    let mut vehicle = vehicle_type(vec![
        Gravity::component_type(),
        Collision::component_type(),
        RigidBody::component_type(),
    ])
    .instantiate();
    let start = point3(0.5, 1.1, 0.5);
    vehicle.body_mut().unwrap().position = start;

    vehicle.tick(Tick::STANDARD, &world, None);
    let body = vehicle.body().unwrap();
    assert!(body.velocity.y >= -1e-9, "{:?}", body.velocity);
    let first = vehicle.component::<Collision>().unwrap().last_resolution().unwrap();
    assert!(!first.hit_iteration_limit);

    for _ in 0..100 {
        vehicle.tick(Tick::STANDARD, &world, None);
    }
    let body = vehicle.body().unwrap();
    assert!(body.velocity.length() < 1e-9, "{:?}", body.velocity);
    assert!(body.angular_velocity.length() < 1e-9);
    assert!((body.position - start).length() < 1e-6);
}

/// A body released 0.1 m above the top of the block at the origin falls freely until its
/// hull's samples reach the block, then comes to rest and stays there.
#[test]
fn body_falls_onto_block_and_settles() {
    let mut world = SparseWorld::new();
    world.set(Cube::new(0, 0, 0), BlockKind::Solid);
    let mut vehicle = vehicle_type(vec![
        Gravity::component_type(),
        Collision::component_type(),
        RigidBody::component_type(),
    ])
    .instantiate();
    vehicle.body_mut().unwrap().position = point3(0.5, 1.1, 0.5);

    vehicle.tick(Tick::STANDARD, &world, None);
    assert!(
        vehicle.component::<Collision>().unwrap().last_resolution().is_none(),
        "no contact on the first tick"
    );
    let body = vehicle.body().unwrap();
    assert!((body.velocity.y + 0.49).abs() < 1e-9, "{:?}", body.velocity);

    for _ in 1..60 {
        vehicle.tick(Tick::STANDARD, &world, None);
    }
    let rest = vehicle.body().unwrap().position;
    assert!((rest.y - 0.953).abs() < 0.01, "{rest:?}");

    for _ in 60..200 {
        vehicle.tick(Tick::STANDARD, &world, None);
        let body = vehicle.body().unwrap();
        assert!(body.velocity.length() < 1e-6, "{:?}", body.velocity);
        assert!(body.angular_velocity.length() < 1e-6);
        assert!((body.position - rest).length() < 1e-6);
    }
}

#[test]
fn drag_on_moving_vehicle() {
    let mut vehicle = vehicle_type(vec![
        Drag::component_type(),
        RigidBody::component_type(),
    ])
    .instantiate();
    vehicle.add_component(Box::new(ForceRecorder::default())).unwrap();
    vehicle.body_mut().unwrap().velocity = vec3(10.0, 0.0, 0.0);

    vehicle.tick(Tick::STANDARD, &SparseWorld::new(), None);

    let magnitude = 0.5 * 50.3 * 1.225 * 2.0 * 100.0;
    assert_eq!(
        vehicle.component::<ForceRecorder>().unwrap().net_force,
        Some(vec3(-magnitude, 0.0, 0.0))
    );
    let expected_speed = 10.0 - magnitude / 1500.0 * 0.05;
    assert!((vehicle.body().unwrap().velocity.x - expected_speed).abs() < 1e-9);
}

#[test]
fn save_writes_type_and_component_scopes() {
    let mut vehicle = vehicle_type(vec![
        Gravity::component_type(),
        RigidBody::component_type(),
    ])
    .instantiate();
    vehicle.body_mut().unwrap().velocity = vec3(1.0, 2.0, 3.0);
    let mut data = DataCompound::new();

    vehicle.save(&mut data);

    assert_eq!(data.get("vehicle_type"), Some(&DataValue::Identifier(CAR)));
    let components = data.child("components");
    assert_eq!(
        components
            .child("torque:rigid_body")
            .read_vector("velocity", FreeVector::zero()),
        vec3(1.0, 2.0, 3.0)
    );
    // Gravity has no state, but still gets a scope.
    assert!(matches!(
        data.get("components"),
        Some(DataValue::Compound(c)) if c.get("torque:gravity").is_some()
    ));
}

#[test]
fn load_restores_body() {
    let car_type = vehicle_type(vec![
        Gravity::component_type(),
        RigidBody::component_type(),
    ]);
    let mut original = car_type.instantiate();
    {
        let body = original.body_mut().unwrap();
        body.position = point3(4.0, 5.0, 6.0);
        body.orientation = Rotation::around_y(degrees(90.0));
        body.velocity = vec3(1.0, 0.0, -1.0);
        body.angular_velocity = vec3(0.0, 0.5, 0.0);
    }
    let mut data = DataCompound::new();
    original.save(&mut data);

    let loaded = Vehicle::load(Arc::clone(&car_type), &data);

    assert_eq!(loaded.body(), original.body());
    assert_eq!(loaded.components().count(), 2);
}

// --- VehicleType ---

#[test]
fn vehicle_type_from_json() {
    let vehicle_type =
        VehicleType::from_json(CAR, CAR_JSON, &ComponentRegistry::new(), &models()).unwrap();

    assert_eq!(vehicle_type.identifier(), &CAR);
    assert_eq!(vehicle_type.model_id(), &CAR_MODEL);
    assert_eq!(vehicle_type.model().elements().len(), 2);
    assert_eq!(vehicle_type.mass_properties().mass(), 1500.0);
    assert_eq!(
        vehicle_type
            .component_types()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec![
            "torque:gravity",
            "torque:drag",
            "torque:collision",
            "torque:rigid_body"
        ]
    );

    let vehicle = Arc::new(vehicle_type).instantiate();
    assert_eq!(
        vehicle.component::<Drag>().unwrap().config(),
        &DragConfig {
            drag_coefficient: 0.3,
            ..DragConfig::default()
        }
    );
}

#[test]
fn hidden_elements_have_no_mass() {
    let with_seat =
        VehicleType::from_json(CAR, CAR_JSON, &ComponentRegistry::new(), &models()).unwrap();
    let without_seat = VehicleType::new(
        CAR,
        CAR_MODEL,
        Arc::new(
            VehicleModel::from_json(
                r#"{"elements": [{ "from": [-16, 0, -36], "to": [16, 25.6, 36] }]}"#,
            )
            .unwrap(),
        ),
        1500.0,
        vec![],
    )
    .unwrap();
    assert_eq!(with_seat.mass_properties(), without_seat.mass_properties());
}

#[rstest]
#[case::syntax(r#"{"model": "#, |e: &VehicleTypeError| matches!(e, VehicleTypeError::Json(_)))]
#[case::no_model(
    r#"{"mass_kg": 1.0, "components": []}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::MissingField("model"))
)]
#[case::no_mass(
    r#"{"model": "test:car_model", "components": []}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::MissingField("mass_kg"))
)]
#[case::no_components(
    r#"{"model": "test:car_model", "mass_kg": 1.0}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::MissingField("components"))
)]
#[case::zero_mass(
    r#"{"model": "test:car_model", "mass_kg": 0.0, "components": []}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::InvalidMass(m) if *m == 0.0)
)]
#[case::negative_mass(
    r#"{"model": "test:car_model", "mass_kg": -5.0, "components": []}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::InvalidMass(_))
)]
#[case::bad_model_id(
    r#"{"model": "Car", "mass_kg": 1.0, "components": []}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::InvalidIdentifier(_))
)]
#[case::unknown_model(
    r#"{"model": "test:truck", "mass_kg": 1.0, "components": []}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::UnknownModel(id) if id.key() == "truck")
)]
#[case::no_type(
    r#"{"model": "test:car_model", "mass_kg": 1.0, "components": [{}]}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::MissingField("type"))
)]
#[case::unknown_component(
    r#"{"model": "test:car_model", "mass_kg": 1.0, "components": [{"type": "torque:wings"}]}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::UnknownComponentType(id) if id.key() == "wings")
)]
#[case::duplicate_component(
    r#"{"model": "test:car_model", "mass_kg": 1.0,
        "components": [{"type": "torque:gravity"}, {"type": "torque:gravity"}]}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::DuplicateComponent(_))
)]
#[case::misspelled_config(
    r#"{"model": "test:car_model", "mass_kg": 1.0,
        "components": [{"type": "torque:drag", "drag_coeficient": 1.0}]}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::ComponentConfig { component, .. } if *component == Drag::IDENTIFIER)
)]
#[case::config_for_unconfigurable(
    r#"{"model": "test:car_model", "mass_kg": 1.0,
        "components": [{"type": "torque:collision", "strength": 1.0}]}"#,
    |e: &VehicleTypeError| matches!(e, VehicleTypeError::ComponentConfig { .. })
)]
fn vehicle_type_json_errors(
    #[case] json: &str,
    #[case] check: fn(&VehicleTypeError) -> bool,
) {
    let error = VehicleType::from_json(CAR, json, &ComponentRegistry::new(), &models())
        .unwrap_err();
    assert!(check(&error), "unexpected error: {error:?}");
}

#[test]
fn degenerate_geometry_is_a_config_error() {
    let mut models = Registry::new();
    models
        .register(
            CAR_MODEL,
            Arc::new(VehicleModel::from_json(r#"{"elements": []}"#).unwrap()),
        )
        .unwrap();
    let error = VehicleType::from_json(CAR, CAR_JSON, &ComponentRegistry::new(), &models)
        .unwrap_err();
    assert!(matches!(error, VehicleTypeError::DegenerateGeometry(_)));
}

#[test]
fn registry_rejects_duplicates() {
    let mut registry = Registry::new();
    registry.register(CAR, 1).unwrap();
    assert_eq!(
        registry.register(CAR, 2),
        Err(RegistryError::Duplicate(CAR))
    );
    assert_eq!(registry.get(&CAR), Some(&1));
    assert_eq!(registry.len(), 1);
}

#[test]
fn component_registry_rejects_duplicates() {
    let mut registry = ComponentRegistry::new();
    assert_eq!(
        registry.register(Gravity::component_type()),
        Err(RegistryError::Duplicate(Gravity::IDENTIFIER))
    );
    assert_eq!(registry.iter().count(), 7);
    assert!(ComponentRegistry::empty().get(&Gravity::IDENTIFIER).is_none());
}

// --- VehicleManager ---

#[test]
fn spawn_places_body() {
    let mut manager = manager();
    let id = manager.spawn_vehicle(&CAR, point3(1.0, 2.0, 3.0)).unwrap();

    let body = manager.vehicle(id).unwrap().body().unwrap();
    assert_eq!(body.position, point3(1.0, 2.0, 3.0));
    assert_eq!(body.velocity, FreeVector::zero());
    assert_eq!(manager.len(), 1);
}

#[test]
fn spawn_unknown_type() {
    let mut manager = manager();
    assert_eq!(
        manager.spawn_vehicle(&Identifier::from_static("test", "boat"), point3(0.0, 0.0, 0.0)),
        Err(LoadError::UnknownVehicleType(Identifier::from_static("test", "boat")))
    );
    assert!(manager.is_empty());
}

#[test]
fn register_duplicate_vehicle_type() {
    let mut manager = manager();
    let error = manager.register_vehicle_type_json(CAR, CAR_JSON).unwrap_err();
    assert!(matches!(
        error,
        VehicleTypeError::Registry(RegistryError::Duplicate(id)) if id == CAR
    ));
}

#[test]
fn custom_component_type() {
    let mut manager = manager();
    manager
        .register_component_type(ComponentType::new(
            Identifier::from_static("test", "force_recorder"),
            |_| Box::new(ForceRecorder::default()),
        ))
        .unwrap();
    manager
        .register_vehicle_type_json(
            Identifier::from_static("test", "recorded"),
            r#"{"model": "test:car_model", "mass_kg": 1000.0,
                "components": [{"type": "torque:gravity"}, {"type": "torque:rigid_body"},
                               {"type": "test:force_recorder"}]}"#,
        )
        .unwrap();
    let id = manager
        .spawn_vehicle(&Identifier::from_static("test", "recorded"), point3(0.0, 50.0, 0.0))
        .unwrap();

    manager.tick(Tick::STANDARD, &SparseWorld::new(), None);

    let recorder = manager.vehicle(id).unwrap().component::<ForceRecorder>().unwrap();
    assert_eq!(recorder.net_force, Some(vec3(0.0, -9.8 * 1000.0, 0.0)));
}

#[test]
fn driver_input_reaches_components() {
    let kart = Identifier::from_static("test", "kart");
    let mut manager = manager();
    manager
        .register_vehicle_type_json(
            kart.clone(),
            r#"{"model": "test:car_model", "mass_kg": 1500.0,
                "components": [
                    {"type": "torque:steering_wheel"},
                    {"type": "torque:wheels", "wheels": [
                        {"contact_patch": [-0.9, 0.0, -1.5], "steerable": true},
                        {"contact_patch": [0.9, 0.0, -1.5], "steerable": true},
                        {"contact_patch": [-0.9, 0.0, 1.5], "driven": true},
                        {"contact_patch": [0.9, 0.0, 1.5], "driven": true}
                    ]},
                    {"type": "torque:rigid_body"}
                ]}"#,
        )
        .unwrap();
    let id = manager.spawn_vehicle(&kart, point3(0.0, 50.0, 0.0)).unwrap();
    let input = DriverInput {
        forward: true,
        right: true,
        ..DriverInput::NONE
    };
    manager.vehicle_mut(id).unwrap().set_driver_input(input);

    manager.tick(Tick::STANDARD, &SparseWorld::new(), None);

    let vehicle = manager.vehicle(id).unwrap();
    assert_eq!(vehicle.driver_input(), input);
    let angle = vehicle.component::<SteeringWheel>().unwrap().angle();
    assert!((angle - 0.1).abs() < 1e-12, "{angle}");
    let velocity = vehicle.body().unwrap().velocity;
    assert!(velocity.z < 0.0, "{velocity:?}");
}

#[test]
fn manager_ticks_every_vehicle() {
    let mut manager = manager();
    let a = manager.spawn_vehicle(&CAR, point3(0.0, 50.0, 0.0)).unwrap();
    let b = manager.spawn_vehicle(&CAR, point3(100.0, 50.0, 0.0)).unwrap();

    manager.tick(Tick::STANDARD, &SparseWorld::new(), None);

    for id in [a, b] {
        let velocity = manager.vehicle(id).unwrap().body().unwrap().velocity;
        assert!(velocity.y < 0.0);
    }
    assert_eq!(manager.vehicles().map(|(id, _)| id).collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn save_remove_load_round_trip() {
    let mut world = SparseWorld::new();
    world.fill_layer(0, 8, BlockKind::Solid);
    let mut manager = manager();
    let id = manager.spawn_vehicle(&CAR, point3(0.5, 3.0, 0.5)).unwrap();
    for _ in 0..5 {
        manager.tick(Tick::STANDARD, &world, None);
    }
    let before = manager.vehicle(id).unwrap().body().unwrap().clone();

    let data = manager.save_vehicle(id).unwrap();
    assert!(manager.remove_vehicle(id).is_some());
    assert!(manager.vehicle(id).is_none());
    assert!(manager.save_vehicle(id).is_none());

    let new_id = manager.load_vehicle(&data).unwrap();
    assert_ne!(new_id, id);
    let after = manager.vehicle(new_id).unwrap().body().unwrap();
    assert_eq!(after.position, before.position);
    assert_eq!(after.velocity, before.velocity);
    assert_eq!(after.orientation, before.orientation);
    assert_eq!(after.angular_velocity, before.angular_velocity);
}

#[test]
fn save_and_unload_all_then_reload() {
    let mut manager = manager();
    let ids = [
        manager.spawn_vehicle(&CAR, point3(0.0, 0.0, 0.0)).unwrap(),
        manager.spawn_vehicle(&CAR, point3(10.0, 0.0, 0.0)).unwrap(),
    ];

    let saved = manager.save_and_unload_all();

    assert!(manager.is_empty());
    assert_eq!(saved.iter().map(|(id, _)| *id).collect::<Vec<_>>(), ids);
    for (_, data) in &saved {
        manager.load_vehicle(data).unwrap();
    }
    let positions: Vec<_> = manager
        .vehicles()
        .map(|(_, vehicle)| vehicle.body().unwrap().position.x)
        .collect();
    assert_eq!(positions, vec![0.0, 10.0]);
}

#[test]
fn load_without_type() {
    let mut manager = manager();
    assert_eq!(
        manager.load_vehicle(&DataCompound::new()),
        Err(LoadError::MissingVehicleType)
    );
}

#[test]
fn load_unknown_type() {
    let mut manager = manager();
    let mut data = DataCompound::new();
    data.write_identifier("vehicle_type", &Identifier::from_static("test", "boat"));
    assert_eq!(
        manager.load_vehicle(&data),
        Err(LoadError::UnknownVehicleType(Identifier::from_static("test", "boat")))
    );
}

#[test]
fn simple_collision_vehicle_reports_ground() {
    let mut world = SparseWorld::new();
    world.fill_layer(0, 4, BlockKind::Solid);
    let mut vehicle = vehicle_type(vec![
        Gravity::component_type(),
        SimpleCollision::component_type(),
        RigidBody::component_type(),
    ])
    .instantiate();
    vehicle.body_mut().unwrap().position = point3(0.5, 1.0, 0.5);

    for _ in 0..10 {
        vehicle.tick(Tick::STANDARD, &world, None);
    }

    assert!(vehicle.component::<SimpleCollision>().unwrap().on_ground());
    assert!(vehicle.body().unwrap().velocity.length() < 1e-9);
}
