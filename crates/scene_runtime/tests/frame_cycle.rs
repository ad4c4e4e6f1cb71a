//! End-to-end tests of the instance container: registration, recycling,
//! deferred deletion, layers and full frames driven by a runtime scene.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use scene_runtime::foundation::logging;
use scene_runtime::prelude::*;

/// Coin kind counting how many times it was built by its factory
struct CoinKind {
    value: f64,
}

impl ObjectKind for CoinKind {
    fn reinitialize(&mut self, blueprint: &ObjectBlueprint) {
        self.value = blueprint.content.get("value").map_or(0.0, VariableValue::as_number);
    }

    fn width(&self) -> f32 {
        16.0
    }

    fn height(&self) -> f32 {
        16.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct CoinFactory {
    built: Rc<Cell<usize>>,
    recycling: bool,
}

impl ObjectFactory for CoinFactory {
    fn create(&self, blueprint: &ObjectBlueprint) -> Box<dyn ObjectKind> {
        self.built.set(self.built.get() + 1);
        Box::new(CoinKind {
            value: blueprint.content.get("value").map_or(0.0, VariableValue::as_number),
        })
    }

    fn supports_recycling(&self) -> bool {
        self.recycling
    }
}

/// Behavior spinning its owner, and spawning a coin when the owner's
/// "spawn" variable is set
struct Spinner;

impl Behavior for Spinner {
    fn step_pre_events(&mut self, container: &mut InstanceContainer, owner: InstanceKey) {
        let Some(object) = container.get_mut(owner) else {
            return;
        };
        let state = object.state_mut();
        state.set_angle(state.angle() + 90.0);
        let spawn = state.variables().get("spawn").is_some_and(VariableValue::as_bool);
        let (x, y) = (state.x(), state.y());
        if spawn {
            state.variables_mut().set("spawn", VariableValue::Boolean(false));
            container.create_object_on_layer("Coin", x, y, "");
        }
    }
}

struct SpinnerFactory;

impl BehaviorFactory for SpinnerFactory {
    fn create(&self, _data: &BehaviorData) -> Box<dyn Behavior> {
        Box::new(Spinner)
    }
}

struct Fixture {
    built: Rc<Cell<usize>>,
    catalog: Rc<TypeCatalog>,
}

fn fixture() -> Fixture {
    logging::init_for_tests();
    let built = Rc::new(Cell::new(0));
    let catalog = TypeCatalog::new()
        .with_object_kind("Sprite", CoinFactory { built: Rc::clone(&built), recycling: true })
        .with_object_kind("Text", CoinFactory { built: Rc::clone(&built), recycling: false })
        .with_behavior_kind("Spinner", SpinnerFactory);
    Fixture { built, catalog: Rc::new(catalog) }
}

fn coin_blueprint() -> ObjectBlueprint {
    ObjectBlueprint::new("Coin", "Sprite")
        .with_variable("value", VariableValue::Number(1.0))
        .with_content("value", VariableValue::Number(1.0))
}

fn container() -> (InstanceContainer, Rc<Cell<usize>>) {
    let fixture = fixture();
    let mut container = InstanceContainer::new(fixture.catalog);
    container.register_object(&coin_blueprint());
    (container, fixture.built)
}

#[test]
fn test_create_two_coins() {
    let (mut container, _) = container();
    let first = container.create_object("Coin").unwrap();
    let second = container.create_object("Coin").unwrap();

    assert_eq!(container.get_instances_count_on_scene("Coin"), 2);
    assert_ne!(
        container.get(first).unwrap().id(),
        container.get(second).unwrap().id()
    );
}

#[test]
fn test_deletion_then_flush_fills_pool() {
    let (mut container, _) = container();
    let first = container.create_object("Coin").unwrap();
    container.create_object("Coin").unwrap();

    container.mark_object_for_deletion(first);
    assert_eq!(container.get_instances_of("Coin").len(), 1);

    container.cache_or_clear_removed_instances();
    assert_eq!(container.recycle_pool_len("Coin"), 1);
}

#[test]
fn test_creation_reuses_recycled_instance() {
    let (mut container, built) = container();
    let first = container.create_object("Coin").unwrap();
    let first_id = container.get(first).unwrap().id();
    container.mark_object_for_deletion(first);
    container.cache_or_clear_removed_instances();
    assert_eq!(built.get(), 1);

    let recycled = container.create_object("Coin").unwrap();
    assert_eq!(built.get(), 1);
    assert_eq!(container.recycle_pool_len("Coin"), 0);
    assert_ne!(container.get(recycled).unwrap().id(), first_id);
}

#[test]
fn test_layer_reorder() {
    let (mut container, _) = container();
    container.add_layer(&LayerData::new("HUD"));
    assert_eq!(container.get_all_layer_names(), &["", "HUD"]);

    container.set_layer_index("HUD", 0);
    assert_eq!(container.get_all_layer_names(), &["HUD", ""]);
}

#[test]
fn test_layer_removal_moves_instances_to_base_layer() {
    let (mut container, _) = container();
    container.add_layer(&LayerData::new("HUD"));
    let coin = container.create_object_on_layer("Coin", 1.0, 2.0, "HUD").unwrap();

    container.remove_layer("HUD");
    assert_eq!(container.get(coin).unwrap().layer(), BASE_LAYER);
}

#[test]
fn test_unknown_type_creation() {
    let (mut container, built) = container();
    assert!(container.create_object("Unknown").is_none());
    assert_eq!(container.instances_count(), 0);
    assert!(container.get_adhoc_list_of_all_instances().is_empty());
    assert_eq!(built.get(), 0);
}

#[test]
fn test_ids_unique_across_recycling() {
    let (mut container, _) = container();
    let mut live = Vec::new();
    for round in 0..10 {
        for _ in 0..5 {
            live.extend(container.create_object("Coin"));
        }
        if round % 2 == 0 {
            for key in live.drain(..3) {
                container.mark_object_for_deletion(key);
            }
            container.cache_or_clear_removed_instances();
        }
    }

    let ids: HashSet<u64> = live
        .iter()
        .map(|key| container.get(*key).unwrap().id())
        .collect();
    assert_eq!(ids.len(), live.len());
}

#[test]
fn test_aggregate_list_matches_live_lists() {
    let fixture = fixture();
    let mut container = InstanceContainer::new(fixture.catalog);
    container.register_object(&coin_blueprint());
    container.register_object(&ObjectBlueprint::new("Label", "Text"));

    let mut keys = Vec::new();
    for index in 0..12 {
        let name = if index % 3 == 0 { "Label" } else { "Coin" };
        keys.extend(container.create_object(name));
    }
    let id = container.create_new_unique_id();
    keys.push(container.add_object(RuntimeObject::new(
        id,
        &ObjectBlueprint::new("Particle", "Sprite"),
        Box::new(scene_runtime::object::EmptyObject),
    )));
    for key in keys.iter().step_by(4) {
        container.mark_object_for_deletion(*key);
    }

    let mut expected: Vec<InstanceKey> = ["Coin", "Label", "Particle"]
        .iter()
        .flat_map(|name| container.get_instances_of(name).to_vec())
        .collect();
    expected.sort();

    let mut all = container.get_adhoc_list_of_all_instances().to_vec();
    all.sort();
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len());
    assert_eq!(all, expected);
}

#[test]
fn test_recycled_instance_matches_fresh_instance() {
    let (mut container, _) = container();
    let used = container.create_object("Coin").unwrap();
    {
        let object = container.get_mut(used).unwrap();
        object.kind_as_mut::<CoinKind>().unwrap().value = 99.0;
        let state = object.state_mut();
        state.set_position(30.0, 40.0);
        state.set_angle(45.0);
        state.set_layer("HUD");
        state.add_force(1.0, 0.0, 1.0);
        state.variables_mut().set("value", VariableValue::Number(7.0));
    }
    container.mark_object_for_deletion(used);
    container.cache_or_clear_removed_instances();

    let recycled = container.create_object("Coin").unwrap();
    let fresh = container.create_object("Coin").unwrap();
    let recycled = container.get(recycled).unwrap();
    let fresh = container.get(fresh).unwrap();

    let public_state = |object: &RuntimeObject| {
        let state = object.state();
        (
            state.x(),
            state.y(),
            state.angle(),
            state.layer().to_string(),
            state.forces().len(),
            state.variables().number("value"),
            state.is_living(),
            object.kind_as::<CoinKind>().unwrap().value,
        )
    };
    assert_eq!(public_state(recycled), public_state(fresh));
}

#[test]
fn test_stale_key_after_flush() {
    let (mut container, _) = container();
    let coin = container.create_object("Coin").unwrap();
    container.mark_object_for_deletion(coin);

    assert!(container.get_instances_of("Coin").is_empty());
    assert!(container.get(coin).is_some());
    container.get_mut(coin).unwrap().state_mut().set_x(5.0);

    container.cache_or_clear_removed_instances();
    assert!(container.get(coin).is_none());
    assert!(container.get_mut(coin).is_none());
    container.mark_object_for_deletion(coin);

    let recycled = container.create_object("Coin").unwrap();
    assert_ne!(recycled, coin);
    assert!(container.get(coin).is_none());
}

#[test]
fn test_pool_bound() {
    let (mut container, _) = container();
    let keys: Vec<_> = (0..200).filter_map(|_| container.create_object("Coin")).collect();
    for key in keys {
        container.mark_object_for_deletion(key);
    }
    container.cache_or_clear_removed_instances();
    assert_eq!(container.recycle_pool_len("Coin"), 128);

    let extra = container.create_object("Coin").unwrap();
    let more = container.create_object("Coin").unwrap();
    container.mark_object_for_deletion(extra);
    container.mark_object_for_deletion(more);
    container.cache_or_clear_removed_instances();
    assert_eq!(container.recycle_pool_len("Coin"), 128);
}

#[test]
fn test_deletion_listeners() {
    let (mut container, _) = container();
    let removed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&removed);
    container.add_deletion_listener(move |object| sink.borrow_mut().push(object.id()));

    let coin = container.create_object("Coin").unwrap();
    let id = container.get(coin).unwrap().id();
    container.mark_object_for_deletion(coin);
    container.mark_object_for_deletion(coin);
    assert_eq!(*removed.borrow(), vec![id]);
}

#[test]
fn test_unregister_object_deletes_instances() {
    let (mut container, _) = container();
    let keys: Vec<_> = (0..4).filter_map(|_| container.create_object("Coin")).collect();
    container.unregister_object("Coin");

    assert!(!container.is_object_registered("Coin"));
    assert!(keys.iter().all(|key| container.get(*key).is_none()));
    assert!(container.get_adhoc_list_of_all_instances().is_empty());
}

#[test]
fn test_scene_frames() {
    let fixture = fixture();
    let source = r#"(
        name: "Coins",
        layers: [(name: ""), (name: "HUD")],
        objects: [
            (
                name: "Coin",
                kind: "Sprite",
                variables: [(name: "value", value: 1.0)],
                content: {"value": 1.0},
            ),
            (
                name: "Wheel",
                kind: "Sprite",
                variables: [(name: "spawn", value: true)],
                behaviors: [(name: "Spin", kind: "Spinner")],
            ),
        ],
        instances: [
            (name: "Coin", x: 10.0, y: 10.0, z_order: 2),
            (name: "Coin", x: 20.0, y: 10.0, z_order: 6),
            (name: "Wheel", x: 400.0, y: 300.0, layer: "HUD", persistent_uuid: Some("wheel")),
        ],
    )"#;
    let data = SceneData::load_from_str("coins.ron", source).unwrap();

    let mut scene = RuntimeScene::new(fixture.catalog, SceneConfig::default());
    scene.load_from_scene(&data);
    assert_eq!(scene.container().get_layer("").default_z_order(), 7);

    // Frame 1: the wheel spawns a coin, events collect the first coin
    assert!(scene.render_and_step(16.0, |container| {
        let first = container.get_instances_of("Coin")[0];
        container.mark_object_for_deletion(first);
    }));
    let container = scene.container();
    assert_eq!(container.get_instances_count_on_scene("Coin"), 2);
    assert_eq!(container.recycle_pool_len("Coin"), 1);
    let wheel = container.find_by_persistent_uuid("wheel").unwrap();
    assert_eq!(container.get(wheel).unwrap().state().angle(), 90.0);

    // Frame 2: a new coin reuses the pooled one
    scene.render_and_step(16.0, |container| {
        container.create_object("Coin");
    });
    let container = scene.container();
    assert_eq!(container.get_instances_count_on_scene("Coin"), 3);
    assert_eq!(container.recycle_pool_len("Coin"), 0);
    assert_eq!(container.get(wheel).unwrap().state().angle(), 180.0);
    assert_eq!(fixture.built.get(), 4);
}
