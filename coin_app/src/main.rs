//! Coin collector demo
//!
//! Runs a headless scene where a player sweeps across the level collecting
//! coins while new coins keep spawning. Collected coins go back to the
//! recycle pool and are reused by the next spawns.

use std::any::Any;
use std::rc::Rc;

use scene_runtime::prelude::*;

const SCENE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/coin_scene.ron");
const FRAME_TIME_MS: f64 = 1000.0 / 60.0;
const FRAME_COUNT: u64 = 600;
const SPAWN_EVERY_FRAMES: u64 = 20;
const COLLECT_RADIUS: f32 = 24.0;
const COIN_TYPES: [&str; 2] = ["Coin", "GoldCoin"];

/// Errors of the demo application
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The scene file could not be read
    #[error("Failed to load scene: {0}")]
    Scene(#[from] ConfigError),

    /// The scene stopped before the end of the demo
    #[error("Scene \"{0}\" is not loaded")]
    SceneNotLoaded(String),
}

/// A coin worth some points
struct Coin {
    value: f64,
}

impl Coin {
    fn value_from(blueprint: &ObjectBlueprint) -> f64 {
        blueprint.content.get("value").map_or(1.0, VariableValue::as_number)
    }
}

impl ObjectKind for Coin {
    fn update(&mut self, state: &mut ObjectState, elapsed_time: f64) {
        // Coins slowly spin in place
        #[allow(clippy::cast_possible_truncation)]
        let step = (elapsed_time * 0.18) as f32;
        state.set_angle((state.angle() + step) % 360.0);
    }

    fn reinitialize(&mut self, blueprint: &ObjectBlueprint) {
        self.value = Self::value_from(blueprint);
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

struct CoinFactory;

impl ObjectFactory for CoinFactory {
    fn create(&self, blueprint: &ObjectBlueprint) -> Box<dyn ObjectKind> {
        Box::new(Coin { value: Coin::value_from(blueprint) })
    }

    fn supports_recycling(&self) -> bool {
        true
    }
}

/// Collects every coin close to its owner, adding their value to the
/// owner's "score" variable
struct Collector {
    radius: f32,
}

impl Behavior for Collector {
    fn step_pre_events(&mut self, container: &mut InstanceContainer, owner: InstanceKey) {
        let Some(player) = container.get(owner) else {
            return;
        };
        let (x, y) = (player.state().x(), player.state().y());

        let collected: Vec<(InstanceKey, f64)> = COIN_TYPES
            .iter()
            .flat_map(|name| container.get_instances_of(name))
            .filter_map(|key| container.get(*key).map(|coin| (*key, coin)))
            .filter(|(_, coin)| coin.state().distance_to_position(x, y) <= self.radius)
            .map(|(key, coin)| (key, coin.kind_as::<Coin>().map_or(0.0, |kind| kind.value)))
            .collect();

        let mut gained = 0.0;
        for (key, value) in collected {
            container.mark_object_for_deletion(key);
            gained += value;
        }
        if gained > 0.0 {
            if let Some(player) = container.get_mut(owner) {
                let score = player.state().variables().number("score");
                player
                    .state_mut()
                    .variables_mut()
                    .set("score", VariableValue::Number(score + gained));
            }
        }
    }
}

struct CollectorFactory;

impl BehaviorFactory for CollectorFactory {
    fn create(&self, data: &BehaviorData) -> Box<dyn Behavior> {
        #[allow(clippy::cast_possible_truncation)]
        let radius = data
            .properties
            .get("radius")
            .map_or(COLLECT_RADIUS, |radius| radius.as_number() as f32);
        Box::new(Collector { radius })
    }
}

/// Player moved by forces
struct Player;

impl ObjectKind for Player {
    fn width(&self) -> f32 {
        32.0
    }

    fn height(&self) -> f32 {
        32.0
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct PlayerFactory;

impl ObjectFactory for PlayerFactory {
    fn create(&self, _blueprint: &ObjectBlueprint) -> Box<dyn ObjectKind> {
        Box::new(Player)
    }
}

/// Deterministic spawn position for the n-th coin
#[allow(clippy::cast_precision_loss)]
fn spawn_position(index: u64) -> (f32, f32) {
    let x = ((index * 97) % 760) as f32 + 20.0;
    let y = ((index * 53) % 560) as f32 + 20.0;
    (x, y)
}

fn run() -> Result<(), AppError> {
    let catalog = TypeCatalog::new()
        .with_object_kind("Coin", CoinFactory)
        .with_object_kind("Player", PlayerFactory)
        .with_behavior_kind("Collector", CollectorFactory);

    let data = SceneData::load_from_file(SCENE_PATH)?;
    let mut scene = RuntimeScene::new(Rc::new(catalog), SceneConfig::default());
    scene.load_from_scene(&data);

    let player = scene
        .container()
        .find_by_persistent_uuid("player")
        .ok_or_else(|| AppError::SceneNotLoaded(data.name.clone()))?;

    for frame in 1..=FRAME_COUNT {
        let stepped = scene.render_and_step(FRAME_TIME_MS, |container| {
            // Steer the player toward the next spawn area
            let (target_x, target_y) = spawn_position(frame / SPAWN_EVERY_FRAMES + 1);
            if let Some(object) = container.get_mut(player) {
                let state = object.state_mut();
                state.clear_forces();
                state.add_force_toward_position(target_x, target_y, 240.0, 0.0);
            }

            if frame % SPAWN_EVERY_FRAMES == 0 {
                let (x, y) = spawn_position(frame / SPAWN_EVERY_FRAMES);
                container.create_object_on_layer("Coin", x, y, "");
            }
        });
        if !stepped {
            return Err(AppError::SceneNotLoaded(data.name.clone()));
        }

        if frame % 60 == 0 {
            let container = scene.container();
            let score = container
                .get(player)
                .map_or(0.0, |object| object.state().variables().number("score"));
            log::info!(
                "Frame {frame}: {} coins on scene, {} pooled, score {score}",
                container.get_instances_count_on_scene("Coin"),
                container.recycle_pool_len("Coin"),
            );
        }
    }

    let stats = scene.stats();
    log::info!(
        "Finished after {} frames with {} instances (last step {}us)",
        stats.frame_count,
        stats.instance_count,
        stats.step_time_us
    );
    scene.unload_scene();
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    log::info!("Starting coin collector demo");

    if let Err(error) = run() {
        log::error!("Coin demo failed: {error}");
        std::process::exit(1);
    }
}
