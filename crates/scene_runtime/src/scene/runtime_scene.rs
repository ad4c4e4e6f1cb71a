//! Runtime scene
//!
//! Owns the instance container of a scene and its clock, loads the scene
//! content and sequences the update phases of each frame around the events.

use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::{SceneDriver, SceneFrame};
use crate::config::SceneConfig;
use crate::container::InstanceContainer;
use crate::foundation::time::TimeManager;
use crate::object::{SceneData, TypeCatalog};

/// Statistics of the last frame
#[derive(Debug, Clone, Default)]
pub struct SceneStats {
    /// Frames stepped since the scene was loaded
    pub frame_count: u64,

    /// Live instances at the end of the frame
    pub instance_count: usize,

    /// Layers of the scene
    pub layer_count: usize,

    /// Scaled and clamped elapsed time of the frame, in milliseconds
    pub elapsed_time_ms: f64,

    /// Time spent in the update phases and events (microseconds)
    pub step_time_us: u64,
}

/// A scene being played
pub struct RuntimeScene {
    name: String,
    container: InstanceContainer,
    time: TimeManager,
    config: SceneConfig,
    stats: SceneStats,
    loaded: bool,
}

impl RuntimeScene {
    /// Create an empty scene
    pub fn new(catalog: Rc<TypeCatalog>, config: SceneConfig) -> Self {
        let mut container = InstanceContainer::with_config(catalog, config.container.clone());
        container.set_viewport_size(config.viewport_width, config.viewport_height);
        Self {
            name: String::new(),
            container,
            time: TimeManager::new(),
            config,
            stats: SceneStats::default(),
            loaded: false,
        }
    }

    /// Load the layers, object types and initial instances of a scene.
    ///
    /// A scene already loaded is unloaded first.
    pub fn load_from_scene(&mut self, data: &SceneData) {
        if self.loaded {
            warn!("Scene \"{}\" is already loaded, unloading it before loading \"{}\".", self.name, data.name);
            self.unload_scene();
        }
        self.name.clone_from(&data.name);

        for layer in &data.layers {
            self.container.add_layer(layer);
        }
        for blueprint in &data.objects {
            self.container.register_object(blueprint);
        }
        self.container
            .create_objects_from(&data.instances, 0.0, 0.0, 0.0, true);
        self.container.set_layer_default_z_orders();

        self.time.reset();
        self.stats = SceneStats::default();
        self.loaded = true;
        info!(
            "Loaded scene \"{}\": {} layers, {} object types, {} instances",
            self.name,
            self.container.get_all_layer_names().len(),
            data.objects.len(),
            self.container.instances_count()
        );
    }

    /// Step one frame.
    ///
    /// `elapsed_time_ms` is the real time since the previous frame. The
    /// `events` callback runs between the pre-events and post-events phases.
    /// Returns false if the scene is not loaded.
    pub fn render_and_step(
        &mut self,
        elapsed_time_ms: f64,
        mut events: impl FnMut(&mut InstanceContainer),
    ) -> bool {
        if !self.loaded {
            warn!("Tried to step a scene that is not loaded.");
            return false;
        }
        let step_start = Instant::now();

        self.time.update(elapsed_time_ms, self.config.minimal_framerate);
        let frame = self.frame();

        self.container.update_objects_pre_events(&frame);
        events(&mut self.container);
        self.container.update_objects_post_events();

        // Culling starts once the first frame has positioned the cameras
        if !self.time.is_first_frame() {
            self.container
                .update_layers_camera_coordinates(self.config.container.culling_scale);
        }
        self.container.update_layers_pre_render();
        self.container.update_objects_pre_render();

        self.update_stats(step_start.elapsed());
        true
    }

    /// Release every instance and layer of the scene
    pub fn unload_scene(&mut self) {
        if !self.loaded {
            return;
        }
        self.container.clear();
        self.loaded = false;
        info!("Unloaded scene \"{}\"", self.name);
    }

    fn update_stats(&mut self, step_time: Duration) {
        self.stats.frame_count = self.time.frame_count();
        self.stats.instance_count = self.container.instances_count();
        self.stats.layer_count = self.container.get_all_layer_names().len();
        self.stats.elapsed_time_ms = self.time.elapsed_time();
        self.stats.step_time_us = u64::try_from(step_time.as_micros()).unwrap_or(u64::MAX);
        debug!(
            "Frame {}: {} instances in {}us",
            self.stats.frame_count, self.stats.instance_count, self.stats.step_time_us
        );
    }

    /// Frame information of the current frame
    pub fn frame(&self) -> SceneFrame {
        SceneFrame::new(
            self.time.elapsed_time(),
            self.config.viewport_width,
            self.config.viewport_height,
        )
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the scene is loaded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Instance container of the scene
    pub fn container(&self) -> &InstanceContainer {
        &self.container
    }

    /// Instance container of the scene, mutably
    pub fn container_mut(&mut self) -> &mut InstanceContainer {
        &mut self.container
    }

    /// Clock of the scene
    pub fn time(&self) -> &TimeManager {
        &self.time
    }

    /// Clock of the scene, mutably (time scale)
    pub fn time_mut(&mut self) -> &mut TimeManager {
        &mut self.time
    }

    /// Scene settings
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Statistics of the last frame
    pub fn stats(&self) -> &SceneStats {
        &self.stats
    }
}

impl SceneDriver for RuntimeScene {
    fn elapsed_time_ms(&self) -> f64 {
        self.time.elapsed_time()
    }

    fn viewport_width(&self) -> f32 {
        self.config.viewport_width
    }

    fn viewport_height(&self) -> f32 {
        self.config.viewport_height
    }
}

impl std::fmt::Debug for RuntimeScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeScene")
            .field("name", &self.name)
            .field("loaded", &self.loaded)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}
