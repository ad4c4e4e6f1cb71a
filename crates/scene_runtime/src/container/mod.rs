//! # Instance Container
//!
//! Owns every live instance of a scene (or of a custom object), creates and
//! recycles them, defers their destruction, keeps layers ordered and drives
//! the per-frame update phases.
//!
//! ## Storage
//!
//! Instances live in a slotmap arena and are referred to by [`InstanceKey`].
//! Each object type has a live list of keys; the aggregate list of every
//! instance is a cache rebuilt lazily when a dirty flag is set.
//!
//! ## Deletion
//!
//! [`InstanceContainer::mark_object_for_deletion`] removes an instance from its
//! live list immediately but keeps it in the arena, so code still holding its
//! key during the frame can read it. The flush
//! ([`InstanceContainer::cache_or_clear_removed_instances`]) then moves it to
//! the recycle pool of its type or drops it.
//!
//! ## Frame phases
//!
//! 1. [`InstanceContainer::update_objects_pre_events`]
//! 2. (events, run by the scene driver)
//! 3. [`InstanceContainer::update_objects_post_events`]
//! 4. [`InstanceContainer::update_layers_pre_render`] and
//!    [`InstanceContainer::update_objects_pre_render`]

mod registry;
mod store;
mod deletion;
mod frame;
mod layer_manager;

pub mod layer;
pub mod renderer;

pub use layer::{RuntimeLayer, BASE_LAYER};
pub use renderer::{ContainerRenderer, NullRenderer};

use std::collections::HashMap;
use std::rc::Rc;

use crate::config::ContainerConfig;
use crate::foundation::collections::{InstanceArena, InstanceKey};
use crate::object::{LayerData, ObjectBlueprint, ObjectFactory, RuntimeObject, TypeCatalog};

/// Callback notified when an instance is removed from a container
pub type DeletionListener = Box<dyn FnMut(&RuntimeObject)>;

/// Container of the instances living in a scene
pub struct InstanceContainer {
    catalog: Rc<TypeCatalog>,
    config: ContainerConfig,

    // Object registry
    objects: HashMap<String, ObjectBlueprint>,
    factories: HashMap<String, Rc<dyn ObjectFactory>>,

    // Instance store
    arena: InstanceArena<RuntimeObject>,
    instances: HashMap<String, Vec<InstanceKey>>,
    all_instances: Vec<InstanceKey>,
    all_instances_up_to_date: bool,
    phase_snapshot: Vec<InstanceKey>,
    last_id: u64,

    // Recycling and deletion
    recycle_pools: HashMap<String, Vec<RuntimeObject>>,
    removed_instances: Vec<InstanceKey>,
    deletion_listeners: Vec<DeletionListener>,

    // Layers
    layers: HashMap<String, RuntimeLayer>,
    ordered_layers: Vec<String>,
    layers_camera_coordinates: HashMap<String, [f32; 4]>,
    viewport_width: f32,
    viewport_height: f32,

    renderer: Box<dyn ContainerRenderer>,
}

impl InstanceContainer {
    /// Create a container with default settings and no renderer
    pub fn new(catalog: Rc<TypeCatalog>) -> Self {
        Self::with_config(catalog, ContainerConfig::default())
    }

    /// Create a container with custom settings
    pub fn with_config(catalog: Rc<TypeCatalog>, config: ContainerConfig) -> Self {
        let mut container = Self {
            catalog,
            config,
            objects: HashMap::new(),
            factories: HashMap::new(),
            arena: InstanceArena::with_key(),
            instances: HashMap::new(),
            all_instances: Vec::new(),
            all_instances_up_to_date: true,
            phase_snapshot: Vec::new(),
            last_id: 0,
            recycle_pools: HashMap::new(),
            removed_instances: Vec::new(),
            deletion_listeners: Vec::new(),
            layers: HashMap::new(),
            ordered_layers: Vec::new(),
            layers_camera_coordinates: HashMap::new(),
            viewport_width: 800.0,
            viewport_height: 600.0,
            renderer: Box::new(NullRenderer),
        };
        container.add_layer(&LayerData::new(BASE_LAYER));
        container
    }

    /// Set the renderer notified by the container
    pub fn set_renderer(&mut self, renderer: Box<dyn ContainerRenderer>) {
        self.renderer = renderer;
    }

    /// Settings of the container
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Catalog of object and behavior factories
    pub fn catalog(&self) -> &Rc<TypeCatalog> {
        &self.catalog
    }

    /// Create an identifier for a new instance
    pub fn create_new_unique_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Release every instance, pool and layer.
    ///
    /// Live and pending instances are notified as removed, then dropped. Only
    /// the base layer is kept, so the container stays usable.
    pub fn clear(&mut self) {
        let keys: Vec<InstanceKey> = self.arena.keys().collect();
        for key in keys {
            if let Some(object) = self.arena.get_mut(key) {
                if object.state().is_living() {
                    object.on_deleted_from_container();
                    self.renderer.remove_instance(object);
                }
                object.on_destroyed();
            }
        }
        self.arena.clear();
        self.objects.clear();
        self.factories.clear();
        self.instances.clear();
        self.all_instances.clear();
        self.all_instances_up_to_date = true;
        self.recycle_pools.clear();
        self.removed_instances.clear();
        self.layers.clear();
        self.ordered_layers.clear();
        self.layers_camera_coordinates.clear();
        self.add_layer(&LayerData::new(BASE_LAYER));
    }
}

impl std::fmt::Debug for InstanceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceContainer")
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .field("live_instances", &self.instances.values().map(Vec::len).sum::<usize>())
            .field("pending_deletion", &self.removed_instances.len())
            .field("layers", &self.ordered_layers)
            .finish_non_exhaustive()
    }
}
