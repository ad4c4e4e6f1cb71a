//! # Scene Runtime
//!
//! Per-scene instance container for a 2D/3D game runtime.
//!
//! ## Features
//!
//! - **Object Registry**: object types registered from blueprints, each with a
//!   factory selected once from a shared [`TypeCatalog`](object::TypeCatalog)
//! - **Instance Store**: slotmap arena with per-type live lists and a lazily
//!   rebuilt list of every instance
//! - **Recycling**: bounded per-type pools of destroyed instances, reinitialized
//!   on creation
//! - **Deferred Deletion**: instances removed mid-frame stay reachable until the
//!   next flush
//! - **Layers**: ordered layers with cameras, time scales and culling
//! - **Frame Phases**: pre-events, post-events and pre-render updates, driven by
//!   a [`RuntimeScene`](scene::RuntimeScene)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use scene_runtime::prelude::*;
//!
//! let catalog = Rc::new(TypeCatalog::new().with_object_kind("Sprite", EmptyObjectFactory));
//! let mut scene = RuntimeScene::new(catalog, SceneConfig::default());
//! let data = SceneData::load_from_file("level.ron").unwrap();
//! scene.load_from_scene(&data);
//!
//! scene.render_and_step(16.0, |container| {
//!     let coins = container.get_instances_of("Coin").to_vec();
//!     for coin in coins {
//!         container.mark_object_for_deletion(coin);
//!     }
//! });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod object;
pub mod container;
pub mod scene;

/// Common imports for runtime users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ContainerConfig, SceneConfig},
        container::{ContainerRenderer, InstanceContainer, NullRenderer, RuntimeLayer, BASE_LAYER},
        foundation::{collections::InstanceKey, math::{Aabb, Vec2}, time::TimeManager},
        object::{
            Behavior, BehaviorData, BehaviorFactory, EmptyObjectFactory, InstanceData, LayerData,
            ObjectBlueprint, ObjectFactory, ObjectKind, ObjectState, RuntimeObject, SceneData,
            TypeCatalog, VariableData, VariableValue,
        },
        scene::{RuntimeScene, SceneDriver, SceneFrame},
    };
}
