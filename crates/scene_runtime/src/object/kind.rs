//! Object kinds and their factories
//!
//! Every object type is built by an [`ObjectFactory`], selected from the
//! [`TypeCatalog`](super::TypeCatalog) by the blueprint's kind when the type is
//! registered. The factory creates the kind-specific part of an instance; the
//! common part (transform, variables, forces, timers, behaviors) lives in
//! [`ObjectState`].

use std::any::Any;

use crate::foundation::math::Aabb;

use super::data::{InstanceData, ObjectBlueprint};
use super::ObjectState;

/// Kind-specific part of an object instance
pub trait ObjectKind {
    /// Per-frame update, run before the behaviors' pre-events step
    fn update(&mut self, _state: &mut ObjectState, _elapsed_time: f64) {}

    /// Last chance to update before rendering
    fn update_pre_render(&mut self, _state: &mut ObjectState) {}

    /// Reset kind-specific data for a recycled instance
    fn reinitialize(&mut self, _blueprint: &ObjectBlueprint) {}

    /// Apply placement properties once common properties are set
    fn extra_initialization_from_initial_instance(
        &mut self,
        _state: &mut ObjectState,
        _data: &InstanceData,
    ) {
    }

    /// Called when the instance is removed from its container
    fn on_deleted_from_container(&mut self, _state: &ObjectState) {}

    /// Called when the instance is flushed, whether it is recycled or dropped
    fn on_destroyed(&mut self) {}

    /// Whether the instance has a depth and 3D rotations
    fn is_3d(&self) -> bool {
        false
    }

    /// Whether the instance is drawn by the renderer
    fn has_renderer_object(&self) -> bool {
        true
    }

    /// Width of the instance
    fn width(&self) -> f32 {
        0.0
    }

    /// Height of the instance
    fn height(&self) -> f32 {
        0.0
    }

    /// Box used for culling. `None` means always visible.
    fn visibility_aabb(&self, state: &ObjectState) -> Option<Aabb> {
        Some(Aabb::from_position_and_size(
            state.x(),
            state.y(),
            self.width(),
            self.height(),
        ))
    }

    /// Access the concrete kind
    fn as_any(&self) -> &dyn Any;

    /// Access the concrete kind mutably
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Builds the kind-specific part of instances
pub trait ObjectFactory {
    /// Create a new instance kind from the type blueprint
    fn create(&self, blueprint: &ObjectBlueprint) -> Box<dyn ObjectKind>;

    /// Whether destroyed instances can be reinitialized and reused
    fn supports_recycling(&self) -> bool {
        false
    }
}

/// Kind without specific data, used when a blueprint's kind is unknown
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyObject;

impl ObjectKind for EmptyObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Factory of [`EmptyObject`]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyObjectFactory;

impl ObjectFactory for EmptyObjectFactory {
    fn create(&self, _blueprint: &ObjectBlueprint) -> Box<dyn ObjectKind> {
        Box::new(EmptyObject)
    }
}
