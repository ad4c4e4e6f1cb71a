//! Renderer interface of a container
//!
//! The container does not draw anything. It tells the renderer which
//! instances are visible, when layers are reordered, and when layer and
//! instance effects must be refreshed before a frame is drawn.

use crate::object::RuntimeObject;

use super::layer::RuntimeLayer;

/// Rendering backend notified by a container
pub trait ContainerRenderer {
    /// A layer was moved to a new position in the render order
    fn set_layer_index(&mut self, layer: &RuntimeLayer, index: usize);

    /// Refresh the effects of a layer before rendering
    fn update_layer_pre_render(&mut self, _layer: &RuntimeLayer) {}

    /// Show or hide the renderer object of an instance
    fn set_instance_visible(&mut self, _object: &RuntimeObject, _visible: bool) {}

    /// Refresh the effects of a visible instance before rendering
    fn update_instance_effects(&mut self, _object: &RuntimeObject) {}

    /// An instance left the container, its renderer object must be released
    fn remove_instance(&mut self, _object: &RuntimeObject) {}
}

/// Renderer ignoring every notification (headless containers, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl ContainerRenderer for NullRenderer {
    fn set_layer_index(&mut self, _layer: &RuntimeLayer, _index: usize) {}
}
