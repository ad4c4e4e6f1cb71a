//! Layer management
//!
//! Layers are kept by name and in render order. The base layer (`""`) always
//! exists; lookups of unknown layers fall back to it.

use std::collections::HashMap;

use log::{debug, warn};

use super::layer::{RuntimeLayer, BASE_LAYER};
use super::InstanceContainer;
use crate::object::LayerData;

impl InstanceContainer {
    /// Add a layer at the end of the render order.
    ///
    /// If a layer with the same name exists, its description is replaced and
    /// it keeps its position and camera.
    pub fn add_layer(&mut self, data: &LayerData) {
        if let Some(layer) = self.layers.get_mut(&data.name) {
            layer.apply_data(data);
            return;
        }
        let layer = RuntimeLayer::new(data, self.viewport_width, self.viewport_height);
        self.layers.insert(data.name.clone(), layer);
        self.ordered_layers.push(data.name.clone());
        debug!("Added layer \"{}\"", data.name);
    }

    /// Remove a layer, moving its instances to the base layer.
    ///
    /// The base layer cannot be removed. Unknown names are ignored.
    pub fn remove_layer(&mut self, name: &str) {
        if name == BASE_LAYER {
            warn!("The base layer cannot be removed.");
            return;
        }
        if !self.layers.contains_key(name) {
            return;
        }

        for keys in self.instances.values() {
            for key in keys {
                if let Some(object) = self.arena.get_mut(*key) {
                    if object.layer() == name {
                        object.state_mut().set_layer(BASE_LAYER);
                    }
                }
            }
        }

        self.layers.remove(name);
        self.ordered_layers.retain(|layer_name| layer_name != name);
        self.layers_camera_coordinates.remove(name);
        debug!("Removed layer \"{name}\"");
    }

    /// Move a layer to a new position in the render order.
    ///
    /// The index is clamped to the number of layers. Unknown layers and
    /// unchanged positions are ignored.
    pub fn set_layer_index(&mut self, name: &str, index: usize) {
        let Some(current) = self.ordered_layers.iter().position(|layer_name| layer_name == name)
        else {
            return;
        };
        let index = index.min(self.ordered_layers.len() - 1);
        if current == index {
            return;
        }

        let moved = self.ordered_layers.remove(current);
        self.ordered_layers.insert(index, moved);
        if let Some(layer) = self.layers.get(name) {
            self.renderer.set_layer_index(layer, index);
        }
    }

    /// Get a layer, or the base layer if it does not exist
    pub fn get_layer(&self, name: &str) -> &RuntimeLayer {
        match self.layers.get(name) {
            Some(layer) => layer,
            // The base layer is never removed
            None => &self.layers[BASE_LAYER],
        }
    }

    /// Get a layer mutably, or the base layer if it does not exist
    pub fn get_layer_mut(&mut self, name: &str) -> &mut RuntimeLayer {
        let name = if self.layers.contains_key(name) { name } else { BASE_LAYER };
        let (width, height) = (self.viewport_width, self.viewport_height);
        self.layers
            .entry(name.to_string())
            .or_insert_with(|| RuntimeLayer::new(&LayerData::new(name), width, height))
    }

    /// Check if a layer exists
    pub fn has_layer(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    /// Names of every layer, in render order
    pub fn get_all_layer_names(&self) -> &[String] {
        &self.ordered_layers
    }

    /// Layers in render order
    pub fn layers(&self) -> impl Iterator<Item = &RuntimeLayer> {
        self.ordered_layers
            .iter()
            .filter_map(|name| self.layers.get(name))
    }

    /// Give each layer a default Z order above all its instances. Instances
    /// on unknown layers count for the base layer.
    ///
    /// Does nothing when the legacy zero default Z order is enabled.
    pub fn set_layer_default_z_orders(&mut self) {
        if self.config.use_deprecated_zero_as_default_z_order {
            return;
        }

        let mut highest: HashMap<&str, i32> = HashMap::new();
        for keys in self.instances.values() {
            for object in keys.iter().filter_map(|key| self.arena.get(*key)) {
                let z_order = object.state().z_order();
                // Unknown layers resolve to the base layer
                let layer = if self.layers.contains_key(object.layer()) {
                    object.layer()
                } else {
                    BASE_LAYER
                };
                highest
                    .entry(layer)
                    .and_modify(|current| *current = (*current).max(z_order))
                    .or_insert(z_order);
            }
        }

        for (name, layer) in &mut self.layers {
            if let Some(z_order) = highest.get(name.as_str()) {
                layer.set_default_z_order(z_order + 1);
            }
        }
    }

    /// Compute the area seen by the camera of every layer, with half extents
    /// multiplied by `scale`. The result is used for culling.
    pub fn update_layers_camera_coordinates(&mut self, scale: f32) {
        self.layers_camera_coordinates.clear();
        for (name, layer) in &self.layers {
            self.layers_camera_coordinates
                .insert(name.clone(), layer.camera_rect(scale));
        }
    }

    /// Last area computed for a layer by
    /// [`update_layers_camera_coordinates`](Self::update_layers_camera_coordinates)
    pub fn layer_camera_coordinates(&self, name: &str) -> Option<[f32; 4]> {
        self.layers_camera_coordinates.get(name).copied()
    }

    /// Resize the viewport of every layer
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        for layer in self.layers.values_mut() {
            layer.set_viewport_size(width, height);
        }
    }

    /// Convert a point from canvas coordinates to the coordinates of a layer
    pub fn convert_coords(&self, layer: &str, x: f32, y: f32) -> (f32, f32) {
        self.get_layer(layer).convert_coords(x, y)
    }

    /// Convert a point from the coordinates of a layer to canvas coordinates
    pub fn convert_inverse_coords(&self, layer: &str, x: f32, y: f32) -> (f32, f32) {
        self.get_layer(layer).convert_inverse_coords(x, y)
    }
}
