//! Runtime layers
//!
//! A layer groups instances drawn together, with its own camera, time scale
//! and effects. The layer named `""` is the base layer.

use crate::foundation::math::{rotate_around, Vec2};
use crate::object::{EffectData, LayerData};

/// Name of the base layer
pub const BASE_LAYER: &str = "";

/// A layer of a container
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeLayer {
    name: String,
    hidden: bool,
    time_scale: f64,
    camera_x: f32,
    camera_y: f32,
    zoom: f32,
    camera_rotation: f32,
    viewport_width: f32,
    viewport_height: f32,
    default_z_order: i32,
    effects: Vec<EffectData>,
}

impl RuntimeLayer {
    /// Create a layer with its camera centered on the viewport
    pub fn new(data: &LayerData, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            name: data.name.clone(),
            hidden: !data.visibility,
            time_scale: data.time_scale,
            camera_x: viewport_width / 2.0,
            camera_y: viewport_height / 2.0,
            zoom: 1.0,
            camera_rotation: 0.0,
            viewport_width,
            viewport_height,
            default_z_order: 0,
            effects: data.effects.clone(),
        }
    }

    /// Replace the description of the layer, keeping its camera
    pub(crate) fn apply_data(&mut self, data: &LayerData) {
        self.hidden = !data.visibility;
        self.time_scale = data.time_scale;
        self.effects = data.effects.clone();
    }

    /// Layer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this is the base layer
    pub fn is_base_layer(&self) -> bool {
        self.name == BASE_LAYER
    }

    /// Hide or show the layer
    pub fn show(&mut self, enable: bool) {
        self.hidden = !enable;
    }

    /// Check if the layer is shown
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    /// Effects of the layer
    pub fn effects(&self) -> &[EffectData] {
        &self.effects
    }

    //--- Time -------------------------------------------------------------

    /// Time scale of objects on the layer
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Set the time scale (negative values are ignored)
    pub fn set_time_scale(&mut self, time_scale: f64) {
        if time_scale >= 0.0 {
            self.time_scale = time_scale;
        }
    }

    /// Elapsed time for objects on this layer, given the scene elapsed time
    pub fn elapsed_time(&self, scene_elapsed_time: f64) -> f64 {
        scene_elapsed_time * self.time_scale
    }

    //--- Z order ----------------------------------------------------------

    /// Z order given by default to instances created on the layer
    pub fn default_z_order(&self) -> i32 {
        self.default_z_order
    }

    /// Set the Z order given by default to new instances
    pub fn set_default_z_order(&mut self, z_order: i32) {
        self.default_z_order = z_order;
    }

    //--- Camera -----------------------------------------------------------

    /// Horizontal center of the camera
    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    /// Vertical center of the camera
    pub fn camera_y(&self) -> f32 {
        self.camera_y
    }

    /// Move the camera center
    pub fn set_camera_position(&mut self, x: f32, y: f32) {
        self.camera_x = x;
        self.camera_y = y;
    }

    /// Camera zoom
    pub fn camera_zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the camera zoom (non-positive values are ignored)
    pub fn set_camera_zoom(&mut self, zoom: f32) {
        if zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    /// Camera rotation in degrees
    pub fn camera_rotation(&self) -> f32 {
        self.camera_rotation
    }

    /// Set the camera rotation in degrees
    pub fn set_camera_rotation(&mut self, rotation: f32) {
        self.camera_rotation = rotation;
    }

    /// Width of the area seen by the camera
    pub fn camera_width(&self) -> f32 {
        self.viewport_width / self.zoom
    }

    /// Height of the area seen by the camera
    pub fn camera_height(&self) -> f32 {
        self.viewport_height / self.zoom
    }

    /// Rectangle seen by the camera, `[left, top, right, bottom]`, with the
    /// half extents multiplied by `scale`
    pub fn camera_rect(&self, scale: f32) -> [f32; 4] {
        let half_width = self.camera_width() / 2.0 * scale;
        let half_height = self.camera_height() / 2.0 * scale;
        [
            self.camera_x - half_width,
            self.camera_y - half_height,
            self.camera_x + half_width,
            self.camera_y + half_height,
        ]
    }

    /// Follow a viewport resize, keeping the camera anchored on the top-left
    /// corner of the view
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.camera_x += (width - self.viewport_width) / 2.0;
        self.camera_y += (height - self.viewport_height) / 2.0;
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Convert a point from canvas coordinates to layer coordinates
    pub fn convert_coords(&self, x: f32, y: f32) -> (f32, f32) {
        let centered = Vec2::new(
            (x - self.viewport_width / 2.0) / self.zoom,
            (y - self.viewport_height / 2.0) / self.zoom,
        );
        let rotated = rotate_around(centered, Vec2::zeros(), self.camera_rotation);
        (rotated.x + self.camera_x, rotated.y + self.camera_y)
    }

    /// Convert a point from layer coordinates to canvas coordinates
    pub fn convert_inverse_coords(&self, x: f32, y: f32) -> (f32, f32) {
        let relative = Vec2::new(x - self.camera_x, y - self.camera_y);
        let rotated = rotate_around(relative, Vec2::zeros(), -self.camera_rotation);
        (
            rotated.x * self.zoom + self.viewport_width / 2.0,
            rotated.y * self.zoom + self.viewport_height / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_rect() {
        let mut layer = RuntimeLayer::new(&LayerData::new("HUD"), 800.0, 600.0);
        assert_eq!(layer.camera_rect(1.0), [0.0, 0.0, 800.0, 600.0]);

        layer.set_camera_zoom(2.0);
        assert_eq!(layer.camera_rect(1.0), [200.0, 150.0, 600.0, 450.0]);
        assert_eq!(layer.camera_rect(2.0), [0.0, 0.0, 800.0, 600.0]);
    }

    #[test]
    fn test_coordinate_conversion_round_trip() {
        let mut layer = RuntimeLayer::new(&LayerData::new(""), 800.0, 600.0);
        layer.set_camera_position(1000.0, 500.0);
        layer.set_camera_zoom(2.0);
        layer.set_camera_rotation(30.0);

        let (x, y) = layer.convert_coords(400.0, 300.0);
        assert_relative_eq!(x, 1000.0, epsilon = 1e-3);
        assert_relative_eq!(y, 500.0, epsilon = 1e-3);

        let (scene_x, scene_y) = layer.convert_coords(10.0, 20.0);
        let (canvas_x, canvas_y) = layer.convert_inverse_coords(scene_x, scene_y);
        assert_relative_eq!(canvas_x, 10.0, epsilon = 1e-3);
        assert_relative_eq!(canvas_y, 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_layer_time_scale() {
        let mut data = LayerData::new("Slow");
        data.time_scale = 0.5;
        let mut layer = RuntimeLayer::new(&data, 800.0, 600.0);
        assert_relative_eq!(layer.elapsed_time(16.0), 8.0);

        layer.set_time_scale(-2.0);
        assert_relative_eq!(layer.time_scale(), 0.5);
    }

    #[test]
    fn test_viewport_resize_keeps_top_left() {
        let mut layer = RuntimeLayer::new(&LayerData::new(""), 800.0, 600.0);
        layer.set_viewport_size(1000.0, 800.0);
        assert_eq!(layer.camera_rect(1.0), [0.0, 0.0, 1000.0, 800.0]);
    }
}
