//! Serializable project data
//!
//! Blueprints, placements and layer descriptions as they come from the
//! project file. These types are plain data: the container reads them when
//! registering types and instantiating scenes, and never mutates them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Config;

/// Value stored in a variable or a content property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// Boolean value
    Boolean(bool),
    /// Numeric value
    Number(f64),
    /// Text value
    String(String),
    /// Ordered children
    Array(Vec<VariableValue>),
    /// Named children
    Structure(BTreeMap<String, VariableValue>),
}

impl Default for VariableValue {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl VariableValue {
    /// Read the value as a number, converting booleans and numeric strings
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Boolean(value) => f64::from(u8::from(*value)),
            Self::String(text) => text.trim().parse().unwrap_or(0.0),
            Self::Array(_) | Self::Structure(_) => 0.0,
        }
    }

    /// Read the value as text
    pub fn as_string(&self) -> String {
        match self {
            Self::String(text) => text.clone(),
            Self::Number(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
            Self::Array(_) | Self::Structure(_) => String::new(),
        }
    }

    /// Read the value as a boolean
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Boolean(value) => *value,
            Self::Number(value) => *value != 0.0,
            Self::String(text) => !text.is_empty(),
            Self::Array(children) => !children.is_empty(),
            Self::Structure(children) => !children.is_empty(),
        }
    }
}

/// A named initial variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableData {
    /// Variable name
    pub name: String,
    /// Initial value
    #[serde(default)]
    pub value: VariableValue,
}

impl VariableData {
    /// Create a variable description
    pub fn new(name: impl Into<String>, value: VariableValue) -> Self {
        Self { name: name.into(), value }
    }
}

/// Description of a behavior attached to an object type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorData {
    /// Name of the behavior on the object
    pub name: String,
    /// Behavior type, used to find its factory
    pub kind: String,
    /// Behavior-specific properties
    pub properties: BTreeMap<String, VariableValue>,
}

impl BehaviorData {
    /// Create a behavior description without properties
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            properties: BTreeMap::new(),
        }
    }
}

/// Blueprint of an object type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectBlueprint {
    /// Object type name, unique in a container
    pub name: String,
    /// Object kind, used to find the factory building instances
    pub kind: String,
    /// Initial variables of every instance
    pub variables: Vec<VariableData>,
    /// Behaviors attached to every instance
    pub behaviors: Vec<BehaviorData>,
    /// Kind-specific configuration
    pub content: BTreeMap<String, VariableValue>,
}

impl ObjectBlueprint {
    /// Create an empty blueprint
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Add an initial variable (builder pattern)
    pub fn with_variable(mut self, name: impl Into<String>, value: VariableValue) -> Self {
        self.variables.push(VariableData::new(name, value));
        self
    }

    /// Add a behavior (builder pattern)
    pub fn with_behavior(mut self, behavior: BehaviorData) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Add a content property (builder pattern)
    pub fn with_content(mut self, key: impl Into<String>, value: VariableValue) -> Self {
        self.content.insert(key.into(), value);
        self
    }
}

/// Placement of an instance in a scene or external layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceData {
    /// Object type name
    pub name: String,
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
    /// Depth, for 3D objects
    pub z: Option<f32>,
    /// Angle in degrees
    pub angle: f32,
    /// Rotation around the X axis, for 3D objects
    pub rotation_x: Option<f32>,
    /// Rotation around the Y axis, for 3D objects
    pub rotation_y: Option<f32>,
    /// Z order on the layer
    pub z_order: i32,
    /// Layer name
    pub layer: String,
    /// Variables overriding the blueprint ones
    pub initial_variables: Vec<VariableData>,
    /// Identifier used to match instances during hot-reload
    pub persistent_uuid: Option<String>,
    /// Kind-specific placement properties
    pub properties: BTreeMap<String, VariableValue>,
}

impl InstanceData {
    /// Create a placement at a position on the base layer
    pub fn new(name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            ..Self::default()
        }
    }
}

/// Effect attached to a layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectData {
    /// Effect name
    pub name: String,
    /// Effect type, interpreted by the renderer
    pub effect_type: String,
    /// Numeric parameters
    pub parameters: BTreeMap<String, f64>,
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

/// Description of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    /// Layer name, the empty string is the base layer
    #[serde(default)]
    pub name: String,
    /// Whether the layer is shown
    #[serde(default = "default_true")]
    pub visibility: bool,
    /// Time scale applied to objects on the layer
    #[serde(default = "default_one")]
    pub time_scale: f64,
    /// Effects of the layer
    #[serde(default)]
    pub effects: Vec<EffectData>,
}

impl LayerData {
    /// Create a visible layer without effects
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: true,
            time_scale: 1.0,
            effects: Vec::new(),
        }
    }
}

impl Default for LayerData {
    fn default() -> Self {
        Self::new("")
    }
}

/// Content of a scene
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneData {
    /// Scene name
    pub name: String,
    /// Layers, in render order
    pub layers: Vec<LayerData>,
    /// Object types available in the scene
    pub objects: Vec<ObjectBlueprint>,
    /// Initial instances
    pub instances: Vec<InstanceData>,
}

impl Config for SceneData {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_conversions() {
        assert_eq!(VariableValue::String("12.5".into()).as_number(), 12.5);
        assert_eq!(VariableValue::Boolean(true).as_number(), 1.0);
        assert_eq!(VariableValue::Number(3.0).as_string(), "3");
        assert!(!VariableValue::Number(0.0).as_bool());
    }

    #[test]
    fn test_scene_data_from_ron() {
        let source = r#"(
            name: "Level",
            layers: [(name: ""), (name: "HUD", time_scale: 0.5)],
            objects: [(
                name: "Coin",
                kind: "Sprite",
                variables: [(name: "value", value: 1.0)],
            )],
            instances: [(name: "Coin", x: 10.0, y: 20.0, layer: "HUD", z_order: 3)],
        )"#;
        let scene = SceneData::load_from_str("level.ron", source).unwrap();
        assert_eq!(scene.layers.len(), 2);
        assert!(scene.layers[1].visibility);
        assert_eq!(scene.layers[1].time_scale, 0.5);
        assert_eq!(scene.objects[0].variables[0].value, VariableValue::Number(1.0));
        assert_eq!(scene.instances[0].z_order, 3);
        assert_eq!(scene.instances[0].z, None);
    }

    #[test]
    fn test_scene_data_from_toml() {
        let source = r#"
            name = "Level"

            [[objects]]
            name = "Coin"
            kind = "Sprite"
            content = { value = 5.0, label = "gold" }

            [[instances]]
            name = "Coin"
            x = 4.0
            y = 2.0
        "#;
        let scene = SceneData::load_from_str("level.toml", source).unwrap();
        let coin = &scene.objects[0];
        assert_eq!(coin.content["value"], VariableValue::Number(5.0));
        assert_eq!(coin.content["label"], VariableValue::String("gold".into()));
        assert_eq!(scene.instances[0].layer, "");
    }
}
