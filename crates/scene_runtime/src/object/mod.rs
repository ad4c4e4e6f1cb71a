//! Runtime objects
//!
//! A [`RuntimeObject`] is one live occurrence of an object type. It is made of:
//! - an [`ObjectState`]: the data every object has (identity, transform,
//!   layer, variables, forces, timers)
//! - an [`ObjectKind`]: the type-specific part, built by the type's factory
//! - its behaviors, stepped by the container each frame

pub mod data;
pub mod variables;
pub mod force;
pub mod timer;
pub mod behavior;
pub mod kind;
pub mod catalog;

pub use behavior::{Behavior, BehaviorFactory};
pub use catalog::TypeCatalog;
pub use data::{
    BehaviorData, EffectData, InstanceData, LayerData, ObjectBlueprint, SceneData,
    VariableData, VariableValue,
};
pub use force::Force;
pub use kind::{EmptyObject, EmptyObjectFactory, ObjectFactory, ObjectKind};
pub use timer::Timer;
pub use variables::VariablesContainer;

use std::collections::HashMap;

use crate::foundation::math::{Aabb, Vec2};
use behavior::BehaviorSlot;

/// Data shared by every object, whatever its kind
#[derive(Debug, Clone)]
pub struct ObjectState {
    id: u64,
    name: String,
    x: f32,
    y: f32,
    z: f32,
    angle: f32,
    rotation_x: f32,
    rotation_y: f32,
    z_order: i32,
    layer: String,
    hidden: bool,
    persistent_uuid: Option<String>,
    variables: VariablesContainer,
    forces: Vec<Force>,
    timers: HashMap<String, Timer>,
    living: bool,
}

impl ObjectState {
    /// Create the state of a new instance of a blueprint
    pub fn new(id: u64, blueprint: &ObjectBlueprint) -> Self {
        Self {
            id,
            name: blueprint.name.clone(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            angle: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            z_order: 0,
            layer: String::new(),
            hidden: false,
            persistent_uuid: None,
            variables: VariablesContainer::new(&blueprint.variables),
            forces: Vec::new(),
            timers: HashMap::new(),
            living: true,
        }
    }

    /// Reset to the state of a new instance, keeping allocations where possible
    pub(crate) fn reset(&mut self, id: u64, blueprint: &ObjectBlueprint) {
        self.id = id;
        self.x = 0.0;
        self.y = 0.0;
        self.z = 0.0;
        self.angle = 0.0;
        self.rotation_x = 0.0;
        self.rotation_y = 0.0;
        self.z_order = 0;
        self.layer.clear();
        self.hidden = false;
        self.persistent_uuid = None;
        self.variables.init_from(&blueprint.variables, false);
        self.forces.clear();
        self.timers.clear();
        self.living = true;
    }

    //--- Identity ---------------------------------------------------------

    /// Unique identifier of the instance in its container
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Object type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier used to match instances during hot-reload
    pub fn persistent_uuid(&self) -> Option<&str> {
        self.persistent_uuid.as_deref()
    }

    /// Set the identifier used to match instances during hot-reload
    pub fn set_persistent_uuid(&mut self, uuid: Option<String>) {
        self.persistent_uuid = uuid;
    }

    /// False once the instance was marked for deletion
    pub fn is_living(&self) -> bool {
        self.living
    }

    pub(crate) fn set_living(&mut self, living: bool) {
        self.living = living;
    }

    //--- Transform --------------------------------------------------------

    /// Horizontal position
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Set the horizontal position
    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    /// Vertical position
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Set the vertical position
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Set both coordinates
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Depth (3D objects)
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Set the depth (3D objects)
    pub fn set_z(&mut self, z: f32) {
        self.z = z;
    }

    /// Angle in degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the angle in degrees
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
    }

    /// Rotation around the X axis in degrees (3D objects)
    pub fn rotation_x(&self) -> f32 {
        self.rotation_x
    }

    /// Set the rotation around the X axis (3D objects)
    pub fn set_rotation_x(&mut self, angle: f32) {
        self.rotation_x = angle;
    }

    /// Rotation around the Y axis in degrees (3D objects)
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    /// Set the rotation around the Y axis (3D objects)
    pub fn set_rotation_y(&mut self, angle: f32) {
        self.rotation_y = angle;
    }

    /// Distance to a position
    pub fn distance_to_position(&self, x: f32, y: f32) -> f32 {
        (Vec2::new(x, y) - Vec2::new(self.x, self.y)).norm()
    }

    //--- Layer and display ------------------------------------------------

    /// Z order on the layer
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Set the Z order on the layer
    pub fn set_z_order(&mut self, z_order: i32) {
        self.z_order = z_order;
    }

    /// Layer name
    pub fn layer(&self) -> &str {
        &self.layer
    }

    /// Move the instance to another layer
    pub fn set_layer(&mut self, layer: &str) {
        if self.layer != layer {
            self.layer.clear();
            self.layer.push_str(layer);
        }
    }

    /// Check if the instance is on a layer
    pub fn is_on_layer(&self, layer: &str) -> bool {
        self.layer == layer
    }

    /// Hide or show the instance
    pub fn hide(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Check if the instance is hidden
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    //--- Variables --------------------------------------------------------

    /// Variables of the instance
    pub fn variables(&self) -> &VariablesContainer {
        &self.variables
    }

    /// Variables of the instance, mutably
    pub fn variables_mut(&mut self) -> &mut VariablesContainer {
        &mut self.variables
    }

    //--- Forces -----------------------------------------------------------

    /// Add a force
    pub fn add_force(&mut self, x: f32, y: f32, multiplier: f32) {
        self.forces.push(Force::new(x, y, multiplier));
    }

    /// Add a force from an angle in degrees and a length
    pub fn add_polar_force(&mut self, angle: f32, length: f32, multiplier: f32) {
        self.forces.push(Force::polar(angle, length, multiplier));
    }

    /// Add a force moving the instance toward a position
    pub fn add_force_toward_position(&mut self, x: f32, y: f32, length: f32, multiplier: f32) {
        let angle = (y - self.y).atan2(x - self.x).to_degrees();
        self.add_polar_force(angle, length, multiplier);
    }

    /// Remove every force
    pub fn clear_forces(&mut self) {
        self.forces.clear();
    }

    /// Check if no force is applied
    pub fn has_no_forces(&self) -> bool {
        self.forces.is_empty()
    }

    /// Forces currently applied
    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    /// Sum of every force applied
    pub fn average_force(&self) -> Vec2 {
        self.forces.iter().fold(Vec2::zeros(), |sum, force| sum + force.vector())
    }

    /// Check if the angle of the average force is within a tolerance of `angle`
    pub fn average_force_angle_is(&self, angle: f32, tolerance_in_degrees: f32) -> bool {
        let average = self.average_force();
        let mut average_angle = average.y.atan2(average.x).to_degrees();
        if average_angle < 0.0 {
            average_angle += 360.0;
        }
        (angle - average_angle).abs() < tolerance_in_degrees / 2.0
    }

    /// Decay forces and discard finished ones
    pub fn update_forces(&mut self, elapsed_seconds: f32) {
        self.forces.retain_mut(|force| force.decay(elapsed_seconds));
    }

    /// Move the instance by its average force over the elapsed time
    pub(crate) fn apply_average_force(&mut self, elapsed_seconds: f32) {
        let average = self.average_force();
        self.x += average.x * elapsed_seconds;
        self.y += average.y * elapsed_seconds;
    }

    //--- Timers -----------------------------------------------------------

    /// Advance every timer
    pub fn update_timers(&mut self, elapsed_time: f64) {
        for timer in self.timers.values_mut() {
            timer.update_time(elapsed_time);
        }
    }

    /// Check if a timer reached a duration. A missing timer is created.
    pub fn timer_elapsed_time(&mut self, timer_name: &str, time_in_seconds: f64) -> bool {
        if !self.timers.contains_key(timer_name) {
            self.timers.insert(timer_name.to_string(), Timer::new(timer_name));
            return false;
        }
        self.get_timer_elapsed_time_in_seconds(timer_name) >= time_in_seconds
    }

    /// Check if a timer exists and is paused
    pub fn timer_paused(&self, timer_name: &str) -> bool {
        self.timers.get(timer_name).is_some_and(Timer::is_paused)
    }

    fn timer_entry(&mut self, timer_name: &str) -> &mut Timer {
        self.timers
            .entry(timer_name.to_string())
            .or_insert_with(|| Timer::new(timer_name))
    }

    /// Reset a timer, creating it if missing
    pub fn reset_timer(&mut self, timer_name: &str) {
        self.timer_entry(timer_name).reset();
    }

    /// Pause a timer, creating it if missing
    pub fn pause_timer(&mut self, timer_name: &str) {
        self.timer_entry(timer_name).set_paused(true);
    }

    /// Resume a timer, creating it if missing
    pub fn unpause_timer(&mut self, timer_name: &str) {
        self.timer_entry(timer_name).set_paused(false);
    }

    /// Remove a timer
    pub fn remove_timer(&mut self, timer_name: &str) {
        self.timers.remove(timer_name);
    }

    /// Time of a timer in seconds, 0 if missing
    pub fn get_timer_elapsed_time_in_seconds(&self, timer_name: &str) -> f64 {
        self.timers.get(timer_name).map_or(0.0, |timer| timer.time() / 1000.0)
    }
}

/// One live instance of an object type
pub struct RuntimeObject {
    state: ObjectState,
    kind: Box<dyn ObjectKind>,
    behaviors: Vec<BehaviorSlot>,
}

impl RuntimeObject {
    /// Create an instance without behaviors.
    ///
    /// `id` should come from the owning container's
    /// [`create_new_unique_id`](crate::container::InstanceContainer::create_new_unique_id).
    pub fn new(id: u64, blueprint: &ObjectBlueprint, kind: Box<dyn ObjectKind>) -> Self {
        Self {
            state: ObjectState::new(id, blueprint),
            kind,
            behaviors: Vec::new(),
        }
    }

    /// Build a complete instance: kind from the factory, behaviors from the catalog
    pub(crate) fn construct(
        id: u64,
        blueprint: &ObjectBlueprint,
        factory: &dyn ObjectFactory,
        catalog: &TypeCatalog,
    ) -> Self {
        let mut object = Self::new(id, blueprint, factory.create(blueprint));
        object.behaviors = catalog.build_behaviors(blueprint);
        object.on_created();
        object
    }

    /// Make a recycled instance behave as a newly constructed one
    pub(crate) fn reinitialize(&mut self, id: u64, blueprint: &ObjectBlueprint, catalog: &TypeCatalog) {
        self.state.reset(id, blueprint);
        self.kind.reinitialize(blueprint);
        self.behaviors = catalog.build_behaviors(blueprint);
        self.on_created();
    }

    fn on_created(&mut self) {
        for behavior in self.behaviors.iter_mut().filter_map(|slot| slot.behavior.as_mut()) {
            behavior.on_created();
        }
    }

    /// Unique identifier of the instance in its container
    pub fn id(&self) -> u64 {
        self.state.id
    }

    /// Object type name
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Layer name
    pub fn layer(&self) -> &str {
        &self.state.layer
    }

    /// Common data of the instance
    pub fn state(&self) -> &ObjectState {
        &self.state
    }

    /// Common data of the instance, mutably
    pub fn state_mut(&mut self) -> &mut ObjectState {
        &mut self.state
    }

    /// Kind-specific part of the instance
    pub fn kind(&self) -> &dyn ObjectKind {
        self.kind.as_ref()
    }

    /// Kind-specific part of the instance, mutably
    pub fn kind_mut(&mut self) -> &mut dyn ObjectKind {
        self.kind.as_mut()
    }

    /// Downcast the kind-specific part
    pub fn kind_as<T: 'static>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref()
    }

    /// Downcast the kind-specific part mutably
    pub fn kind_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.kind.as_any_mut().downcast_mut()
    }

    //--- Behaviors --------------------------------------------------------

    /// Names of the behaviors, in step order
    pub fn behavior_names(&self) -> impl Iterator<Item = &str> {
        self.behaviors.iter().map(|slot| slot.name.as_str())
    }

    /// Get a behavior by name.
    ///
    /// Returns `None` for a behavior that is currently running its step.
    pub fn get_behavior(&self, name: &str) -> Option<&dyn Behavior> {
        let slot = self.behaviors.iter().find(|slot| slot.name == name)?;
        let behavior = slot.behavior.as_ref()?;
        Some(behavior.as_ref())
    }

    /// Get a behavior by name, mutably.
    ///
    /// Returns `None` for a behavior that is currently running its step.
    pub fn get_behavior_mut(&mut self, name: &str) -> Option<&mut dyn Behavior> {
        let slot = self.behaviors.iter_mut().find(|slot| slot.name == name)?;
        let behavior = slot.behavior.as_mut()?;
        Some(behavior.as_mut())
    }

    /// Check if the instance has a behavior
    pub fn has_behavior(&self, name: &str) -> bool {
        self.behaviors.iter().any(|slot| slot.name == name)
    }

    /// Activate or deactivate a behavior. Deactivated behaviors are not stepped.
    pub fn activate_behavior(&mut self, name: &str, enable: bool) {
        if let Some(slot) = self.behaviors.iter_mut().find(|slot| slot.name == name) {
            if slot.activated != enable {
                slot.activated = enable;
                if let Some(behavior) = slot.behavior.as_mut() {
                    behavior.on_activation_changed(enable);
                }
            }
        }
    }

    /// Check if a behavior exists and is activated
    pub fn behavior_activated(&self, name: &str) -> bool {
        self.behaviors
            .iter()
            .any(|slot| slot.name == name && slot.activated)
    }

    /// Remove a behavior, notifying it. Returns false if it does not exist.
    ///
    /// A behavior removed while running its step is notified once its step
    /// returns.
    pub fn remove_behavior(&mut self, name: &str) -> bool {
        let Some(index) = self.behaviors.iter().position(|slot| slot.name == name) else {
            return false;
        };
        let slot = self.behaviors.remove(index);
        if let Some(mut behavior) = slot.behavior {
            behavior.on_destroy();
        }
        true
    }

    /// Create and attach a behavior. Returns false if its type is unknown.
    pub fn add_new_behavior(&mut self, data: &BehaviorData, catalog: &TypeCatalog) -> bool {
        let Some(mut slot) = catalog.build_behavior(data) else {
            return false;
        };
        if let Some(behavior) = slot.behavior.as_mut() {
            behavior.on_created();
        }
        self.behaviors.push(slot);
        true
    }

    pub(crate) fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Take the behavior at `index` out of its slot for a step. Deactivated
    /// behaviors stay in place.
    pub(crate) fn take_activated_behavior(&mut self, index: usize) -> Option<(String, Box<dyn Behavior>)> {
        let slot = self.behaviors.get_mut(index).filter(|slot| slot.activated)?;
        let behavior = slot.behavior.take()?;
        Some((slot.name.clone(), behavior))
    }

    /// Put a stepped behavior back in its slot, returning the slot index.
    /// The behavior is handed back if its slot was removed meanwhile.
    pub(crate) fn restore_behavior(
        &mut self,
        name: &str,
        behavior: Box<dyn Behavior>,
    ) -> Result<usize, Box<dyn Behavior>> {
        let Some(index) = self
            .behaviors
            .iter()
            .position(|slot| slot.name == name && slot.is_stepping())
        else {
            return Err(behavior);
        };
        self.behaviors[index].behavior = Some(behavior);
        Ok(index)
    }

    //--- Container hooks --------------------------------------------------

    pub(crate) fn update(&mut self, elapsed_time: f64) {
        self.kind.update(&mut self.state, elapsed_time);
    }

    pub(crate) fn update_pre_render(&mut self) {
        self.kind.update_pre_render(&mut self.state);
    }

    pub(crate) fn extra_initialization_from_initial_instance(&mut self, data: &InstanceData) {
        self.kind
            .extra_initialization_from_initial_instance(&mut self.state, data);
    }

    pub(crate) fn on_deleted_from_container(&mut self) {
        self.state.living = false;
        self.kind.on_deleted_from_container(&self.state);
        for behavior in self.behaviors.iter_mut().filter_map(|slot| slot.behavior.as_mut()) {
            behavior.on_destroy();
        }
    }

    pub(crate) fn on_destroyed(&mut self) {
        self.kind.on_destroyed();
    }

    /// Whether the instance has a depth and 3D rotations
    pub fn is_3d(&self) -> bool {
        self.kind.is_3d()
    }

    /// Box used for culling
    pub fn visibility_aabb(&self) -> Option<Aabb> {
        self.kind.visibility_aabb(&self.state)
    }
}

impl std::fmt::Debug for RuntimeObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeObject")
            .field("state", &self.state)
            .field("behaviors", &self.behaviors)
            .finish_non_exhaustive()
    }
}
