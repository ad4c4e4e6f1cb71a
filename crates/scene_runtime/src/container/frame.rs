//! Per-frame update phases
//!
//! Every phase iterates a snapshot of the live instances, so instances can be
//! created or deleted while it runs. Instances created during a phase are
//! first updated in the next one; instances deleted during a phase are not
//! visited anymore.

use std::collections::HashMap;

use super::layer::{RuntimeLayer, BASE_LAYER};
use super::InstanceContainer;
use crate::foundation::collections::InstanceKey;
use crate::object::Behavior;
use crate::scene::SceneDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BehaviorStep {
    PreEvents,
    PostEvents,
}

/// Elapsed time of objects on a layer, unknown layers using the base layer
fn layer_elapsed_time(layers: &HashMap<String, RuntimeLayer>, layer: &str, scene_elapsed: f64) -> f64 {
    layers
        .get(layer)
        .or_else(|| layers.get(BASE_LAYER))
        .map_or(scene_elapsed, |layer| layer.elapsed_time(scene_elapsed))
}

#[allow(clippy::cast_possible_truncation)]
fn to_seconds(elapsed_time_ms: f64) -> f32 {
    (elapsed_time_ms / 1000.0) as f32
}

impl InstanceContainer {
    /// Update instances before the events of the frame.
    ///
    /// Each instance is moved by its forces, updated by its kind, has its
    /// forces decayed and its timers advanced, then its behaviors run their
    /// pre-events step. Instances deleted meanwhile are flushed at the end.
    pub fn update_objects_pre_events(&mut self, driver: &dyn SceneDriver) {
        let scene_elapsed = driver.elapsed_time_ms();
        let snapshot = self.take_phase_snapshot();
        for &key in &snapshot {
            let Some(object) = self.arena.get_mut(key) else {
                continue;
            };
            if !object.state().is_living() {
                continue;
            }

            let elapsed = layer_elapsed_time(&self.layers, object.layer(), scene_elapsed);
            if object.state().has_no_forces() {
                object.update(elapsed);
            } else {
                let elapsed_seconds = to_seconds(elapsed);
                object.state_mut().apply_average_force(elapsed_seconds);
                object.update(elapsed);
                object.state_mut().update_forces(elapsed_seconds);
            }
            object.state_mut().update_timers(elapsed);

            self.step_behaviors(key, BehaviorStep::PreEvents);
        }
        self.restore_phase_snapshot(snapshot);
        self.cache_or_clear_removed_instances();
    }

    /// Update instances after the events of the frame: behaviors run their
    /// post-events step, with deleted instances flushed before and after.
    pub fn update_objects_post_events(&mut self) {
        self.cache_or_clear_removed_instances();
        let snapshot = self.take_phase_snapshot();
        for &key in &snapshot {
            if self.arena.get(key).is_some_and(|object| object.state().is_living()) {
                self.step_behaviors(key, BehaviorStep::PostEvents);
            }
        }
        self.restore_phase_snapshot(snapshot);
        self.cache_or_clear_removed_instances();
    }

    /// Apply forces only: move every instance by its average force and decay
    /// its forces
    pub fn update_objects_forces(&mut self, driver: &dyn SceneDriver) {
        let scene_elapsed = driver.elapsed_time_ms();
        for keys in self.instances.values() {
            for &key in keys {
                let Some(object) = self.arena.get_mut(key) else {
                    continue;
                };
                if object.state().has_no_forces() {
                    continue;
                }
                let elapsed = layer_elapsed_time(&self.layers, object.layer(), scene_elapsed);
                let state = object.state_mut();
                state.apply_average_force(to_seconds(elapsed));
                state.update_forces(to_seconds(elapsed));
            }
        }
    }

    /// Let the renderer refresh the effects of every layer, in render order
    pub fn update_layers_pre_render(&mut self) {
        for name in &self.ordered_layers {
            if let Some(layer) = self.layers.get(name) {
                self.renderer.update_layer_pre_render(layer);
            }
        }
    }

    /// Prepare instances for rendering.
    ///
    /// An instance is visible if it is not hidden and, once camera coordinates
    /// were computed, its box overlaps the area seen by the camera of its
    /// layer. 3D instances are not culled. Effects are refreshed for visible
    /// instances only, then every instance gets its pre-render update.
    pub fn update_objects_pre_render(&mut self) {
        let snapshot = self.take_phase_snapshot();
        for &key in &snapshot {
            let Some(object) = self.arena.get_mut(key) else {
                continue;
            };
            if !object.state().is_living() {
                continue;
            }

            if object.kind().has_renderer_object() {
                let visible = !object.state().is_hidden()
                    && (object.is_3d()
                        || self
                            .layers_camera_coordinates
                            .get(object.layer())
                            .zip(object.visibility_aabb())
                            .map_or(true, |(rect, aabb)| aabb.overlaps_rect(rect)));
                self.renderer.set_instance_visible(object, visible);
                if visible {
                    self.renderer.update_instance_effects(object);
                }
            }
            object.update_pre_render();
        }
        self.restore_phase_snapshot(snapshot);
    }

    /// Run one step of the activated behaviors of an instance.
    ///
    /// Each behavior is taken out of its slot while it runs, so it can borrow
    /// the whole container while its siblings stay reachable on the owner.
    /// Once a behavior deletes its owner, the remaining behaviors of that
    /// owner are not stepped for the rest of the phase.
    fn step_behaviors(&mut self, key: InstanceKey, step: BehaviorStep) {
        let mut index = 0;
        while let Some(object) = self.arena.get_mut(key) {
            if !object.state().is_living() || index >= object.behavior_count() {
                break;
            }
            let Some((name, mut behavior)) = object.take_activated_behavior(index) else {
                index += 1;
                continue;
            };

            match step {
                BehaviorStep::PreEvents => behavior.step_pre_events(self, key),
                BehaviorStep::PostEvents => behavior.step_post_events(self, key),
            }
            // Siblings removed during the step shift the slots
            index = self.return_behavior(key, &name, behavior).map_or(index, |slot| slot + 1);
        }
    }

    /// Put a behavior back after its step, notifying it if its owner was
    /// deleted or the behavior removed meanwhile
    fn return_behavior(&mut self, key: InstanceKey, name: &str, mut behavior: Box<dyn Behavior>) -> Option<usize> {
        let owner_living = self.arena.get(key).is_some_and(|object| object.state().is_living());
        if !owner_living {
            // Deletion only notified the behaviors left in their slots
            behavior.on_destroy();
        }
        let object = self.arena.get_mut(key)?;
        match object.restore_behavior(name, behavior) {
            Ok(slot) => Some(slot),
            Err(mut removed) => {
                if owner_living {
                    removed.on_destroy();
                }
                None
            }
        }
    }
}
