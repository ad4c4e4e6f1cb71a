//! Deferred deletion and recycling
//!
//! `Live -> PendingDeletion -> Recycled | Destroyed`
//!
//! Marking an instance removes it from its live list right away but keeps it
//! in the arena until the next flush, so keys held during the frame stay
//! valid. The flush moves pending instances to the recycle pool of their type
//! while it has room, and drops the others.

use log::trace;

use super::{DeletionListener, InstanceContainer};
use crate::foundation::collections::InstanceKey;
use crate::object::RuntimeObject;

impl InstanceContainer {
    /// Remove an instance from the container.
    ///
    /// The instance is notified, the renderer releases it and deletion
    /// listeners are called. Marking an instance twice, or marking a flushed
    /// instance, does nothing.
    pub fn mark_object_for_deletion(&mut self, key: InstanceKey) {
        let Some(object) = self.arena.get_mut(key) else {
            return;
        };
        if self.removed_instances.contains(&key) {
            return;
        }
        self.removed_instances.push(key);

        if let Some(keys) = self.instances.get_mut(object.name()) {
            if let Some(index) = keys.iter().position(|candidate| *candidate == key) {
                keys.remove(index);
            }
        }
        self.all_instances_up_to_date = false;

        object.on_deleted_from_container();
        self.renderer.remove_instance(object);
        for listener in &mut self.deletion_listeners {
            listener(&*object);
        }
        trace!("Instance #{} of \"{}\" marked for deletion", object.id(), object.name());
    }

    /// Check if an instance is waiting for the next flush
    pub fn is_pending_deletion(&self, key: InstanceKey) -> bool {
        self.removed_instances.contains(&key)
    }

    /// Number of instances waiting for the next flush
    pub fn pending_deletion_count(&self) -> usize {
        self.removed_instances.len()
    }

    /// Register a callback called each time an instance is removed
    pub fn add_deletion_listener(&mut self, listener: impl FnMut(&RuntimeObject) + 'static) {
        let listener: DeletionListener = Box::new(listener);
        self.deletion_listeners.push(listener);
    }

    /// Flush the instances marked for deletion.
    ///
    /// Each instance is finalized, then kept in the recycle pool of its type
    /// if the pool exists and is not full, or dropped.
    pub fn cache_or_clear_removed_instances(&mut self) {
        if self.removed_instances.is_empty() {
            return;
        }
        let capacity = self.config.recycle_pool_capacity;
        let mut removed = std::mem::take(&mut self.removed_instances);
        for key in removed.drain(..) {
            let Some(mut object) = self.arena.remove(key) else {
                continue;
            };
            object.on_destroyed();
            match self.recycle_pools.get_mut(object.name()) {
                Some(pool) if pool.len() < capacity => pool.push(object),
                _ => trace!("Dropping instance #{} of \"{}\"", object.id(), object.name()),
            }
        }
        // Keep the allocation, unless deletions happened during the flush
        if self.removed_instances.is_empty() {
            self.removed_instances = removed;
        }
    }
}
