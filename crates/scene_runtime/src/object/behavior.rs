//! Behavior capability
//!
//! Behaviors are opaque to the container: it only drives their per-frame steps
//! and lifecycle notifications. A behavior gets mutable access to the container
//! and the key of its owner while stepping, so it can move its owner, create
//! instances or delete them. Deletions are deferred, so the owner stays
//! reachable through its key until the next flush.

use crate::container::InstanceContainer;
use crate::foundation::collections::InstanceKey;

use super::data::BehaviorData;

/// Behavior attached to an object instance
pub trait Behavior {
    /// Called once the owner is fully constructed or reinitialized
    fn on_created(&mut self) {}

    /// Step run before the events of the frame
    fn step_pre_events(&mut self, _container: &mut InstanceContainer, _owner: InstanceKey) {}

    /// Step run after the events of the frame
    fn step_post_events(&mut self, _container: &mut InstanceContainer, _owner: InstanceKey) {}

    /// Called when the owner is removed from its container, or when the
    /// behavior itself is removed
    fn on_destroy(&mut self) {}

    /// Called when the behavior is activated or deactivated
    fn on_activation_changed(&mut self, _activated: bool) {}
}

/// Builds behaviors of one behavior type
pub trait BehaviorFactory {
    /// Create a behavior from its description
    fn create(&self, data: &BehaviorData) -> Box<dyn Behavior>;
}

/// A behavior with its name and activation state, as held by an object.
///
/// `behavior` is `None` while the behavior is out of its slot for a step.
pub(crate) struct BehaviorSlot {
    pub(crate) name: String,
    pub(crate) activated: bool,
    pub(crate) behavior: Option<Box<dyn Behavior>>,
}

impl BehaviorSlot {
    pub(crate) fn new(name: impl Into<String>, behavior: Box<dyn Behavior>) -> Self {
        Self {
            name: name.into(),
            activated: true,
            behavior: Some(behavior),
        }
    }

    pub(crate) fn is_stepping(&self) -> bool {
        self.behavior.is_none()
    }
}

impl std::fmt::Debug for BehaviorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorSlot")
            .field("name", &self.name)
            .field("activated", &self.activated)
            .field("stepping", &self.is_stepping())
            .finish_non_exhaustive()
    }
}
