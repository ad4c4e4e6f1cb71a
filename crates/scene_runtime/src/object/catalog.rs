//! Catalog of object and behavior constructors
//!
//! The catalog maps a kind name (`"Sprite"`, `"Platformer"`...) to the factory
//! building it. It is shared by every container of a game through an `Rc`, so
//! each container can select and cache the factory of a type once, at
//! registration.

use std::collections::HashMap;
use std::rc::Rc;

use log::warn;

use super::behavior::{BehaviorFactory, BehaviorSlot};
use super::data::{BehaviorData, ObjectBlueprint};
use super::kind::{EmptyObjectFactory, ObjectFactory};

/// Object and behavior factories, by kind name
#[derive(Default)]
pub struct TypeCatalog {
    objects: HashMap<String, Rc<dyn ObjectFactory>>,
    behaviors: HashMap<String, Rc<dyn BehaviorFactory>>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory of an object kind
    pub fn register_object_kind(&mut self, kind: impl Into<String>, factory: impl ObjectFactory + 'static) {
        self.objects.insert(kind.into(), Rc::new(factory));
    }

    /// Register the factory of a behavior type
    pub fn register_behavior_kind(&mut self, kind: impl Into<String>, factory: impl BehaviorFactory + 'static) {
        self.behaviors.insert(kind.into(), Rc::new(factory));
    }

    /// Add an object kind (builder pattern)
    pub fn with_object_kind(mut self, kind: impl Into<String>, factory: impl ObjectFactory + 'static) -> Self {
        self.register_object_kind(kind, factory);
        self
    }

    /// Add a behavior type (builder pattern)
    pub fn with_behavior_kind(mut self, kind: impl Into<String>, factory: impl BehaviorFactory + 'static) -> Self {
        self.register_behavior_kind(kind, factory);
        self
    }

    /// Check if an object kind is known
    pub fn has_object_kind(&self, kind: &str) -> bool {
        self.objects.contains_key(kind)
    }

    /// Get the factory of an object kind.
    ///
    /// Unknown kinds fall back to [`EmptyObjectFactory`] so a project referring
    /// to a missing extension still runs.
    pub fn object_factory(&self, kind: &str) -> Rc<dyn ObjectFactory> {
        if let Some(factory) = self.objects.get(kind) {
            return Rc::clone(factory);
        }
        warn!("Object kind \"{kind}\" has no registered factory, using an empty object instead.");
        Rc::new(EmptyObjectFactory)
    }

    /// Get the factory of a behavior type
    pub fn behavior_factory(&self, kind: &str) -> Option<Rc<dyn BehaviorFactory>> {
        self.behaviors.get(kind).cloned()
    }

    /// Build one behavior slot, or `None` if its type is unknown
    pub(crate) fn build_behavior(&self, data: &BehaviorData) -> Option<BehaviorSlot> {
        let Some(factory) = self.behaviors.get(&data.kind) else {
            warn!(
                "Behavior type \"{}\" (behavior \"{}\") has no registered factory, skipping it.",
                data.kind, data.name
            );
            return None;
        };
        Some(BehaviorSlot::new(data.name.clone(), factory.create(data)))
    }

    /// Build every behavior of a blueprint, in declaration order
    pub(crate) fn build_behaviors(&self, blueprint: &ObjectBlueprint) -> Vec<BehaviorSlot> {
        blueprint
            .behaviors
            .iter()
            .filter_map(|data| self.build_behavior(data))
            .collect()
    }
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("objects", &self.objects.keys().collect::<Vec<_>>())
            .field("behaviors", &self.behaviors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::behavior::Behavior;

    struct Idle;

    impl Behavior for Idle {}

    struct IdleFactory;

    impl BehaviorFactory for IdleFactory {
        fn create(&self, _data: &BehaviorData) -> Box<dyn Behavior> {
            Box::new(Idle)
        }
    }

    #[test]
    fn test_unknown_object_kind_falls_back() {
        let catalog = TypeCatalog::new();
        let factory = catalog.object_factory("Missing");
        assert!(!factory.supports_recycling());
        assert!(!catalog.has_object_kind("Missing"));
    }

    #[test]
    fn test_unknown_behaviors_are_skipped() {
        let catalog = TypeCatalog::new().with_behavior_kind("Idle", IdleFactory);
        let blueprint = ObjectBlueprint::new("Coin", "Sprite")
            .with_behavior(BehaviorData::new("Wait", "Idle"))
            .with_behavior(BehaviorData::new("Jump", "Platformer"));

        let slots = catalog.build_behaviors(&blueprint);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].name, "Wait");
        assert!(slots[0].activated);
    }
}
