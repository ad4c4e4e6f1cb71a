//! Object type registry
//!
//! Registering a type stores its blueprint, selects its factory from the
//! catalog and prepares an empty live list (plus a recycle pool when the
//! factory supports recycling).

use std::rc::Rc;

use log::{debug, warn};

use super::InstanceContainer;
use crate::object::{ObjectBlueprint, ObjectFactory};

impl InstanceContainer {
    /// Register an object type so instances of it can be created.
    ///
    /// Registering a name twice replaces the blueprint and factory but keeps
    /// the live instances of the type.
    pub fn register_object(&mut self, blueprint: &ObjectBlueprint) {
        let name = blueprint.name.clone();
        if self.objects.contains_key(&name) {
            warn!("Object type \"{name}\" is already registered, replacing its blueprint.");
        }

        let factory = self.catalog.object_factory(&blueprint.kind);
        if factory.supports_recycling() {
            self.recycle_pools.entry(name.clone()).or_default();
        } else {
            self.recycle_pools.remove(&name);
        }
        self.instances.entry(name.clone()).or_default();
        self.factories.insert(name.clone(), factory);
        self.objects.insert(name.clone(), blueprint.clone());
        debug!("Registered object type \"{name}\" (kind \"{}\")", blueprint.kind);
    }

    /// Replace the blueprint of a registered type.
    ///
    /// Live instances are not modified. Unknown names are ignored.
    pub fn update_object(&mut self, blueprint: &ObjectBlueprint) {
        match self.objects.get_mut(&blueprint.name) {
            Some(existing) => existing.clone_from(blueprint),
            None => warn!(
                "Tried to update object type \"{}\" which is not registered.",
                blueprint.name
            ),
        }
    }

    /// Unregister an object type, deleting all its instances and its pool.
    ///
    /// Each instance is removed from the live list one by one, which is
    /// quadratic in the number of instances. This is only used by hot-reload.
    pub fn unregister_object(&mut self, name: &str) {
        let keys = self.instances.get(name).cloned().unwrap_or_default();
        for key in keys {
            self.mark_object_for_deletion(key);
        }
        self.cache_or_clear_removed_instances();

        self.objects.remove(name);
        self.factories.remove(name);
        self.instances.remove(name);
        self.recycle_pools.remove(name);
        debug!("Unregistered object type \"{name}\"");
    }

    /// Check if a type is fully registered
    pub fn is_object_registered(&self, name: &str) -> bool {
        self.objects.contains_key(name)
            && self.instances.contains_key(name)
            && self.factories.contains_key(name)
    }

    /// Blueprint of a registered type
    pub fn object_blueprint(&self, name: &str) -> Option<&ObjectBlueprint> {
        self.objects.get(name)
    }

    /// Names of every registered type
    pub fn registered_object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Number of instances waiting in the recycle pool of a type
    pub fn recycle_pool_len(&self, name: &str) -> usize {
        self.recycle_pools.get(name).map_or(0, Vec::len)
    }

    /// Check if a type recycles its destroyed instances
    pub fn has_recycle_pool(&self, name: &str) -> bool {
        self.recycle_pools.contains_key(name)
    }

    pub(super) fn factory_of(&self, name: &str) -> Option<Rc<dyn ObjectFactory>> {
        self.factories.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::object::VariableValue;

    #[test]
    fn test_register_object() {
        let log = new_log();
        let container = container_with_coin(&log);
        assert!(container.is_object_registered("Coin"));
        assert!(container.has_recycle_pool("Coin"));
        assert!(container.get_instances_of("Coin").is_empty());
        assert!(!container.is_object_registered("Missing"));
    }

    #[test]
    fn test_non_recyclable_type_has_no_pool() {
        let log = new_log();
        let mut container = InstanceContainer::new(catalog(&log));
        container.register_object(&ObjectBlueprint::new("Label", "Text"));
        assert!(container.is_object_registered("Label"));
        assert!(!container.has_recycle_pool("Label"));
    }

    #[test]
    fn test_register_twice_keeps_instances() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        let key = container.create_object("Coin").unwrap();

        container.register_object(&coin_blueprint().with_variable("bonus", VariableValue::Number(2.0)));
        assert_eq!(container.get_instances_of("Coin"), &[key]);
        assert_eq!(container.object_blueprint("Coin").unwrap().variables.len(), 2);
    }

    #[test]
    fn test_update_object_affects_new_instances_only() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        let first = container.create_object("Coin").unwrap();

        let updated = ObjectBlueprint::new("Coin", "Sprite")
            .with_variable("value", VariableValue::Number(5.0));
        container.update_object(&updated);
        let second = container.create_object("Coin").unwrap();

        let value = |key| container.get(key).unwrap().state().variables().number("value");
        assert_eq!(value(first), 1.0);
        assert_eq!(value(second), 5.0);

        container.update_object(&ObjectBlueprint::new("Ghost", "Sprite"));
        assert!(!container.is_object_registered("Ghost"));
    }

    #[test]
    fn test_unregister_object() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        let keys: Vec<_> = (0..3).filter_map(|_| container.create_object("Coin")).collect();

        container.unregister_object("Coin");
        assert!(!container.is_object_registered("Coin"));
        assert!(!container.has_recycle_pool("Coin"));
        assert!(keys.iter().all(|key| container.get(*key).is_none()));
        assert_eq!(container.get_instances_count_on_scene("Coin"), 0);
        assert!(container.create_object("Coin").is_none());
    }
}
