//! Instance creation and queries

use log::{debug, trace};

use super::InstanceContainer;
use crate::foundation::collections::InstanceKey;
use crate::object::{InstanceData, RuntimeObject};

impl InstanceContainer {
    /// Create an instance of a registered type.
    ///
    /// A destroyed instance waiting in the type's recycle pool is reused when
    /// possible, reinitialized from the current blueprint with a new id.
    /// Returns `None` if the type is not registered.
    pub fn create_object(&mut self, name: &str) -> Option<InstanceKey> {
        let (Some(blueprint), Some(factory)) = (self.objects.get(name), self.factories.get(name))
        else {
            debug!("Cannot create an instance of \"{name}\": type not registered");
            return None;
        };

        self.last_id += 1;
        let id = self.last_id;

        let object = match self.recycle_pools.get_mut(name).and_then(Vec::pop) {
            Some(mut recycled) => {
                recycled.reinitialize(id, blueprint, &self.catalog);
                trace!("Recycled an instance of \"{name}\" as #{id}");
                recycled
            }
            None => RuntimeObject::construct(id, blueprint, &**factory, &self.catalog),
        };

        let key = self.arena.insert(object);
        self.instances.entry(name.to_string()).or_default().push(key);
        self.all_instances_up_to_date = false;
        Some(key)
    }

    /// Add an instance constructed outside the container.
    ///
    /// The live list of its type is created if the type is not registered.
    pub fn add_object(&mut self, object: RuntimeObject) -> InstanceKey {
        let name = object.name().to_string();
        let key = self.arena.insert(object);
        self.instances.entry(name).or_default().push(key);
        self.all_instances_up_to_date = false;
        key
    }

    /// Create an instance at a position on a layer, with the layer's default
    /// Z order
    pub fn create_object_on_layer(
        &mut self,
        name: &str,
        x: f32,
        y: f32,
        layer: &str,
    ) -> Option<InstanceKey> {
        let key = self.create_object(name)?;
        let z_order = self.get_layer(layer).default_z_order();
        if let Some(object) = self.arena.get_mut(key) {
            let state = object.state_mut();
            state.set_position(x, y);
            state.set_layer(layer);
            state.set_z_order(z_order);
        }
        Some(key)
    }

    /// Create instances from placements, offset by a position.
    ///
    /// Placements of unregistered types are skipped. With
    /// `track_by_persistent_uuid`, each instance keeps the UUID of its
    /// placement so it can be matched during hot-reload.
    pub fn create_objects_from(
        &mut self,
        data: &[InstanceData],
        x_offset: f32,
        y_offset: f32,
        z_offset: f32,
        track_by_persistent_uuid: bool,
    ) {
        for instance_data in data {
            let Some(key) = self.create_object(&instance_data.name) else {
                continue;
            };
            let Some(object) = self.arena.get_mut(key) else {
                continue;
            };

            let is_3d = object.is_3d();
            let state = object.state_mut();
            if track_by_persistent_uuid {
                state.set_persistent_uuid(instance_data.persistent_uuid.clone());
            }
            state.set_position(instance_data.x + x_offset, instance_data.y + y_offset);
            state.set_angle(instance_data.angle);
            if is_3d {
                if let Some(z) = instance_data.z {
                    state.set_z(z + z_offset);
                }
                if let Some(rotation_x) = instance_data.rotation_x {
                    state.set_rotation_x(rotation_x);
                }
                if let Some(rotation_y) = instance_data.rotation_y {
                    state.set_rotation_y(rotation_y);
                }
            }
            state.set_z_order(instance_data.z_order);
            state.set_layer(&instance_data.layer);
            state
                .variables_mut()
                .init_from(&instance_data.initial_variables, true);
            object.extra_initialization_from_initial_instance(instance_data);
        }
    }

    /// Live instances of a type. Empty for unknown types.
    pub fn get_instances_of(&self, name: &str) -> &[InstanceKey] {
        self.instances
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Live instances of a type, resolved
    pub fn instances_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a RuntimeObject> + 'a {
        self.get_instances_of(name)
            .iter()
            .filter_map(|key| self.arena.get(*key))
    }

    /// Every live instance, of every type.
    ///
    /// The list is a cache rebuilt only after instances were added or removed.
    pub fn get_adhoc_list_of_all_instances(&mut self) -> &[InstanceKey] {
        self.refresh_all_instances();
        &self.all_instances
    }

    /// Number of live instances of a type
    pub fn get_instances_count_on_scene(&self, name: &str) -> usize {
        self.instances.get(name).map_or(0, Vec::len)
    }

    /// Number of live instances of every type
    pub fn instances_count(&self) -> usize {
        self.instances.values().map(Vec::len).sum()
    }

    /// Resolve a key. Keys of flushed instances resolve to `None`.
    pub fn get(&self, key: InstanceKey) -> Option<&RuntimeObject> {
        self.arena.get(key)
    }

    /// Resolve a key mutably
    pub fn get_mut(&mut self, key: InstanceKey) -> Option<&mut RuntimeObject> {
        self.arena.get_mut(key)
    }

    /// Find the live instance created from a placement
    pub fn find_by_persistent_uuid(&self, uuid: &str) -> Option<InstanceKey> {
        self.instances
            .values()
            .flatten()
            .copied()
            .find(|key| {
                self.arena
                    .get(*key)
                    .is_some_and(|object| object.state().persistent_uuid() == Some(uuid))
            })
    }

    fn refresh_all_instances(&mut self) {
        if self.all_instances_up_to_date {
            return;
        }
        self.all_instances.clear();
        for keys in self.instances.values() {
            self.all_instances.extend_from_slice(keys);
        }
        self.all_instances_up_to_date = true;
    }

    /// Copy the live instances into the scratch buffer iterated by a phase
    pub(super) fn take_phase_snapshot(&mut self) -> Vec<InstanceKey> {
        self.refresh_all_instances();
        let mut snapshot = std::mem::take(&mut self.phase_snapshot);
        snapshot.clear();
        snapshot.extend_from_slice(&self.all_instances);
        snapshot
    }

    /// Give the scratch buffer back for the next phase
    pub(super) fn restore_phase_snapshot(&mut self, snapshot: Vec<InstanceKey>) {
        self.phase_snapshot = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::object::{ObjectBlueprint, VariableData, VariableValue};

    #[test]
    fn test_create_object() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        let key = container.create_object("Coin").unwrap();

        let coin = container.get(key).unwrap();
        assert_eq!(coin.id(), 1);
        assert_eq!(coin.name(), "Coin");
        assert_eq!(container.get_instances_of("Coin"), &[key]);
        assert_eq!(container.get_instances_count_on_scene("Coin"), 1);
    }

    #[test]
    fn test_create_unknown_object() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        assert!(container.create_object("Unknown").is_none());
        assert!(container.get_instances_of("Unknown").is_empty());
        assert_eq!(container.instances_count(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        let keys: Vec<_> = (0..20)
            .filter_map(|_| container.create_object("Coin"))
            .collect();
        let mut ids: Vec<u64> = keys
            .iter()
            .map(|key| container.get(*key).unwrap().id())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_add_object_for_unregistered_type() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        let id = container.create_new_unique_id();
        let blueprint = ObjectBlueprint::new("Particle", "Sprite");
        let object = RuntimeObject::new(id, &blueprint, Box::new(crate::object::EmptyObject));

        let key = container.add_object(object);
        assert_eq!(container.get_instances_of("Particle"), &[key]);
        assert!(!container.is_object_registered("Particle"));
        assert_eq!(container.get_adhoc_list_of_all_instances(), &[key]);
    }

    #[test]
    fn test_aggregate_list_follows_changes() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        container.register_object(&ObjectBlueprint::new("Label", "Text"));
        let coin = container.create_object("Coin").unwrap();
        let label = container.create_object("Label").unwrap();

        let mut all = container.get_adhoc_list_of_all_instances().to_vec();
        all.sort();
        let mut expected = vec![coin, label];
        expected.sort();
        assert_eq!(all, expected);

        container.mark_object_for_deletion(coin);
        assert_eq!(container.get_adhoc_list_of_all_instances(), &[label]);
    }

    #[test]
    fn test_create_objects_from_placements() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        container.add_layer(&crate::object::LayerData::new("HUD"));

        let mut placement = InstanceData::new("Coin", 10.0, 20.0);
        placement.angle = 45.0;
        placement.z = Some(3.0);
        placement.z_order = 4;
        placement.layer = "HUD".to_string();
        placement.persistent_uuid = Some("uuid-1".to_string());
        placement.initial_variables = vec![VariableData::new("bonus", VariableValue::Number(2.0))];
        placement
            .properties
            .insert("value".to_string(), VariableValue::Number(10.0));
        let unknown = InstanceData::new("Unknown", 0.0, 0.0);

        container.create_objects_from(&[placement, unknown], 100.0, 200.0, 5.0, true);

        let key = container.get_instances_of("Coin")[0];
        let coin = container.get(key).unwrap();
        let state = coin.state();
        assert_eq!((state.x(), state.y()), (110.0, 220.0));
        assert_eq!(state.angle(), 45.0);
        assert_eq!(state.z(), 0.0);
        assert_eq!(state.z_order(), 4);
        assert_eq!(coin.layer(), "HUD");
        assert_eq!(state.variables().number("value"), 1.0);
        assert_eq!(state.variables().number("bonus"), 2.0);
        assert_eq!(coin.kind_as::<Coin>().unwrap().value, 10.0);
        assert_eq!(container.find_by_persistent_uuid("uuid-1"), Some(key));
        assert_eq!(container.instances_count(), 1);
    }

    #[test]
    fn test_create_objects_from_3d_placements() {
        let log = new_log();
        let mut container = InstanceContainer::new(catalog(&log));
        container.register_object(&ObjectBlueprint::new("Cube", "Model"));

        let mut placement = InstanceData::new("Cube", 1.0, 2.0);
        placement.z = Some(3.0);
        placement.rotation_x = Some(90.0);
        placement.persistent_uuid = Some("cube".to_string());
        container.create_objects_from(&[placement], 0.0, 0.0, 5.0, false);

        let cube = container.instances_of("Cube").next().unwrap();
        assert_eq!(cube.state().z(), 8.0);
        assert_eq!(cube.state().rotation_x(), 90.0);
        assert_eq!(cube.state().rotation_y(), 0.0);
        assert_eq!(cube.state().persistent_uuid(), None);
    }

    #[test]
    fn test_create_object_on_layer_uses_default_z_order() {
        let log = new_log();
        let mut container = container_with_coin(&log);
        container.add_layer(&crate::object::LayerData::new("HUD"));
        container.get_layer_mut("HUD").set_default_z_order(7);

        let key = container.create_object_on_layer("Coin", 5.0, 6.0, "HUD").unwrap();
        let coin = container.get(key).unwrap();
        assert_eq!(coin.layer(), "HUD");
        assert_eq!(coin.state().z_order(), 7);
        assert_eq!((coin.state().x(), coin.state().y()), (5.0, 6.0));
    }
}
