//! Variable storage for objects

use std::collections::HashMap;

use super::data::{VariableData, VariableValue};

/// Named variables of an object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariablesContainer {
    variables: HashMap<String, VariableValue>,
}

impl VariablesContainer {
    /// Create a container from initial variables
    pub fn new(data: &[VariableData]) -> Self {
        let mut container = Self::default();
        container.init_from(data, false);
        container
    }

    /// Fill the container from variable descriptions.
    ///
    /// With `keep_old_variables`, variables absent from `data` are kept and the
    /// ones present are overwritten; otherwise the container is cleared first.
    pub fn init_from(&mut self, data: &[VariableData], keep_old_variables: bool) {
        if !keep_old_variables {
            self.variables.clear();
        }
        for variable in data {
            self.variables.insert(variable.name.clone(), variable.value.clone());
        }
    }

    /// Get a variable, if it exists
    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.variables.get(name)
    }

    /// Get a variable, creating it with a default value if missing
    pub fn get_or_create(&mut self, name: &str) -> &mut VariableValue {
        self.variables.entry(name.to_string()).or_default()
    }

    /// Set a variable
    pub fn set(&mut self, name: impl Into<String>, value: VariableValue) {
        self.variables.insert(name.into(), value);
    }

    /// Check if a variable exists
    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Remove a variable
    pub fn remove(&mut self, name: &str) -> Option<VariableValue> {
        self.variables.remove(name)
    }

    /// Read a variable as a number, 0 if missing
    pub fn number(&self, name: &str) -> f64 {
        self.get(name).map_or(0.0, VariableValue::as_number)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Check if there is no variable
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterate over the variables
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableValue)> {
        self.variables.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_from_replaces_or_merges() {
        let mut variables = VariablesContainer::new(&[
            VariableData::new("value", VariableValue::Number(1.0)),
            VariableData::new("label", VariableValue::String("coin".into())),
        ]);

        variables.init_from(&[VariableData::new("value", VariableValue::Number(5.0))], true);
        assert_eq!(variables.number("value"), 5.0);
        assert!(variables.has("label"));

        variables.init_from(&[VariableData::new("value", VariableValue::Number(2.0))], false);
        assert_eq!(variables.len(), 1);
        assert!(!variables.has("label"));
    }

    #[test]
    fn test_get_or_create() {
        let mut variables = VariablesContainer::default();
        *variables.get_or_create("score") = VariableValue::Number(3.0);
        assert_eq!(variables.number("score"), 3.0);
        assert_eq!(variables.number("missing"), 0.0);
    }
}
