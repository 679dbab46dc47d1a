use std::collections::HashMap;

use crate::value::Value;

/// The single mutable namespace shared by every code chunk and interactive
/// sub-session of one document run. It is never reset mid-document: later
/// samples deliberately observe state left behind by earlier ones.
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            variables: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    /// Bulk-insert bindings, used by environment drivers during setup.
    pub fn extend(&mut self, bindings: impl IntoIterator<Item = (String, Value)>) {
        self.variables.extend(bindings);
    }
}
