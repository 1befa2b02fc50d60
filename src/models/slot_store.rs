use crate::{
    consts::MACRO_KEY_PREFIX,
    models::{
        command_macro::MacroIndex,
        storage::{PropertyValue, WorldStorage},
    },
};

/// String-valued view over the world storage, namespaced per macro slot.
pub struct SlotStore<S> {
    storage: S,
}

impl<S: WorldStorage> SlotStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn slot_key(index: MacroIndex) -> String {
        format!("{}{}", MACRO_KEY_PREFIX, index)
    }

    /// Non-string values under a key read as absent.
    pub fn read(&self, key: &str) -> Option<&str> {
        self.storage.get_property(key).and_then(PropertyValue::as_str)
    }

    pub fn write(&mut self, key: &str, value: Option<&str>) {
        self.storage.set_property(key, value.map(PropertyValue::from));
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
