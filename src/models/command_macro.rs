use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
};

use log::debug;

use crate::{
    consts::{MACRO_SLOT_COUNT, MAX_MACRO_INDEX},
    models::{slot_store::SlotStore, storage::WorldStorage},
};

/// A slot index that has passed range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacroIndex(u8);

impl MacroIndex {
    pub fn try_from_i64(index: i64) -> Result<Self, ValidationError> {
        if (0..=MAX_MACRO_INDEX).contains(&index) {
            Ok(Self(index as u8))
        } else {
            Err(ValidationError { input: index.to_string() })
        }
    }

    /// Floors before range checking, so `3.9` addresses slot 3.
    pub fn try_from_f64(index: f64) -> Result<Self, ValidationError> {
        let floored = index.floor();

        if floored.is_finite() && floored >= 0.0 && floored <= MAX_MACRO_INDEX as f64 {
            Ok(Self(floored as u8))
        } else {
            Err(ValidationError { input: index.to_string() })
        }
    }

    pub fn all() -> impl Iterator<Item = MacroIndex> {
        (0..MACRO_SLOT_COUNT as u8).map(Self)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Display for MacroIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait IntoMacroIndex {
    fn into_macro_index(self) -> Result<MacroIndex, ValidationError>;
}

impl IntoMacroIndex for MacroIndex {
    fn into_macro_index(self) -> Result<MacroIndex, ValidationError> {
        Ok(self)
    }
}

impl IntoMacroIndex for i64 {
    fn into_macro_index(self) -> Result<MacroIndex, ValidationError> {
        MacroIndex::try_from_i64(self)
    }
}

impl IntoMacroIndex for i32 {
    fn into_macro_index(self) -> Result<MacroIndex, ValidationError> {
        MacroIndex::try_from_i64(self as i64)
    }
}

impl IntoMacroIndex for f64 {
    fn into_macro_index(self) -> Result<MacroIndex, ValidationError> {
        MacroIndex::try_from_f64(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    input: String,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Index ({}) is out of bounds. Valid range is 0 to {}.",
            self.input, MAX_MACRO_INDEX
        )
    }
}

impl StdError for ValidationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroSlot<'a> {
    pub index: MacroIndex,
    pub text: Option<&'a str>,
}

/// The ten user custom command slots of a world. All slot writes go through here.
pub struct MacroRegistry<S> {
    store: SlotStore<S>,
}

impl<S: WorldStorage> MacroRegistry<S> {
    pub fn new(storage: S) -> Self {
        Self { store: SlotStore::new(storage) }
    }

    pub fn validate_index(index: impl IntoMacroIndex) -> Result<MacroIndex, ValidationError> {
        index.into_macro_index()
    }

    /// Stores trimmed text in a slot. Blank or missing text clears the slot.
    pub fn set(
        &mut self,
        index: impl IntoMacroIndex,
        text: Option<&str>,
    ) -> Result<MacroSlot<'_>, ValidationError> {
        let index = index.into_macro_index()?;
        let text = text.map(str::trim).filter(|t| !t.is_empty());
        let key = SlotStore::<S>::slot_key(index);

        debug!("Writing macro slot {}: {:?}", index, text);

        self.store.write(&key, text);

        Ok(MacroSlot { index, text: self.store.read(&key) })
    }

    pub fn get(&self, index: impl IntoMacroIndex) -> Result<Option<&str>, ValidationError> {
        Ok(self.slot(index)?.text)
    }

    pub fn slot(&self, index: impl IntoMacroIndex) -> Result<MacroSlot<'_>, ValidationError> {
        let index = index.into_macro_index()?;

        Ok(MacroSlot { index, text: self.store.read(&SlotStore::<S>::slot_key(index)) })
    }

    pub fn clear_all(&mut self) {
        for index in MacroIndex::all() {
            self.store.write(&SlotStore::<S>::slot_key(index), None);
        }
    }

    pub fn list_all(&self) -> Vec<MacroSlot<'_>> {
        MacroIndex::all()
            .map(|index| MacroSlot {
                index,
                text: self.store.read(&SlotStore::<S>::slot_key(index)),
            })
            .collect()
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }
}
