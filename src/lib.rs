#[macro_use]
extern crate lazy_static;

pub mod commands;
pub mod console;
pub mod consts;
pub mod dispatcher;
pub mod engine;
pub mod framework;
pub mod models;
pub mod origin;
pub mod scheduler;
pub mod utils;

#[cfg(test)]
mod test_utils;

use std::fmt::{Debug, Formatter};

use crate::{
    dispatcher::MacroDispatcher,
    models::{command_macro::MacroRegistry, storage::WorldStorage},
    origin::OriginResolver,
    scheduler::Scheduler,
};

/// World-scoped state shared by every command handler.
pub struct Data {
    pub registry: MacroRegistry<Box<dyn WorldStorage>>,
    pub dispatcher: MacroDispatcher,
    pub scheduler: Scheduler,
}

impl Data {
    pub fn new(storage: Box<dyn WorldStorage>, resolver: OriginResolver) -> Self {
        Self {
            registry: MacroRegistry::new(storage),
            dispatcher: MacroDispatcher::new(resolver),
            scheduler: Scheduler::new(),
        }
    }
}

impl Debug for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Data {{ .. }}")
    }
}
