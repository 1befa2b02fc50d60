use std::fmt::{Display, Formatter};

use log::{debug, error, warn};

use crate::{
    engine::Engine,
    models::{
        command_macro::{IntoMacroIndex, MacroIndex, MacroRegistry, ValidationError},
        storage::WorldStorage,
    },
    origin::{InvocationOrigin, OriginResolver},
    scheduler::Scheduler,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFailure {
    OutOfRange(ValidationError),
    UndefinedMacro(MacroIndex),
}

impl Display for DispatchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchFailure::OutOfRange(e) => write!(f, "{}", e),
            DispatchFailure::UndefinedMacro(index) => write!(f, "Command {} is undefined.", index),
        }
    }
}

/// The synchronous acknowledgment of a `run`. Failures found once the macro
/// actually executes are reported on the message/log channel instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Success,
    Failure(DispatchFailure),
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchResult::Success)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MacroDispatcher {
    resolver: OriginResolver,
}

impl MacroDispatcher {
    pub fn new(resolver: OriginResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &OriginResolver {
        &self.resolver
    }

    /// Validates and looks up the macro now, then queues its execution for the
    /// next tick. Exactly one macro is queued per successful call.
    pub fn run<S: WorldStorage>(
        &self,
        registry: &MacroRegistry<S>,
        scheduler: &mut Scheduler,
        index: impl IntoMacroIndex,
        origin: &InvocationOrigin,
    ) -> DispatchResult {
        let slot = match registry.slot(index) {
            Ok(slot) => slot,
            Err(e) => return DispatchResult::Failure(DispatchFailure::OutOfRange(e)),
        };

        let index = slot.index;
        let command = match slot.text {
            Some(command) => command.to_string(),
            None => return DispatchResult::Failure(DispatchFailure::UndefinedMacro(index)),
        };

        debug!("Queueing macro {} `{}` from {:?}", index, command, origin);

        let resolver = self.resolver.clone();
        let origin = origin.clone();

        scheduler.run(move |engine| execute_isolated(&resolver, engine, &origin, &command));

        DispatchResult::Success
    }
}

/// Runs a macro command, containing any failure. Entity origins are told about
/// the failure directly.
pub fn execute_isolated(
    resolver: &OriginResolver,
    engine: &mut dyn Engine,
    origin: &InvocationOrigin,
    command: &str,
) {
    match resolver.run(engine, origin, command) {
        Ok(count) => {
            debug!("Macro `{}` affected {} subjects", command, count);
        }

        Err(e) => {
            error!(
                "Macro `{}` failed against {}: {}",
                e.resolved.command, e.resolved.target, e
            );

            if let Some(entity) = origin.entity() {
                if let Err(message_error) = engine.send_message(entity, &format!("§c{}", e)) {
                    warn!("Could not report macro failure to {}: {}", entity, message_error);
                }
            }
        }
    }
}
