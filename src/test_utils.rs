use crate::engine::{CommandError, CommandTarget, Engine, EntityId};

/// Engine double that records everything it is asked to do.
#[derive(Default)]
pub struct RecordingEngine {
    pub commands: Vec<(CommandTarget, String)>,
    pub messages: Vec<(EntityId, String)>,
    reject: Option<String>,
    missing_entities: Vec<EntityId>,
    muted: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any command containing `pattern`.
    pub fn rejecting(pattern: &str) -> Self {
        Self { reject: Some(pattern.to_string()), ..Self::default() }
    }

    pub fn without_entity(mut self, entity: &str) -> Self {
        self.missing_entities.push(entity.into());

        self
    }

    /// Fails every `send_message`, after recording the attempt.
    pub fn muted(mut self) -> Self {
        self.muted = true;

        self
    }
}

impl Engine for RecordingEngine {
    fn run_command(&mut self, target: &CommandTarget, command: &str) -> Result<u32, CommandError> {
        self.commands.push((target.clone(), command.to_string()));

        if let CommandTarget::Entity(entity) = target {
            if self.missing_entities.contains(entity) {
                return Err(CommandError::InvalidTarget(target.clone()));
            }
        }

        match &self.reject {
            Some(pattern) if command.contains(pattern.as_str()) => {
                Err(CommandError::Rejected(format!("rejected: {}", command)))
            }
            _ => Ok(1),
        }
    }

    fn send_message(&mut self, entity: &EntityId, message: &str) -> Result<(), CommandError> {
        self.messages.push((entity.clone(), message.to_string()));

        if self.muted {
            return Err(CommandError::InvalidTarget(CommandTarget::Entity(entity.clone())));
        }

        Ok(())
    }
}
