use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimensionId(pub String);

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Display for DimensionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for DimensionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Something the engine can run a command string against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandTarget {
    Dimension(DimensionId),
    Entity(EntityId),
}

impl Display for CommandTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandTarget::Dimension(dimension) => write!(f, "dimension {}", dimension),
            CommandTarget::Entity(entity) => write!(f, "entity {}", entity),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The engine refused the command string itself.
    Rejected(String),
    /// The target is gone, e.g. the entity despawned before the tick ran.
    InvalidTarget(CommandTarget),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Rejected(reason) => f.write_str(reason),
            CommandError::InvalidTarget(target) => {
                write!(f, "The {} is no longer valid.", target)
            }
        }
    }
}

impl StdError for CommandError {}

/// The host engine as seen by this crate. Only ever driven from the tick loop.
pub trait Engine {
    /// Runs a raw command string, returning the number of affected subjects.
    fn run_command(&mut self, target: &CommandTarget, command: &str) -> Result<u32, CommandError>;

    fn send_message(&mut self, entity: &EntityId, message: &str) -> Result<(), CommandError>;
}
