use std::{
    error::Error as StdError,
    fmt::{Display, Formatter},
};

use log::debug;

use crate::{
    consts::FALLBACK_DIMENSION,
    engine::{CommandError, CommandTarget, DimensionId, Engine, EntityId},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Space separated components with a fixed number of decimals, as command
    /// coordinates expect them.
    pub fn to_command_string(&self, decimals: usize) -> String {
        format!(
            "{:.*} {:.*} {:.*}",
            decimals, self.x, decimals, self.y, decimals, self.z
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockLocation {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockLocation {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(self.x as f64 + 0.5, self.y as f64 + 0.5, self.z as f64 + 0.5)
    }
}

/// Where a command was invoked from.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOrigin {
    Block { block: BlockLocation, dimension: DimensionId },
    Entity { entity: EntityId },
    Unanchored,
}

impl InvocationOrigin {
    /// Builds an origin from the optional parts a host hands over. A block
    /// anchor takes priority over an entity.
    pub fn from_parts(
        block: Option<(BlockLocation, DimensionId)>,
        entity: Option<EntityId>,
    ) -> Self {
        match (block, entity) {
            (Some((block, dimension)), _) => InvocationOrigin::Block { block, dimension },
            (None, Some(entity)) => InvocationOrigin::Entity { entity },
            (None, None) => InvocationOrigin::Unanchored,
        }
    }

    pub fn entity(&self) -> Option<&EntityId> {
        match self {
            InvocationOrigin::Entity { entity } => Some(entity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub target: CommandTarget,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionError {
    pub resolved: ResolvedCommand,
    pub source: CommandError,
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl StdError for ExecutionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone)]
pub struct OriginResolver {
    fallback_dimension: DimensionId,
}

impl Default for OriginResolver {
    fn default() -> Self {
        Self::new(DimensionId(FALLBACK_DIMENSION.clone()))
    }
}

impl OriginResolver {
    pub fn new(fallback_dimension: DimensionId) -> Self {
        Self { fallback_dimension }
    }

    pub fn fallback_dimension(&self) -> &DimensionId {
        &self.fallback_dimension
    }

    pub fn resolve(&self, origin: &InvocationOrigin, command: &str) -> ResolvedCommand {
        match origin {
            InvocationOrigin::Block { block, dimension } => ResolvedCommand {
                target: CommandTarget::Dimension(dimension.clone()),
                command: format!(
                    "execute positioned {} run {}",
                    block.center().to_command_string(1),
                    command
                ),
            },
            InvocationOrigin::Entity { entity } => ResolvedCommand {
                target: CommandTarget::Entity(entity.clone()),
                command: command.to_string(),
            },
            InvocationOrigin::Unanchored => ResolvedCommand {
                target: CommandTarget::Dimension(self.fallback_dimension.clone()),
                command: command.to_string(),
            },
        }
    }

    /// Resolves and issues the command. Engine errors are returned as-is, never retried.
    pub fn run(
        &self,
        engine: &mut dyn Engine,
        origin: &InvocationOrigin,
        command: &str,
    ) -> Result<u32, ExecutionError> {
        let resolved = self.resolve(origin, command);

        debug!("Issuing `{}` against {}", resolved.command, resolved.target);

        match engine.run_command(&resolved.target, &resolved.command) {
            Ok(count) => Ok(count),
            Err(source) => Err(ExecutionError { resolved, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingEngine;

    fn resolver() -> OriginResolver {
        OriginResolver::new("overworld".into())
    }

    #[test]
    fn block_center_has_one_decimal() {
        assert_eq!(BlockLocation::new(10, 64, -4).center().to_command_string(1), "10.5 64.5 -3.5");
        assert_eq!(Vec3::new(1.0, 2.26, -3.14).to_command_string(1), "1.0 2.3 -3.1");
    }

    #[test]
    fn block_origin_is_positioned_in_its_dimension() {
        let origin = InvocationOrigin::Block {
            block: BlockLocation::new(0, 70, 12),
            dimension: "nether".into(),
        };

        let resolved = resolver().resolve(&origin, "say hi");

        assert_eq!(resolved.target, CommandTarget::Dimension("nether".into()));
        assert_eq!(resolved.command, "execute positioned 0.5 70.5 12.5 run say hi");
    }

    #[test]
    fn entity_origin_runs_directly() {
        let origin = InvocationOrigin::Entity { entity: "steve".into() };

        let resolved = resolver().resolve(&origin, "give @s diamond");

        assert_eq!(resolved.target, CommandTarget::Entity("steve".into()));
        assert_eq!(resolved.command, "give @s diamond");
    }

    #[test]
    fn unanchored_falls_back_to_default_dimension() {
        let resolved = resolver().resolve(&InvocationOrigin::Unanchored, "time set day");

        assert_eq!(resolved.target, CommandTarget::Dimension("overworld".into()));
        assert_eq!(resolved.command, "time set day");
    }

    #[test]
    fn block_takes_priority_over_entity() {
        let origin = InvocationOrigin::from_parts(
            Some((BlockLocation::new(1, 2, 3), "the_end".into())),
            Some("steve".into()),
        );

        assert!(matches!(origin, InvocationOrigin::Block { .. }));
        assert_eq!(
            InvocationOrigin::from_parts(None, Some("steve".into())),
            InvocationOrigin::Entity { entity: "steve".into() }
        );
        assert_eq!(InvocationOrigin::from_parts(None, None), InvocationOrigin::Unanchored);
    }

    #[test]
    fn engine_rejection_propagates() {
        let mut engine = RecordingEngine::rejecting("bogus");

        let error = resolver()
            .run(&mut engine, &InvocationOrigin::Unanchored, "bogus command")
            .unwrap_err();

        assert_eq!(error.resolved.command, "bogus command");
        assert_eq!(error.source, CommandError::Rejected("rejected: bogus command".to_string()));
        assert_eq!(engine.commands.len(), 1);
    }
}
