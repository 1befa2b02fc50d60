use lazy_regex::regex;
use log::info;

use crate::{
    consts::MAX_CONSOLE_ENTITIES,
    engine::{CommandError, CommandTarget, DimensionId, Engine, EntityId},
    framework::{CommandSource, PermissionLevel},
    origin::BlockLocation,
};

pub const KNOWN_VERBS: &[&str] = &[
    "say", "tp", "teleport", "give", "effect", "gamemode", "time", "weather", "kill", "summon",
    "setblock", "fill", "execute", "tell", "title",
];

pub const DIMENSIONS: &[&str] = &["overworld", "nether", "the_end"];

/// Stand-in engine for the console host. Commands are printed rather than
/// applied to a world, but verbs and targets are still checked.
///
/// Entities appear when a console line names them. At most
/// `MAX_CONSOLE_ENTITIES` are kept, and the longest-known one leaves first.
pub struct ConsoleEngine {
    entities: Vec<EntityId>,
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleEngine {
    pub fn new() -> Self {
        Self { entities: vec![] }
    }

    pub fn spawn(&mut self, entity: EntityId) {
        if self.entities.contains(&entity) {
            return;
        }

        if self.entities.len() >= MAX_CONSOLE_ENTITIES {
            let gone = self.entities.remove(0);

            info!("Entity {} left", gone);
        }

        info!("Entity {} joined", entity);

        self.entities.push(entity);
    }

    pub fn despawn(&mut self, entity: &EntityId) {
        self.entities.retain(|e| e != entity);
    }

    fn check_target(&self, target: &CommandTarget) -> Result<(), CommandError> {
        let valid = match target {
            CommandTarget::Dimension(dimension) => DIMENSIONS.contains(&dimension.0.as_str()),
            CommandTarget::Entity(entity) => self.entities.contains(entity),
        };

        if valid {
            Ok(())
        } else {
            Err(CommandError::InvalidTarget(target.clone()))
        }
    }
}

/// Checks the verb of a command, following `execute ... run` into the inner command.
fn check_verb(command: &str) -> Result<(), CommandError> {
    let verb = command.split_whitespace().next().unwrap_or("").trim_start_matches('/');

    if !KNOWN_VERBS.contains(&verb) {
        return Err(CommandError::Rejected(format!(
            "Unknown command: {}. Please check that the command exists and that you have \
permission to use it.",
            verb
        )));
    }

    if verb == "execute" {
        match command.split_once(" run ") {
            Some((_, inner)) => check_verb(inner),
            None => Err(CommandError::Rejected(
                "Syntax error: execute is missing a run clause.".to_string(),
            )),
        }
    } else {
        Ok(())
    }
}

impl Engine for ConsoleEngine {
    fn run_command(&mut self, target: &CommandTarget, command: &str) -> Result<u32, CommandError> {
        self.check_target(target)?;
        check_verb(command)?;

        println!("[{}] {}", target, command);

        Ok(1)
    }

    fn send_message(&mut self, entity: &EntityId, message: &str) -> Result<(), CommandError> {
        self.check_target(&CommandTarget::Entity(entity.clone()))?;

        println!("[to {}] {}", entity, strip_formatting(message));

        Ok(())
    }
}

/// Removes `§x` formatting codes.
pub fn strip_formatting(text: &str) -> String {
    regex!("§.").replace_all(text, "").into_owned()
}

/// Splits a console line into the invocation source and the command text.
///
/// `@name /cmd` invokes as an entity, `#dimension x y z /cmd` as a block, and a
/// bare `/cmd` as the unanchored console.
pub fn parse_console_line(
    line: &str,
    permission_level: PermissionLevel,
) -> Result<(CommandSource, &str), String> {
    let captures = regex!(
        r"^\s*(?:@(?P<entity>\S+)\s+|#(?P<dimension>\S+)\s+(?P<x>-?\d+)\s+(?P<y>-?\d+)\s+(?P<z>-?\d+)\s+)?(?P<command>/.*)$"
    )
    .captures(line)
    .ok_or_else(|| {
        "Expected `[@entity | #dimension x y z] /command [args...]`".to_string()
    })?;

    let command = captures.name("command").map_or("", |m| m.as_str());

    if let Some(entity) = captures.name("entity") {
        return Ok((CommandSource::entity(entity.as_str().into(), permission_level), command));
    }

    if let Some(dimension) = captures.name("dimension") {
        let coordinate = |name: &str| -> Result<i32, String> {
            let raw = captures.name(name).map_or("", |m| m.as_str());

            raw.parse::<i32>().map_err(|_| format!("Coordinate {} is out of range", raw))
        };

        let block = BlockLocation::new(coordinate("x")?, coordinate("y")?, coordinate("z")?);

        let dimension = DimensionId(dimension.as_str().to_string());

        return Ok((CommandSource::block(block, dimension, permission_level), command));
    }

    Ok((CommandSource::console(permission_level), command))
}
