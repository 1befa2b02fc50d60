use std::{
    collections::BTreeMap,
    error::Error as StdError,
    fmt::{Display, Formatter},
    str::FromStr,
};

use lazy_regex::regex;
use levenshtein::levenshtein;
use log::{debug, info, warn};

use crate::{
    consts::{COMMAND_NAMESPACE, MAX_SUGGESTION_DISTANCE},
    engine::{DimensionId, EntityId},
    origin::{BlockLocation, InvocationOrigin},
    Data,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PermissionLevel {
    Any,
    GameDirectors,
    Admin,
    Host,
    Owner,
}

impl FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "").as_str() {
            "any" => Ok(PermissionLevel::Any),
            "gamedirectors" => Ok(PermissionLevel::GameDirectors),
            "admin" => Ok(PermissionLevel::Admin),
            "host" => Ok(PermissionLevel::Host),
            "owner" => Ok(PermissionLevel::Owner),
            _ => Err(format!("Unknown permission level: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
    String,
    Enum(&'static [&'static str]),
}

impl Display for ParamKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamKind::Integer => f.write_str("an integer"),
            ParamKind::String => f.write_str("a string"),
            ParamKind::Enum(values) => write!(f, "one of {}", values.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl Param {
    pub fn integer(name: &'static str) -> Self {
        Self { name, kind: ParamKind::Integer }
    }

    pub fn string(name: &'static str) -> Self {
        Self { name, kind: ParamKind::String }
    }

    pub fn enumeration(name: &'static str, values: &'static [&'static str]) -> Self {
        Self { name, kind: ParamKind::Enum(values) }
    }

    fn usage(&self) -> String {
        match &self.kind {
            ParamKind::Integer => format!("{}: int", self.name),
            ParamKind::String => format!("{}: string", self.name),
            ParamKind::Enum(values) => values.join("|"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Integer(i64),
    String(String),
}

/// Arguments bound to their parameter names. Enum values are stored in their
/// declared spelling.
#[derive(Debug, Default)]
pub struct Args {
    values: Vec<(&'static str, ArgValue)>,
}

impl Args {
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|v| match v {
            ArgValue::Integer(i) => Some(*i),
            _ => None,
        })
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| match v {
            ArgValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: CommandStatus::Success, message: Some(message.into()) }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { status: CommandStatus::Failure, message: Some(message.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}

/// The raw invocation context a host hands over with each command.
#[derive(Debug, Clone)]
pub struct CommandSource {
    pub source_block: Option<(BlockLocation, DimensionId)>,
    pub source_entity: Option<EntityId>,
    pub permission_level: PermissionLevel,
}

impl CommandSource {
    pub fn console(permission_level: PermissionLevel) -> Self {
        Self { source_block: None, source_entity: None, permission_level }
    }

    pub fn entity(entity: EntityId, permission_level: PermissionLevel) -> Self {
        Self { source_block: None, source_entity: Some(entity), permission_level }
    }

    pub fn block(
        block: BlockLocation,
        dimension: DimensionId,
        permission_level: PermissionLevel,
    ) -> Self {
        Self { source_block: Some((block, dimension)), source_entity: None, permission_level }
    }

    pub fn origin(&self) -> InvocationOrigin {
        InvocationOrigin::from_parts(self.source_block.clone(), self.source_entity.clone())
    }
}

pub struct Context<'a> {
    pub data: &'a mut Data,
    pub origin: InvocationOrigin,
    pub args: Args,
}

pub type CommandFn = for<'a> fn(Context<'a>) -> CommandResult;

pub struct Command {
    pub name: String,
    pub description: String,
    pub cheats_required: bool,
    pub permission_level: PermissionLevel,
    pub mandatory_parameters: Vec<Param>,
    pub optional_parameters: Vec<Param>,
    func: CommandFn,
}

impl Command {
    pub fn from(name: &str, func: CommandFn) -> Self {
        Command {
            name: qualified_name(name),
            description: String::new(),
            cheats_required: false,
            permission_level: PermissionLevel::Any,
            mandatory_parameters: vec![],
            optional_parameters: vec![],
            func,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();

        self
    }

    pub fn cheats_required(mut self, cheats_required: bool) -> Self {
        self.cheats_required = cheats_required;

        self
    }

    pub fn permission_level(mut self, permission_level: PermissionLevel) -> Self {
        self.permission_level = permission_level;

        self
    }

    pub fn mandatory(mut self, param: Param) -> Self {
        self.mandatory_parameters.push(param);

        self
    }

    pub fn optional(mut self, param: Param) -> Self {
        self.optional_parameters.push(param);

        self
    }

    pub fn usage(&self) -> String {
        let mut usage = format!("/{}", self.name);

        for param in &self.mandatory_parameters {
            usage.push_str(&format!(" <{}>", param.usage()));
        }
        for param in &self.optional_parameters {
            usage.push_str(&format!(" [{}]", param.usage()));
        }

        usage
    }

    fn parameters(&self) -> impl Iterator<Item = &Param> {
        self.mandatory_parameters.iter().chain(self.optional_parameters.iter())
    }

    fn bind(&self, values: Vec<ArgValue>) -> Result<Args, String> {
        if let Some(missing) = self.mandatory_parameters.get(values.len()) {
            return Err(format!(
                "Missing required parameter '{}'. Usage: {}",
                missing.name,
                self.usage()
            ));
        }

        if values.len() > self.mandatory_parameters.len() + self.optional_parameters.len() {
            return Err(format!("Too many parameters. Usage: {}", self.usage()));
        }

        let mut args = Args::default();

        for (param, value) in self.parameters().zip(values) {
            let value = match (&param.kind, value) {
                (ParamKind::Integer, ArgValue::Integer(i)) => ArgValue::Integer(i),
                (ParamKind::String, ArgValue::String(s)) => ArgValue::String(s),
                (ParamKind::Enum(allowed), ArgValue::String(s)) => {
                    match allowed.iter().find(|a| a.eq_ignore_ascii_case(&s)) {
                        Some(canonical) => ArgValue::String(canonical.to_string()),
                        None => {
                            return Err(format!(
                                "Parameter '{}' expects {}, got '{}'.",
                                param.name, param.kind, s
                            ))
                        }
                    }
                }
                (kind, _) => {
                    return Err(format!("Parameter '{}' expects {}.", param.name, kind));
                }
            };

            args.values.push((param.name, value));
        }

        Ok(args)
    }

    /// Converts text tokens using the declared parameter kinds.
    fn bind_text(&self, tokens: Vec<String>) -> Result<Args, String> {
        let params = self.parameters().collect::<Vec<&Param>>();

        let values = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| match params.get(i).map(|p| (&p.kind, p.name)) {
                Some((ParamKind::Integer, name)) => {
                    token.parse::<i64>().map(ArgValue::Integer).map_err(|_| {
                        format!("Parameter '{}' expects an integer, got '{}'.", name, token)
                    })
                }
                _ => Ok(ArgValue::String(token)),
            })
            .collect::<Result<Vec<ArgValue>, String>>()?;

        self.bind(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkState {
    Startup,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    NotInStartup(String),
    DuplicateName(String),
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationError::NotInStartup(name) => {
                write!(f, "Command {} can only be registered during startup", name)
            }
            RegistrationError::DuplicateName(name) => {
                write!(f, "Command {} is already registered", name)
            }
        }
    }
}

impl StdError for RegistrationError {}

/// Declarative command surface. Commands are registered during startup; once
/// active, the set is fixed and invocations are accepted.
pub struct Framework {
    commands: BTreeMap<String, Command>,
    state: FrameworkState,
    cheats_enabled: bool,
}

impl Default for Framework {
    fn default() -> Self {
        Self::new()
    }
}

impl Framework {
    pub fn new() -> Self {
        Self { commands: BTreeMap::new(), state: FrameworkState::Startup, cheats_enabled: true }
    }

    pub fn cheats_enabled(mut self, cheats_enabled: bool) -> Self {
        self.cheats_enabled = cheats_enabled;

        self
    }

    pub fn state(&self) -> FrameworkState {
        self.state
    }

    pub fn register_command(&mut self, command: Command) -> Result<(), RegistrationError> {
        if self.state != FrameworkState::Startup {
            warn!("Rejected late registration of {}", command.name);

            return Err(RegistrationError::NotInStartup(command.name));
        }

        if self.commands.contains_key(&command.name) {
            return Err(RegistrationError::DuplicateName(command.name));
        }

        debug!("Registered {}", command.usage());

        self.commands.insert(command.name.clone(), command);

        Ok(())
    }

    pub fn activate(&mut self) {
        info!("Command surface active with {} commands", self.commands.len());

        self.state = FrameworkState::Active;
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Looks a command up by name, with or without the leading slash and namespace.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(&qualified_name(name))
    }

    /// Invokes a command with already typed arguments.
    pub fn invoke(
        &self,
        data: &mut Data,
        source: &CommandSource,
        name: &str,
        args: Vec<ArgValue>,
    ) -> CommandResult {
        match self.checked_command(source, name) {
            Ok(command) => match command.bind(args) {
                Ok(args) => Self::call(command, data, source, args),
                Err(message) => CommandResult::failure(message),
            },
            Err(result) => result,
        }
    }

    /// Parses and invokes a text command line such as `/qs 0 "say hi"`.
    pub fn invoke_text(
        &self,
        data: &mut Data,
        source: &CommandSource,
        line: &str,
    ) -> CommandResult {
        let mut tokens = tokenize(line);

        if tokens.is_empty() {
            return CommandResult::failure("Empty command.");
        }

        let name = tokens.remove(0);

        match self.checked_command(source, &name) {
            Ok(command) => match command.bind_text(tokens) {
                Ok(args) => Self::call(command, data, source, args),
                Err(message) => CommandResult::failure(message),
            },
            Err(result) => result,
        }
    }

    fn checked_command(
        &self,
        source: &CommandSource,
        name: &str,
    ) -> Result<&Command, CommandResult> {
        if self.state != FrameworkState::Active {
            return Err(CommandResult::failure(
                "Commands are not available until startup has finished.",
            ));
        }

        let command = match self.command(name) {
            Some(command) => command,
            None => {
                let name = name.trim_start_matches('/');

                return Err(CommandResult::failure(match self.suggest(name) {
                    Some(suggestion) => {
                        format!("Unknown command: {}. Did you mean /{}?", name, suggestion)
                    }
                    None => format!("Unknown command: {}.", name),
                }));
            }
        };

        if command.cheats_required && !self.cheats_enabled {
            return Err(CommandResult::failure("Cheats must be enabled to use this command."));
        }

        if source.permission_level < command.permission_level {
            return Err(CommandResult::failure("You do not have permission to use this command."));
        }

        Ok(command)
    }

    fn call(
        command: &Command,
        data: &mut Data,
        source: &CommandSource,
        args: Args,
    ) -> CommandResult {
        debug!("Invoking {} with {:?}", command.name, args);

        (command.func)(Context { data, origin: source.origin(), args })
    }

    fn suggest(&self, name: &str) -> Option<&str> {
        let qualified = qualified_name(name);

        self.commands
            .keys()
            .map(|k| (k, levenshtein(&qualified, k)))
            .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(_, distance)| *distance)
            .map(|(k, _)| k.as_str())
    }
}

fn qualified_name(name: &str) -> String {
    let name = name.trim_start_matches('/').to_lowercase();

    if name.contains(':') {
        name
    } else {
        format!("{}:{}", COMMAND_NAMESPACE, name)
    }
}

/// Splits a command line into words. Double quotes group words and support
/// `\"` and `\\` escapes.
pub fn tokenize(line: &str) -> Vec<String> {
    regex!(r#""((?:[^"\\]|\\.)*)"|(\S+)"#)
        .captures_iter(line)
        .map(|captures| match (captures.get(1), captures.get(2)) {
            (Some(quoted), _) => regex!(r#"\\(.)"#).replace_all(quoted.as_str(), "$1").into_owned(),
            (None, Some(word)) => word.as_str().to_string(),
            (None, None) => String::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::storage::MemoryStorage, origin::OriginResolver};

    fn data() -> Data {
        Data::new(Box::new(MemoryStorage::new()), OriginResolver::new("overworld".into()))
    }

    fn echo(ctx: Context<'_>) -> CommandResult {
        let mode = ctx.args.string("mode").unwrap_or("none");

        match ctx.args.integer("count") {
            Some(count) => CommandResult::success(format!("{} {}", count, mode)),
            None => CommandResult::success(format!("- {}", mode)),
        }
    }

    fn where_am_i(ctx: Context<'_>) -> CommandResult {
        CommandResult::success(format!("{:?}", ctx.origin))
    }

    fn framework() -> Framework {
        let mut framework = Framework::new();

        framework
            .register_command(
                Command::from("echo", echo)
                    .description("Echoes")
                    .mandatory(Param::integer("count"))
                    .optional(Param::enumeration("mode", &["loud", "quiet"])),
            )
            .unwrap();
        framework
            .register_command(
                Command::from("admin", echo)
                    .permission_level(PermissionLevel::Admin)
                    .cheats_required(true),
            )
            .unwrap();
        framework.register_command(Command::from("where", where_am_i)).unwrap();
        framework.activate();

        framework
    }

    fn console() -> CommandSource {
        CommandSource::console(PermissionLevel::Host)
    }

    #[test]
    fn registration_closes_after_activation() {
        let mut framework = framework();

        assert_eq!(framework.state(), FrameworkState::Active);
        assert_eq!(
            framework.register_command(Command::from("late", echo)),
            Err(RegistrationError::NotInStartup("n:late".to_string()))
        );
        assert!(framework.command("late").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut framework = Framework::new();

        framework.register_command(Command::from("q", echo)).unwrap();

        assert_eq!(
            framework.register_command(Command::from("n:q", echo)),
            Err(RegistrationError::DuplicateName("n:q".to_string()))
        );
    }

    #[test]
    fn invocations_wait_for_activation() {
        let mut framework = Framework::new();
        framework.register_command(Command::from("echo", echo)).unwrap();

        let result = framework.invoke(&mut data(), &console(), "echo", vec![]);

        assert_eq!(result.status, CommandStatus::Failure);
    }

    #[test]
    fn namespace_and_slash_are_optional() {
        let framework = framework();

        assert!(framework.command("echo").is_some());
        assert!(framework.command("n:echo").is_some());
        assert!(framework.command("/n:echo").is_some());
        assert!(framework.command("/ECHO").is_some());
    }

    #[test]
    fn typed_arguments_are_checked() {
        let framework = framework();
        let mut data = data();

        let result = framework.invoke(&mut data, &console(), "echo", vec![ArgValue::Integer(3)]);
        assert_eq!(result, CommandResult::success("3 none"));

        let result = framework.invoke(&mut data, &console(), "echo", vec![]);
        assert_eq!(
            result,
            CommandResult::failure(
                "Missing required parameter 'count'. Usage: /n:echo <count: int> [loud|quiet]"
            )
        );

        let text = vec![ArgValue::String("3".to_string())];

        let result = framework.invoke(&mut data, &console(), "echo", text);
        assert_eq!(result, CommandResult::failure("Parameter 'count' expects an integer."));

        let result = framework.invoke(
            &mut data,
            &console(),
            "echo",
            vec![ArgValue::Integer(1), ArgValue::String("LOUD".to_string())],
        );
        assert_eq!(result, CommandResult::success("1 loud"));
    }

    #[test]
    fn text_arguments_follow_the_schema() {
        let framework = framework();
        let mut data = data();

        assert_eq!(
            framework.invoke_text(&mut data, &console(), "/echo 7 Quiet"),
            CommandResult::success("7 quiet")
        );
        assert_eq!(
            framework.invoke_text(&mut data, &console(), "/echo seven"),
            CommandResult::failure("Parameter 'count' expects an integer, got 'seven'.")
        );
        assert_eq!(
            framework.invoke_text(&mut data, &console(), "/echo 1 shouty"),
            CommandResult::failure("Parameter 'mode' expects one of loud, quiet, got 'shouty'.")
        );
        assert_eq!(
            framework.invoke_text(&mut data, &console(), "/echo 1 loud extra"),
            CommandResult::failure("Too many parameters. Usage: /n:echo <count: int> [loud|quiet]")
        );
    }

    #[test]
    fn gates_run_before_the_handler() {
        let framework = framework();
        let mut data = data();

        let guest = CommandSource::console(PermissionLevel::Any);

        let result = framework.invoke(&mut data, &guest, "admin", vec![]);
        assert_eq!(
            result,
            CommandResult::failure("You do not have permission to use this command.")
        );

        let result = framework.invoke(&mut data, &console(), "admin", vec![]);
        assert!(result.is_success());

        let mut no_cheats = Framework::new().cheats_enabled(false);
        no_cheats
            .register_command(Command::from("admin", echo).cheats_required(true))
            .unwrap();
        no_cheats.activate();

        let result = no_cheats.invoke(&mut data, &console(), "admin", vec![]);
        assert_eq!(result, CommandResult::failure("Cheats must be enabled to use this command."));
    }

    #[test]
    fn unknown_commands_get_suggestions() {
        let framework = framework();
        let mut data = data();

        assert_eq!(
            framework.invoke_text(&mut data, &console(), "/ecoh 1"),
            CommandResult::failure("Unknown command: ecoh. Did you mean /n:echo?")
        );
        assert_eq!(
            framework.invoke_text(&mut data, &console(), "/completelydifferent"),
            CommandResult::failure("Unknown command: completelydifferent.")
        );
    }

    #[test]
    fn source_becomes_origin() {
        let framework = framework();
        let mut data = data();

        let source = CommandSource::entity("steve".into(), PermissionLevel::Any);
        let result = framework.invoke(&mut data, &source, "where", vec![]);

        assert_eq!(
            result.message.as_deref(),
            Some(format!("{:?}", InvocationOrigin::Entity { entity: "steve".into() }).as_str())
        );
    }

    #[test]
    fn tokenize_handles_quotes() {
        assert_eq!(
            tokenize(r#"/qs 0 "say \"hi\" there"  extra"#),
            vec!["/qs", "0", r#"say "hi" there"#, "extra"]
        );
        assert_eq!(tokenize("   "), Vec::<String>::new());
        assert_eq!(tokenize(r#"/qs 1 """#), vec!["/qs", "1", ""]);
    }
}
