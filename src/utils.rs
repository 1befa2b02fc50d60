use log::info;

use crate::{
    commands::command_macro,
    consts::DESCRIPTION_PREFIX,
    framework::{Framework, RegistrationError},
};

pub fn prefix_command_description(original: &str) -> String {
    format!("{} {}", DESCRIPTION_PREFIX, original)
}

/// Registers every command this add-on provides. Only valid during startup.
pub fn register_commands(framework: &mut Framework) -> Result<(), RegistrationError> {
    for command in command_macro::commands() {
        framework.register_command(command)?;
    }

    info!("Registered user custom commands");

    Ok(())
}
