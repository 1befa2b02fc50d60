use crate::{
    framework::{CommandResult, Context},
    models::command_macro::MacroSlot,
};

/// Set or remove a user custom command
pub fn set_macro(ctx: Context<'_>) -> CommandResult {
    let index = match ctx.args.integer("index") {
        Some(index) => index,
        None => return CommandResult::failure("Missing required parameter 'index'."),
    };

    match ctx.data.registry.set(index, ctx.args.string("command")) {
        Ok(MacroSlot { index, text: Some(text) }) => {
            CommandResult::success(format!("Set user custom command {} to: '{}'", index, text))
        }

        Ok(MacroSlot { index, text: None }) => {
            CommandResult::success(format!("Removed user custom command {}.", index))
        }

        Err(e) => CommandResult::failure(e.to_string()),
    }
}
