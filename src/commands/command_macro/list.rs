use super::show_slot;
use crate::framework::{CommandResult, Context};

/// Show one user custom command, or all of them
pub fn list_macro(ctx: Context<'_>) -> CommandResult {
    match ctx.args.integer("index") {
        Some(index) => match ctx.data.registry.slot(index) {
            Ok(slot) => CommandResult::success(show_slot(&slot)),
            Err(e) => CommandResult::failure(e.to_string()),
        },

        None => CommandResult::success(
            ctx.data.registry.list_all().iter().map(show_slot).collect::<Vec<String>>().join("\n"),
        ),
    }
}
