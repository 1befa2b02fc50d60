use crate::framework::{CommandResult, Context};

/// Remove every user custom command
pub fn clear_macros(ctx: Context<'_>) -> CommandResult {
    ctx.data.registry.clear_all();

    CommandResult::success("Removed all user custom commands.")
}
