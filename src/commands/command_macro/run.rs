use crate::{
    dispatcher::DispatchResult,
    framework::{CommandResult, Context},
};

/// Run a user custom command on the next tick
pub fn run_macro(ctx: Context<'_>) -> CommandResult {
    let index = match ctx.args.integer("index") {
        Some(index) => index,
        None => return CommandResult::failure("Missing required parameter 'index'."),
    };

    let data = ctx.data;

    match data.dispatcher.run(&data.registry, &mut data.scheduler, index, &ctx.origin) {
        DispatchResult::Success => {
            let command = data.registry.get(index).ok().flatten().unwrap_or_default();

            CommandResult::success(format!("Sent a request to run command {} '{}'", index, command))
        }

        DispatchResult::Failure(reason) => CommandResult::failure(reason.to_string()),
    }
}
