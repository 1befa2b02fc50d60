use crate::{
    framework::{Command, Param, PermissionLevel},
    models::command_macro::MacroSlot,
    utils::prefix_command_description,
};

pub mod clear;
pub mod list;
pub mod run;
pub mod set;

/// The user custom command family: run, set, clear and list.
pub fn commands() -> Vec<Command> {
    vec![
        Command::from("q", run::run_macro)
            .description(prefix_command_description("Runs a user custom command."))
            .permission_level(PermissionLevel::Any)
            .cheats_required(true)
            .mandatory(Param::integer("index")),
        Command::from("qs", set::set_macro)
            .description(prefix_command_description(
                "Sets a user custom command. You can remove one by leaving the parameter 'command' unspecified.",
            ))
            .permission_level(PermissionLevel::Any)
            .cheats_required(true)
            .mandatory(Param::integer("index"))
            .optional(Param::string("command")),
        Command::from("qxx", clear::clear_macros)
            .description(prefix_command_description("Clears all user custom commands."))
            .permission_level(PermissionLevel::Any)
            .cheats_required(true),
        Command::from("ql", list::list_macro)
            .description(prefix_command_description(
                "Logs a user custom command. You can list all entries by leaving the parameter 'index' unspecified.",
            ))
            .permission_level(PermissionLevel::Any)
            .cheats_required(true)
            .optional(Param::integer("index")),
    ]
}

pub fn show_slot(slot: &MacroSlot<'_>) -> String {
    match slot.text {
        Some(text) => format!("§7{}: §f{}", slot.index, text),
        None => format!("§7{}: §8(unset)", slot.index),
    }
}
