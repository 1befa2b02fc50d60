pub mod command_macro;
