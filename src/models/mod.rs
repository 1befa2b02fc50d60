pub mod command_macro;
pub mod slot_store;
pub mod storage;
