pub mod anonymize_command;
pub mod list_command;
