mod parsed_command;

pub use parsed_command::{CommandOption, CommandOptions, FLAG_VALUE, ParsedCommand, parse};
