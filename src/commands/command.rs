use super::error::CommandError;
use super::invocation::{Invocation, OptionPolicy};
use super::registry::CommandRegistry;
use crate::filesystem::VirtualFilesystem;
use crate::process::ProcessRegistry;
use crate::shell::History;

/// What a command hands back to the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Text to append; empty text appends nothing
    Text(String),
    /// Wipe the visible output
    Clear,
    /// End the session
    Exit,
}

impl CommandOutput {
    pub fn text(text: impl Into<String>) -> Self {
        CommandOutput::Text(text.into())
    }

    pub fn empty() -> Self {
        CommandOutput::Text(String::new())
    }
}

/// State a command may read or change while it runs
pub struct CommandContext<'a> {
    pub filesystem: &'a mut VirtualFilesystem,
    pub processes: &'a mut ProcessRegistry,
    pub registry: &'a CommandRegistry,
    pub history: &'a History,
}

pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn usage(&self) -> &'static str;

    fn options(&self) -> OptionPolicy {
        OptionPolicy::Flags(&[])
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError>;
}
