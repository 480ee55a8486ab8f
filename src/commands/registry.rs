use hashlink::LinkedHashMap;
use snafu::{OptionExt, ResultExt};
use tracing::debug;

use super::builtins;
use super::command::{BuiltinCommand, CommandContext, CommandOutput};
use super::error::{CommandFailedSnafu, CommandNotFoundSnafu, DispatchError};
use super::invocation::Invocation;
use crate::parser::ParsedCommand;

/// Commands by name, kept in registration order for `help`
#[derive(Default)]
pub struct CommandRegistry {
    commands: LinkedHashMap<&'static str, Box<dyn BuiltinCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Adds a command, replacing any command registered under the same name
    pub fn register(&mut self, command: impl BuiltinCommand + 'static) {
        self.commands.replace(command.name(), Box::new(command));
    }

    pub fn get(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands.get(name).map(Box::as_ref)
    }

    pub fn commands(&self) -> impl Iterator<Item = &dyn BuiltinCommand> {
        self.commands.values().map(Box::as_ref)
    }

    /// Runs one parsed line. Unknown commands and command failures both come
    /// back as a `DispatchError` naming the command.
    pub fn dispatch(
        &self,
        context: &mut CommandContext<'_>,
        parsed: ParsedCommand,
    ) -> Result<CommandOutput, DispatchError> {
        let name = parsed.command.clone();
        let command = self.get(&name).context(CommandNotFoundSnafu { name: &name })?;
        debug!("Dispatching '{name}' with {} argument(s)", parsed.args.len());

        Invocation::new(parsed, command.options())
            .and_then(|invocation| command.run(context, invocation))
            .context(CommandFailedSnafu { name })
    }
}
