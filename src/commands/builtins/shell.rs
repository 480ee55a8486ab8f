use snafu::OptionExt;

use crate::commands::command::{BuiltinCommand, CommandContext, CommandOutput};
use crate::commands::error::{CommandError, NoHelpTopicSnafu};
use crate::commands::invocation::{Invocation, OptionPolicy};

pub struct Echo;

impl BuiltinCommand for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn description(&self) -> &'static str {
        "Display a line of text"
    }

    fn usage(&self) -> &'static str {
        "echo [string...]"
    }

    fn options(&self) -> OptionPolicy {
        OptionPolicy::Verbatim
    }

    fn run(
        &self,
        _context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::Text(invocation.args.join(" ")))
    }
}

pub struct Clear;

impl BuiltinCommand for Clear {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn description(&self) -> &'static str {
        "Clear the terminal screen"
    }

    fn usage(&self) -> &'static str {
        "clear"
    }

    fn run(
        &self,
        _context: &mut CommandContext<'_>,
        _invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::Clear)
    }
}

pub struct Help;

impl BuiltinCommand for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "Display information about builtin commands"
    }

    fn usage(&self) -> &'static str {
        "help [command]"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        if let Some(topic) = invocation.first() {
            let command = context
                .registry
                .get(topic)
                .context(NoHelpTopicSnafu { topic })?;
            return Ok(CommandOutput::Text(format!(
                "{} - {}\n\nUsage: {}",
                command.name(),
                command.description(),
                command.usage()
            )));
        }

        let mut output = String::from("Available commands:\n\n");
        for command in context.registry.commands() {
            output.push_str(&format!(
                "{:<10} - {}\n",
                command.name(),
                command.description()
            ));
        }
        output.push_str("\nType \"help [command]\" for more information about a specific command.");
        Ok(CommandOutput::Text(output))
    }
}

pub struct HistoryCommand;

impl BuiltinCommand for HistoryCommand {
    fn name(&self) -> &'static str {
        "history"
    }

    fn description(&self) -> &'static str {
        "Show previously entered commands"
    }

    fn usage(&self) -> &'static str {
        "history"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        _invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let listing = context
            .history
            .oldest_first()
            .enumerate()
            .map(|(index, line)| format!("{:>4}  {line}", index + 1))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(CommandOutput::Text(listing))
    }
}

pub struct Exit;

impl BuiltinCommand for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn description(&self) -> &'static str {
        "Save the session and leave the shell"
    }

    fn usage(&self) -> &'static str {
        "exit"
    }

    fn run(
        &self,
        _context: &mut CommandContext<'_>,
        _invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::Exit)
    }
}
