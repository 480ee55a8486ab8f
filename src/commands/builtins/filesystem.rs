use snafu::{OptionExt, ResultExt};

use crate::commands::command::{BuiltinCommand, CommandContext, CommandOutput};
use crate::commands::error::{
    CannotAccessSnafu, CannotCreateDirectorySnafu, CannotRemoveSnafu, CannotTouchSnafu,
    CommandError, MissingOperandSnafu, NoSuchDirectorySnafu, NoSuchFileSnafu,
};
use crate::commands::invocation::{FlagSpec, Invocation, OptionPolicy};
use crate::ext::OffsetDateTimeExt;
use crate::filesystem::Node;

const EMPTY_DIRECTORY: &str = "Directory is empty";

pub struct Ls;

impl Ls {
    fn short_listing(entries: &[&Node]) -> String {
        let directories = entries
            .iter()
            .filter(|node| node.is_directory())
            .map(|node| format!("{}/", node.name()));
        let files = entries
            .iter()
            .filter(|node| !node.is_directory())
            .map(|node| node.name().to_string());

        directories.chain(files).collect::<Vec<_>>().join("  ")
    }

    fn long_listing(entries: &[&Node]) -> String {
        entries
            .iter()
            .map(|node| {
                let metadata = node.metadata();
                let prefix = format!(
                    "{} {} {}",
                    metadata.permissions,
                    metadata.owner,
                    metadata.updated_at.to_listing_string()
                );
                match node {
                    Node::Directory(directory) => format!("d{prefix} {}/", directory.name()),
                    Node::File(file) => {
                        format!("-{prefix} {} ({} bytes)", file.name(), file.size())
                    }
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl BuiltinCommand for Ls {
    fn name(&self) -> &'static str {
        "ls"
    }

    fn description(&self) -> &'static str {
        "List directory contents"
    }

    fn usage(&self) -> &'static str {
        "ls [-l] [directory]"
    }

    fn options(&self) -> OptionPolicy {
        const FLAGS: &[FlagSpec] = &[FlagSpec::new('l', "long")];
        OptionPolicy::Flags(FLAGS)
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let target = invocation.first();
        let entries = context.filesystem.list(target).ok().context(CannotAccessSnafu {
            path: target.unwrap_or("."),
        })?;

        if entries.is_empty() {
            return Ok(CommandOutput::text(EMPTY_DIRECTORY));
        }

        let listing = if invocation.flag("long") {
            Self::long_listing(&entries)
        } else {
            Self::short_listing(&entries)
        };
        Ok(CommandOutput::Text(listing))
    }
}

pub struct Cd;

impl BuiltinCommand for Cd {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn description(&self) -> &'static str {
        "Change the current directory"
    }

    fn usage(&self) -> &'static str {
        "cd [directory]"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let target = match invocation.first() {
            Some(path) => path.to_string(),
            None => context.filesystem.home_path(),
        };

        context
            .filesystem
            .change_directory(&target)
            .ok()
            .context(NoSuchDirectorySnafu { path: target })?;
        Ok(CommandOutput::empty())
    }
}

pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn description(&self) -> &'static str {
        "Print name of current/working directory"
    }

    fn usage(&self) -> &'static str {
        "pwd"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        _invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput::Text(context.filesystem.current_path()))
    }
}

pub struct Mkdir;

impl BuiltinCommand for Mkdir {
    fn name(&self) -> &'static str {
        "mkdir"
    }

    fn description(&self) -> &'static str {
        "Create a directory"
    }

    fn usage(&self) -> &'static str {
        "mkdir directory"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let name = invocation.first().context(MissingOperandSnafu {
            operand: "operand",
        })?;

        context
            .filesystem
            .create_directory(name)
            .context(CannotCreateDirectorySnafu { name })?;
        Ok(CommandOutput::empty())
    }
}

pub struct Touch;

impl BuiltinCommand for Touch {
    fn name(&self) -> &'static str {
        "touch"
    }

    fn description(&self) -> &'static str {
        "Create an empty file or update its timestamp"
    }

    fn usage(&self) -> &'static str {
        "touch file"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let name = invocation.first().context(MissingOperandSnafu {
            operand: "file operand",
        })?;

        context
            .filesystem
            .touch(name)
            .context(CannotTouchSnafu { name })?;
        Ok(CommandOutput::empty())
    }
}

pub struct Cat;

impl BuiltinCommand for Cat {
    fn name(&self) -> &'static str {
        "cat"
    }

    fn description(&self) -> &'static str {
        "Concatenate files and print on the standard output"
    }

    fn usage(&self) -> &'static str {
        "cat file"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let path = invocation.first().context(MissingOperandSnafu {
            operand: "file operand",
        })?;

        let file = context
            .filesystem
            .get_file(path)
            .ok()
            .context(NoSuchFileSnafu { path })?;
        Ok(CommandOutput::text(file.content()))
    }
}

pub struct Rm;

impl BuiltinCommand for Rm {
    fn name(&self) -> &'static str {
        "rm"
    }

    fn description(&self) -> &'static str {
        "Remove files or directories"
    }

    fn usage(&self) -> &'static str {
        "rm [-r] name"
    }

    fn options(&self) -> OptionPolicy {
        const FLAGS: &[FlagSpec] = &[FlagSpec::new('r', "recursive")];
        OptionPolicy::Flags(FLAGS)
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let name = invocation.first().context(MissingOperandSnafu {
            operand: "operand",
        })?;

        context
            .filesystem
            .remove(name, invocation.flag("recursive"))
            .context(CannotRemoveSnafu { name })?;
        Ok(CommandOutput::empty())
    }
}
