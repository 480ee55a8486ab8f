use snafu::OptionExt;

use crate::commands::command::{BuiltinCommand, CommandContext, CommandOutput};
use crate::commands::error::{
    CommandError, InvalidPidSnafu, MissingOperandSnafu, NoSuchProcessSnafu,
    ProtectedProcessSnafu,
};
use crate::commands::invocation::Invocation;
use crate::ext::OffsetDateTimeExt;

const PS_HEADER: &str = "PID\tSTATUS\tTIME\tCOMMAND";

pub struct Ps;

impl BuiltinCommand for Ps {
    fn name(&self) -> &'static str {
        "ps"
    }

    fn description(&self) -> &'static str {
        "Report process status"
    }

    fn usage(&self) -> &'static str {
        "ps"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        _invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let rows = context.processes.all().iter().map(|process| {
            format!(
                "{}\t{}\t{}\t{}",
                process.pid,
                process.status,
                process.start_time.to_clock_string(),
                process.command
            )
        });

        let table = std::iter::once(PS_HEADER.to_string())
            .chain(rows)
            .collect::<Vec<_>>()
            .join("\n");
        Ok(CommandOutput::Text(table))
    }
}

pub struct Kill;

impl BuiltinCommand for Kill {
    fn name(&self) -> &'static str {
        "kill"
    }

    fn description(&self) -> &'static str {
        "Kill a process"
    }

    fn usage(&self) -> &'static str {
        "kill pid"
    }

    fn run(
        &self,
        context: &mut CommandContext<'_>,
        invocation: Invocation,
    ) -> Result<CommandOutput, CommandError> {
        let raw_pid = invocation.first().context(MissingOperandSnafu {
            operand: "pid operand",
        })?;
        let pid: u32 = raw_pid
            .parse()
            .ok()
            .context(InvalidPidSnafu { pid: raw_pid })?;

        let process = context
            .processes
            .get_by_pid(pid)
            .context(NoSuchProcessSnafu { pid })?;
        // Protected processes keep their status, refuse before the registry sees them
        if process.is_protected() {
            return ProtectedProcessSnafu { pid }.fail();
        }

        let id = process.id.clone();
        context
            .processes
            .kill_process(&id)
            .ok()
            .context(NoSuchProcessSnafu { pid })?;
        Ok(CommandOutput::empty())
    }
}
