use derive_more::Display;
use tracing::debug;

use super::completion::{Completion, complete};
use super::history::History;
use crate::commands::{CommandContext, CommandOutput, CommandRegistry};
use crate::filesystem::{FilesystemError, VirtualFilesystem};
use crate::parser;
use crate::process::ProcessRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LineKind {
    #[display("input")]
    Input,
    #[display("output")]
    Output,
    #[display("error")]
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
    pub text: String,
    pub kind: LineKind,
}

impl TerminalLine {
    fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// What one submitted line did to the terminal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Everything shown before this line has to go
    pub did_clear: bool,
    pub exit_requested: bool,
    pub lines: Vec<TerminalLine>,
}

/// One terminal session: a filesystem, its processes and the commands that
/// operate on them.
pub struct Shell {
    filesystem: VirtualFilesystem,
    processes: ProcessRegistry,
    registry: CommandRegistry,
    history: History,
}

impl Shell {
    pub fn new(user: &str) -> Self {
        Self {
            filesystem: VirtualFilesystem::new(user),
            processes: ProcessRegistry::new(),
            registry: CommandRegistry::with_builtins(),
            history: History::default(),
        }
    }

    pub fn filesystem(&self) -> &VirtualFilesystem {
        &self.filesystem
    }

    pub fn processes(&self) -> &ProcessRegistry {
        &self.processes
    }

    pub fn processes_mut(&mut self) -> &mut ProcessRegistry {
        &mut self.processes
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn current_path(&self) -> String {
        self.filesystem.current_path()
    }

    /// Runs one input line to completion.
    pub fn execute(&mut self, line: &str) -> ExecutionOutcome {
        let line = line.trim();
        let mut outcome = ExecutionOutcome::default();
        if line.is_empty() {
            return outcome;
        }

        self.history.record(line);
        outcome.lines.push(TerminalLine::new(
            format!("{} $ {line}", self.filesystem.current_path()),
            LineKind::Input,
        ));

        let mut context = CommandContext {
            filesystem: &mut self.filesystem,
            processes: &mut self.processes,
            registry: &self.registry,
            history: &self.history,
        };

        match self.registry.dispatch(&mut context, parser::parse(line)) {
            Ok(CommandOutput::Text(text)) => {
                if !text.is_empty() {
                    outcome.lines.push(TerminalLine::new(text, LineKind::Output));
                }
            }
            Ok(CommandOutput::Clear) => {
                outcome.lines.clear();
                outcome.did_clear = true;
            }
            Ok(CommandOutput::Exit) => outcome.exit_requested = true,
            Err(error) => {
                debug!("Command failed ({}): {error}", error.kind());
                outcome
                    .lines
                    .push(TerminalLine::new(error.to_string(), LineKind::Error));
            }
        }

        outcome
    }

    pub fn complete(&self, input: &str) -> Completion {
        complete(&self.filesystem, input)
    }

    pub fn serialize(&self) -> Result<String, FilesystemError> {
        self.filesystem.serialize()
    }

    pub fn restore(&mut self, snapshot: &str) -> Result<(), FilesystemError> {
        self.filesystem.restore(snapshot)
    }

    /// Back to a fresh session: initial tree, only protected processes
    pub fn reset(&mut self) {
        self.filesystem.reset();
        self.processes.clear();
        self.history = History::default();
    }
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use crate::shell::Direction;

    #[fixture]
    fn shell() -> Shell {
        Shell::new("user")
    }

    /// Text of the last line produced by `line`
    fn run(shell: &mut Shell, line: &str) -> String {
        shell
            .execute(line)
            .lines
            .last()
            .map(|line| line.text.clone())
            .unwrap_or_default()
    }

    fn output(shell: &mut Shell, line: &str) -> Vec<TerminalLine> {
        shell.execute(line).lines.into_iter().skip(1).collect()
    }

    #[rstest]
    fn blank_lines_do_nothing(mut shell: Shell) {
        assert_eq!(shell.execute("   "), ExecutionOutcome::default());
        assert!(shell.history().is_empty());
    }

    #[rstest]
    fn echoes_input_with_prompt(mut shell: Shell) {
        shell.execute("cd /tmp");
        let outcome = shell.execute("pwd");

        assert_eq!(
            outcome.lines,
            vec![
                TerminalLine::new("/tmp $ pwd", LineKind::Input),
                TerminalLine::new("/tmp", LineKind::Output),
            ]
        );
    }

    #[rstest]
    fn unknown_command_is_an_error_line(mut shell: Shell) {
        assert_eq!(
            output(&mut shell, "frobnicate --now"),
            vec![TerminalLine::new("frobnicate: command not found", LineKind::Error)]
        );
    }

    #[rstest]
    fn ls_lists_directories_before_files(mut shell: Shell) {
        shell.execute("cd /home/user");
        shell.execute("touch a.txt");
        shell.execute("mkdir docs");

        assert_eq!(run(&mut shell, "ls"), "docs/  welcome.txt  a.txt");
        assert_eq!(run(&mut shell, "ls /tmp"), "Directory is empty");
        assert_eq!(
            run(&mut shell, "ls nowhere"),
            "ls: cannot access 'nowhere': No such directory"
        );
    }

    #[rstest]
    fn ls_long_shows_metadata(mut shell: Shell) {
        let listing = run(&mut shell, "ls -l /home/user");
        assert!(listing.starts_with("-rw-r--r-- user "));
        assert!(listing.ends_with(" welcome.txt (64 bytes)"));

        let root_listing = run(&mut shell, "ls --long");
        let first = root_listing.lines().next().unwrap();
        assert!(first.starts_with("drwxr-xr-x root "));
        assert!(first.ends_with(" bin/"));
        assert_eq!(root_listing.lines().count(), 6);
    }

    #[rstest]
    fn ls_rejects_unknown_options(mut shell: Shell) {
        assert_eq!(run(&mut shell, "ls -z"), "ls: invalid option '-z'");
    }

    #[rstest]
    fn cd_defaults_to_home(mut shell: Shell) {
        shell.execute("cd");
        assert_eq!(run(&mut shell, "pwd"), "/home/user");
    }

    #[rstest]
    fn cd_into_missing_directory_keeps_pwd(mut shell: Shell) {
        shell.execute("cd /home");
        let failure = shell.execute("cd nowhere");

        assert_eq!(
            failure.lines.last().unwrap(),
            &TerminalLine::new("cd: nowhere: No such directory", LineKind::Error)
        );
        assert_eq!(run(&mut shell, "pwd"), "/home");
    }

    #[rstest]
    fn mkdir_twice_reports_existing(mut shell: Shell) {
        assert!(output(&mut shell, "mkdir foo").is_empty());
        assert_eq!(
            output(&mut shell, "mkdir foo"),
            vec![TerminalLine::new(
                "mkdir: cannot create directory 'foo': File exists",
                LineKind::Error
            )]
        );
        assert_eq!(run(&mut shell, "mkdir"), "mkdir: missing operand");
    }

    #[rstest]
    fn touch_then_cat(mut shell: Shell) {
        shell.execute("touch empty.txt");
        assert!(output(&mut shell, "cat empty.txt").is_empty());
        assert_eq!(run(&mut shell, "touch"), "touch: missing file operand");
        assert_eq!(
            run(&mut shell, "cat /home/user/welcome.txt"),
            "Welcome to Mini Core Web!\nType \"help\" to see available commands."
        );
    }

    #[rstest]
    fn cat_reports_missing_files(mut shell: Shell) {
        assert_eq!(
            run(&mut shell, "cat nonexistent.txt"),
            "cat: nonexistent.txt: No such file"
        );
        assert_eq!(run(&mut shell, "cat"), "cat: missing file operand");
        assert_eq!(run(&mut shell, "cat home"), "cat: home: No such file");
    }

    #[rstest]
    fn rm_needs_recursive_for_populated_directories(mut shell: Shell) {
        shell.execute("mkdir dir");
        shell.execute("cd dir");
        shell.execute("touch file.txt");
        shell.execute("cd ..");

        assert_eq!(
            run(&mut shell, "rm dir"),
            "rm: cannot remove 'dir': Directory not empty"
        );
        assert!(run(&mut shell, "ls").contains("dir/"));

        assert!(output(&mut shell, "rm -r dir").is_empty());
        assert!(!run(&mut shell, "ls").contains("dir/"));
    }

    #[rstest]
    fn rm_distinguishes_missing_entries(mut shell: Shell) {
        assert_eq!(
            run(&mut shell, "rm ghost"),
            "rm: cannot remove 'ghost': No such file or directory"
        );
        assert_eq!(
            run(&mut shell, "rm --recursive ghost"),
            "rm: cannot remove 'ghost': No such file or directory"
        );
        assert_eq!(run(&mut shell, "rm"), "rm: missing operand");
    }

    #[rstest]
    fn echo_joins_arguments(mut shell: Shell) {
        assert_eq!(run(&mut shell, "echo  hello   world"), "hello world");
        assert_eq!(run(&mut shell, "echo -n hi"), "-n hi");
        assert!(output(&mut shell, "echo").is_empty());
    }

    #[rstest]
    #[case("echo -n true", "-n true")]
    #[case("echo -v one -v two", "-v one -v two")]
    #[case("echo --x --x", "--x --x")]
    fn echo_keeps_option_words(mut shell: Shell, #[case] line: &str, #[case] expected: &str) {
        assert_eq!(run(&mut shell, line), expected);
    }

    #[rstest]
    fn rm_flag_before_a_file_named_true(mut shell: Shell) {
        shell.execute("touch true");
        assert!(output(&mut shell, "rm -r true").is_empty());
        assert!(!run(&mut shell, "ls").contains("true"));
    }

    #[rstest]
    fn deep_session_restores_in_a_new_shell(mut shell: Shell) {
        for level in 0..200 {
            shell.execute(&format!("mkdir d{level}"));
            shell.execute(&format!("cd d{level}"));
        }
        let snapshot = shell.serialize().unwrap();

        let mut next = Shell::new("user");
        next.restore(&snapshot).unwrap();

        assert_eq!(next.filesystem().root(), shell.filesystem().root());
    }

    #[rstest]
    fn clear_sentinel_is_not_text(mut shell: Shell) {
        let cleared = shell.execute("clear");
        assert!(cleared.did_clear);
        assert!(cleared.lines.is_empty());

        let echoed = shell.execute("echo __CLEAR__");
        assert!(!echoed.did_clear);
        assert_eq!(echoed.lines.last().unwrap().text, "__CLEAR__");
    }

    #[rstest]
    fn ps_lists_processes(mut shell: Shell) {
        shell.processes_mut().start_process("editor", "vim notes.txt", "");

        let table = run(&mut shell, "ps");
        let rows: Vec<_> = table.lines().collect();

        assert_eq!(rows[0], "PID\tSTATUS\tTIME\tCOMMAND");
        assert!(rows[1].starts_with("1\trunning\t"));
        assert!(rows[1].ends_with("\tinit"));
        assert!(rows[2].starts_with("2\trunning\t"));
        assert!(rows[2].ends_with("\tvim notes.txt"));
    }

    #[rstest]
    fn kill_refuses_the_system_process(mut shell: Shell) {
        assert_eq!(run(&mut shell, "kill 1"), "kill: (1) - Permission denied");
        assert!(run(&mut shell, "ps").contains("1\trunning\t"));
    }

    #[rstest]
    fn kill_removes_user_processes(mut shell: Shell) {
        let pid = shell.processes_mut().start_process("job", "sleep", "").pid;

        assert!(output(&mut shell, &format!("kill {pid}")).is_empty());
        assert!(shell.processes().get_by_pid(pid).is_none());
        assert_eq!(
            run(&mut shell, &format!("kill {pid}")),
            format!("kill: ({pid}) - No such process")
        );
    }

    #[rstest]
    #[case("kill", "kill: missing pid operand")]
    #[case("kill abc", "kill: invalid pid 'abc'")]
    #[case("kill -5", "kill: invalid option '-5'")]
    #[case("kill 99", "kill: (99) - No such process")]
    fn kill_reports_bad_requests(mut shell: Shell, #[case] line: &str, #[case] expected: &str) {
        assert_eq!(run(&mut shell, line), expected);
    }

    #[rstest]
    fn help_lists_and_describes_commands(mut shell: Shell) {
        let listing = run(&mut shell, "help");
        assert!(listing.starts_with("Available commands:\n\n"));
        assert!(listing.contains(&format!("{:<10} - List directory contents\n", "ls")));
        assert!(listing.contains(&format!("{:<10} - Kill a process\n", "kill")));

        assert_eq!(
            run(&mut shell, "help cat"),
            "cat - Concatenate files and print on the standard output\n\nUsage: cat file"
        );
        assert_eq!(
            run(&mut shell, "help nothing"),
            "help: no help topics match 'nothing'"
        );
    }

    #[rstest]
    fn history_command_lists_oldest_first(mut shell: Shell) {
        shell.execute("pwd");
        shell.execute("ls");
        shell.execute("pwd");

        assert_eq!(run(&mut shell, "history"), "   1  ls\n   2  pwd\n   3  history");
        assert_eq!(shell.history_mut().navigate(Direction::Up), Some("history"));
    }

    #[rstest]
    fn exit_is_requested_not_printed(mut shell: Shell) {
        let outcome = shell.execute("exit");
        assert!(outcome.exit_requested);
        assert_eq!(outcome.lines.len(), 1);
    }

    #[rstest]
    fn completion_sees_the_working_directory(mut shell: Shell) {
        shell.execute("cd");
        assert_eq!(
            shell.complete("cat wel"),
            Completion::Unique("cat welcome.txt".to_string())
        );
    }

    #[rstest]
    fn snapshot_survives_a_new_session(mut shell: Shell) {
        shell.execute("mkdir projects");
        shell.execute("cd projects");
        shell.execute("touch todo.txt");
        let snapshot = shell.serialize().unwrap();

        let mut next = Shell::new("user");
        next.restore(&snapshot).unwrap();

        assert_eq!(next.filesystem().root(), shell.filesystem().root());
        assert_eq!(run(&mut next, "pwd"), "/");
        assert_eq!(run(&mut next, "ls projects"), "todo.txt");
    }

    #[rstest]
    fn malformed_snapshot_keeps_session(mut shell: Shell) {
        shell.execute("mkdir keep");
        assert!(shell.restore("{broken").is_err());
        assert!(run(&mut shell, "ls").contains("keep/"));
    }

    #[rstest]
    fn reset_starts_over(mut shell: Shell) {
        shell.execute("mkdir scratch");
        shell.processes_mut().start_process("job", "sleep", "");

        shell.reset();

        assert!(!run(&mut shell, "ls").contains("scratch/"));
        assert_eq!(shell.processes().all().len(), 1);
        assert_eq!(shell.history().len(), 1);
    }
}
