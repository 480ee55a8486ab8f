use derive_more::Display;
use snafu::{OptionExt, Snafu};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

/// Processes whose name starts with this prefix belong to the system
pub const PROTECTED_PREFIX: &str = "system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ProcessStatus {
    #[display("running")]
    Running,
    #[display("stopped")]
    Stopped,
    #[display("finished")]
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub id: String,
    pub name: String,
    pub command: String,
    pub pid: u32,
    pub status: ProcessStatus,
    pub start_time: OffsetDateTime,
    pub end_time: Option<OffsetDateTime>,
    pub output: String,
}

impl Process {
    pub fn is_protected(&self) -> bool {
        is_protected_name(&self.name)
    }
}

pub fn is_protected_name(name: &str) -> bool {
    name.starts_with(PROTECTED_PREFIX)
}

/// Flat list of simulated processes in start order.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
    next_pid: u32,
}

impl Default for ProcessRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRegistry {
    /// Creates a registry holding the protected `system-init` process as pid 1.
    pub fn new() -> Self {
        let mut registry = Self {
            processes: Vec::new(),
            next_pid: 1,
        };
        registry.start_process("system-init", "init", "System initialization process");
        registry
    }

    pub fn start_process(
        &mut self,
        name: impl Into<String>,
        command: impl Into<String>,
        output: impl Into<String>,
    ) -> &Process {
        let pid = self.next_pid;
        self.next_pid += 1;

        let process = Process {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            command: command.into(),
            pid,
            status: ProcessStatus::Running,
            start_time: OffsetDateTime::now_utc(),
            end_time: None,
            output: output.into(),
        };
        debug!("Started process {} ({}) with pid {pid}", process.name, process.id);

        self.processes.push(process);
        &self.processes[self.processes.len() - 1]
    }

    pub fn all(&self) -> &[Process] {
        &self.processes
    }

    pub fn running(&self) -> impl Iterator<Item = &Process> {
        self.processes
            .iter()
            .filter(|process| process.status == ProcessStatus::Running)
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|process| process.id == id)
    }

    pub fn get_by_pid(&self, pid: u32) -> Option<&Process> {
        self.processes.iter().find(|process| process.pid == pid)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Process, ProcessError> {
        self.processes
            .iter_mut()
            .find(|process| process.id == id)
            .context(NotFoundSnafu { id })
    }

    pub fn stop_process(&mut self, id: &str) -> Result<(), ProcessError> {
        self.get_mut(id)?.status = ProcessStatus::Stopped;
        Ok(())
    }

    /// Marks a process finished. Unprotected processes leave the list,
    /// protected ones stay visible with their end time recorded.
    pub fn kill_process(&mut self, id: &str) -> Result<(), ProcessError> {
        let process = self.get_mut(id)?;
        process.status = ProcessStatus::Finished;
        process.end_time = Some(OffsetDateTime::now_utc());
        debug!("Killed process {} (pid {})", process.name, process.pid);

        if !process.is_protected() {
            self.processes.retain(|process| process.id != id);
        }
        Ok(())
    }

    pub fn append_output(&mut self, id: &str, output: &str) -> Result<(), ProcessError> {
        let process = self.get_mut(id)?;
        if !process.output.is_empty() {
            process.output.push('\n');
        }
        process.output.push_str(output);
        Ok(())
    }

    /// Drops every process that is not protected
    pub fn clear(&mut self) {
        self.processes.retain(Process::is_protected);
    }
}

#[derive(Debug, Snafu)]
pub enum ProcessError {
    #[snafu(display("No process with id {id}"))]
    NotFound { id: String },
}
