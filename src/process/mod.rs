mod registry;

pub use registry::{Process, ProcessError, ProcessRegistry, ProcessStatus, is_protected_name};
