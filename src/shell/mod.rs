//! The session a terminal talks to: line execution, completion and history.

mod completion;
mod history;
mod session;

pub use completion::Completion;
pub use history::{Direction, HISTORY_LIMIT, History};
pub use session::{ExecutionOutcome, LineKind, Shell, TerminalLine};
