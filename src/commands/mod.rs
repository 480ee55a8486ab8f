//! Command registry, dispatch and the builtin command set.

mod builtins;
mod command;
mod error;
mod invocation;
mod registry;

pub use command::{BuiltinCommand, CommandContext, CommandOutput};
pub use error::{CommandError, DispatchError, ErrorKind};
pub use invocation::{FlagSpec, Invocation, OptionPolicy};
pub use registry::CommandRegistry;
