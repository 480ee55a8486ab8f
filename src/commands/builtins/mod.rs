//! The commands every shell starts with.

mod filesystem;
mod process;
mod shell;

use super::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(filesystem::Ls);
    registry.register(filesystem::Cd);
    registry.register(filesystem::Pwd);
    registry.register(filesystem::Mkdir);
    registry.register(filesystem::Touch);
    registry.register(filesystem::Cat);
    registry.register(filesystem::Rm);
    registry.register(shell::Echo);
    registry.register(process::Ps);
    registry.register(process::Kill);
    registry.register(shell::Clear);
    registry.register(shell::Help);
    registry.register(shell::HistoryCommand);
    registry.register(shell::Exit);
}
