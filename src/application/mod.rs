mod application;
pub mod data;
mod runtime_config;
mod terminal_renderer;

pub use application::{Application, ApplicationError};
pub use runtime_config::RuntimeConfig;
pub use terminal_renderer::TerminalRenderer;
