mod session_config;

pub use session_config::{SessionConfig, SessionConfigError};
