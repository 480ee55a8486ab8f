use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "A small simulated Unix shell")]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Directory holding minicore.yaml and the saved sessions
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Session user, overrides the config file
    #[clap(long, short)]
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::try_parse_from(["minicore"]).unwrap();
        assert!(matches!(cli.log_level, LogLevel::Warn));
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.user, None);
    }

    #[test]
    fn parses_all_options() {
        let cli = Cli::try_parse_from([
            "minicore",
            "--log-level",
            "debug",
            "--root",
            "/tmp/project",
            "-u",
            "alice",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, LogLevel::Debug));
        assert_eq!(cli.root, PathBuf::from("/tmp/project"));
        assert_eq!(cli.user.as_deref(), Some("alice"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        assert!(Cli::try_parse_from(["minicore", "--log-level", "loud"]).is_err());
    }
}
