use std::io::BufRead;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use minicore::config::{SessionConfig, SessionConfigError};
use minicore::filesystem::{FilesystemError, path::validate_name};
use minicore::persistence::{SnapshotStore, SnapshotStoreError};
use minicore::shell::Shell;

use crate::application::{RuntimeConfig, TerminalRenderer};

const COMPLETION_KEY: char = '\t';

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let config = SessionConfig::read(&app_config.root)
            .await
            .context(SessionConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let user = app_config.user.unwrap_or(config.user);
        validate_name(&user)
            .ok()
            .context(InvalidUserSnafu { user: &user })?;

        let store = SnapshotStore::new(app_config.root.join(&config.storage));
        let mut shell = Shell::new(&user);
        let mut renderer = TerminalRenderer::stdout();

        Self::restore_session(&store, &mut shell, &mut renderer).await;
        let session = Self::repl(&mut shell, &mut renderer, std::io::stdin().lock());
        if let Err(error) = &session {
            warn!("Terminal failed, ending the session: {error}");
        }

        if config.autosave {
            let snapshot = shell.serialize().context(SerializeSnafu)?;
            store.save(&user, &snapshot).await.context(SaveSnafu)?;
        } else {
            info!("Autosave disabled, session of '{user}' discarded");
        }

        session.context(TerminalSnafu)
    }

    /// Loads the saved session of the shell's user. Failures are reported and
    /// the fresh tree is kept.
    async fn restore_session<W: std::io::Write>(
        store: &SnapshotStore,
        shell: &mut Shell,
        renderer: &mut TerminalRenderer<W>,
    ) {
        let user = shell.filesystem().user().to_string();
        let restored = match store.load(&user).await {
            Ok(Some(snapshot)) => shell
                .restore(&snapshot)
                .map(|_| true)
                .map_err(|e| e.to_string()),
            Ok(None) => Ok(false),
            Err(e) => Err(e.to_string()),
        };

        match restored {
            Ok(true) => info!("Restored session of '{user}'"),
            Ok(false) => {}
            Err(reason) => {
                warn!("Could not restore session of '{user}': {reason}");
                if let Err(error) = renderer.notice(&format!("Starting fresh: {reason}")) {
                    warn!("Could not show the restore notice: {error}");
                }
            }
        }
    }

    /// Reads lines until `exit` or the end of input.
    ///
    /// A line ending in a tab is not run. It is completed against the working
    /// directory and the candidates are shown instead.
    fn repl<W: std::io::Write>(
        shell: &mut Shell,
        renderer: &mut TerminalRenderer<W>,
        input: impl BufRead,
    ) -> std::io::Result<()> {
        let mut lines = input.lines();

        loop {
            renderer.prompt(&shell.current_path())?;
            let Some(line) = lines.next().transpose()? else {
                debug!("End of input");
                return Ok(());
            };

            if let Some(partial) = line.strip_suffix(COMPLETION_KEY) {
                renderer.completion(&shell.complete(partial))?;
                continue;
            }

            let outcome = shell.execute(&line);
            renderer.render(&outcome)?;
            if outcome.exit_requested {
                return Ok(());
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    SessionConfigError { source: SessionConfigError },
    #[snafu(display("'{}' is not a valid user name", user))]
    InvalidUserError { user: String },
    #[snafu(display("Terminal input or output failed"))]
    TerminalError { source: std::io::Error },
    #[snafu(display("Failed to serialize the session"))]
    SerializeError { source: FilesystemError },
    #[snafu(display("Failed to save the session"))]
    SaveError { source: SnapshotStoreError },
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[compio::test]
    async fn saved_session_is_restored() {
        let directory = TempDir::new().unwrap();
        let store = SnapshotStore::new(directory.path());

        let mut previous = Shell::new("user");
        previous.execute("mkdir projects");
        store
            .save("user", &previous.serialize().unwrap())
            .await
            .unwrap();

        let mut shell = Shell::new("user");
        let mut renderer = TerminalRenderer::new(Vec::new());
        Application::restore_session(&store, &mut shell, &mut renderer).await;

        assert_eq!(shell.filesystem().root(), previous.filesystem().root());
    }

    #[compio::test]
    async fn malformed_session_keeps_fresh_tree() {
        let directory = TempDir::new().unwrap();
        let store = SnapshotStore::new(directory.path());
        store.save("user", "{not a tree").await.unwrap();

        let mut shell = Shell::new("user");
        let fresh = shell.filesystem().root().clone();
        let mut renderer = TerminalRenderer::new(Vec::new());
        Application::restore_session(&store, &mut shell, &mut renderer).await;

        assert_eq!(shell.filesystem().root(), &fresh);
    }

    fn run_repl(shell: &mut Shell, input: &str) -> String {
        colored::control::set_override(false);
        let mut output = Vec::new();
        let mut renderer = TerminalRenderer::new(&mut output);
        Application::repl(shell, &mut renderer, input.as_bytes()).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn repl_runs_lines_until_exit() {
        let mut shell = Shell::new("user");
        let output = run_repl(&mut shell, "mkdir docs\ncd docs\npwd\nexit\npwd\n");

        assert_eq!(output, "/ $ / $ /docs $ /docs\n/docs $ ");
        assert_eq!(shell.history().most_recent_first().next(), Some("exit"));
    }

    #[test]
    fn repl_completes_lines_ending_in_tab() {
        let mut shell = Shell::new("user");
        let output = run_repl(&mut shell, "cd /home/user\ncat wel\t\n");

        assert_eq!(output, "/ $ /home/user $ cat welcome.txt\n/home/user $ ");
        assert!(shell.history().most_recent_first().all(|line| !line.starts_with("cat")));
    }

    #[test]
    fn repl_stops_at_end_of_input() {
        let mut shell = Shell::new("user");
        assert_eq!(run_repl(&mut shell, ""), "/ $ ");
    }

    #[compio::test]
    async fn invalid_user_is_rejected_before_the_shell_starts() {
        let directory = TempDir::new().unwrap();
        let result = Application::run(RuntimeConfig {
            root: directory.path().to_path_buf(),
            user: Some("../root".to_string()),
        })
        .await;

        assert!(matches!(result, Err(ApplicationError::InvalidUserError { .. })));
    }
}
