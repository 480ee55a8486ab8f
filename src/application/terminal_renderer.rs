use std::io::{self, Write};

use colored::Colorize;

use minicore::shell::{Completion, ExecutionOutcome, LineKind};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Writes shell output to a terminal.
///
/// Input lines are not repeated, the terminal already shows what was typed
/// after the prompt.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        let colorful = supports_color::on(supports_color::Stream::Stdout).is_some();
        colored::control::set_override(colorful);
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn prompt(&mut self, cwd: &str) -> io::Result<()> {
        write!(self.out, "{} ", format!("{cwd} $").green().bold())?;
        self.out.flush()
    }

    pub fn render(&mut self, outcome: &ExecutionOutcome) -> io::Result<()> {
        if outcome.did_clear {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }

        for line in &outcome.lines {
            match line.kind {
                LineKind::Input => {}
                LineKind::Output => writeln!(self.out, "{}", line.text)?,
                LineKind::Error => writeln!(self.out, "{}", line.text.red())?,
            }
        }
        self.out.flush()
    }

    /// Shows a completed line, or every candidate when the prefix is shared.
    pub fn completion(&mut self, completion: &Completion) -> io::Result<()> {
        match completion {
            Completion::NoMatch => {}
            Completion::Unique(line) => writeln!(self.out, "{line}")?,
            Completion::Ambiguous(names) => writeln!(self.out, "{}", names.join("  "))?,
        }
        self.out.flush()
    }

    pub fn notice(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message.yellow())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
