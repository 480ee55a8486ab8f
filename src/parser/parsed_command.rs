/// Value an option reports when no word was bound to it
pub const FLAG_VALUE: &str = "true";

/// One option occurrence on a command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOption {
    pub name: String,
    /// The word bound to the option, if the parser consumed one
    pub consumed: Option<String>,
    /// Written as `--name` rather than `-name`
    pub long: bool,
    /// Number of positional arguments that preceded the option
    pub position: usize,
}

impl CommandOption {
    pub fn value(&self) -> &str {
        self.consumed.as_deref().unwrap_or(FLAG_VALUE)
    }

    /// The option as it was typed, without its value
    pub fn token(&self) -> String {
        let dashes = if self.long { "--" } else { "-" };
        format!("{dashes}{}", self.name)
    }
}

/// Options of a command line, every occurrence in the order written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    occurrences: Vec<CommandOption>,
}

impl CommandOptions {
    /// Value of `name` as a name to value map sees it: the last occurrence wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.occurrences
            .iter()
            .rev()
            .find(|option| option.name == name)
            .map(CommandOption::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandOption> {
        self.occurrences.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    fn push(&mut self, option: CommandOption) {
        self.occurrences.push(option);
    }
}

impl IntoIterator for CommandOptions {
    type Item = CommandOption;
    type IntoIter = std::vec::IntoIter<CommandOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.occurrences.into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub args: Vec<String>,
    pub options: CommandOptions,
}

/// Splits a command line into command name, positional arguments and options.
///
/// Tokens are separated by whitespace; there is no quoting. A token starting
/// with `-` is an option named after its dashes. It takes the next token as
/// its value unless that token is missing or is itself an option, in which
/// case its value reads as [`FLAG_VALUE`].
pub fn parse(line: &str) -> ParsedCommand {
    let mut tokens = line.split_whitespace().peekable();
    let command = tokens.next().unwrap_or_default().to_string();
    let mut args = Vec::new();
    let mut options = CommandOptions::default();

    while let Some(token) = tokens.next() {
        match option_name(token) {
            Some(name) => {
                let consumed = tokens.next_if(|next| !next.starts_with('-'));
                options.push(CommandOption {
                    name: name.to_string(),
                    consumed: consumed.map(str::to_string),
                    long: token.starts_with("--"),
                    position: args.len(),
                });
            }
            None => args.push(token.to_string()),
        }
    }

    ParsedCommand {
        command,
        args,
        options,
    }
}

fn option_name(token: &str) -> Option<&str> {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
}
