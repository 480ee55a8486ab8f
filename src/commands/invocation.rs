use std::collections::HashSet;

use snafu::OptionExt;

use super::error::{CommandError, UnknownOptionSnafu};
use crate::parser::ParsedCommand;

/// A boolean option a command understands, e.g. `-r` / `--recursive`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagSpec {
    pub short: char,
    pub long: &'static str,
}

impl FlagSpec {
    pub const fn new(short: char, long: &'static str) -> Self {
        Self { short, long }
    }
}

/// How a command wants its options treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionPolicy {
    /// Only these flags; anything else is rejected
    Flags(&'static [FlagSpec]),
    /// Options are ordinary words and stay in the argument list
    Verbatim,
}

/// Arguments of a command after its option policy has been applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub args: Vec<String>,
    flags: HashSet<&'static str>,
}

impl Invocation {
    /// Applies `policy` to a parsed line.
    ///
    /// The parser binds the word after an option as its value. A flag has no
    /// value, so that word is handed back to the positional arguments at the
    /// place it was written (`rm -r dir` operates on `dir`).
    pub fn new(parsed: ParsedCommand, policy: OptionPolicy) -> Result<Self, CommandError> {
        let mut args = parsed.args;
        let mut flags = HashSet::new();
        let mut inserted = 0;

        for option in parsed.options {
            let mut returned = Vec::new();
            match policy {
                OptionPolicy::Verbatim => returned.push(option.token()),
                OptionPolicy::Flags(specs) => {
                    let matched = match_flags(specs, &option.name, option.long).context(
                        UnknownOptionSnafu {
                            option: option.token(),
                        },
                    )?;
                    flags.extend(matched);
                }
            }
            if let Some(word) = option.consumed {
                returned.push(word);
            }

            let at = option.position + inserted;
            inserted += returned.len();
            args.splice(at..at, returned);
        }

        Ok(Self { args, flags })
    }

    pub fn flag(&self, long: &str) -> bool {
        self.flags.contains(long)
    }

    pub fn first(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Long names of the flags an option spells. A short option may bundle
/// several flags (`-rf`).
fn match_flags(specs: &[FlagSpec], name: &str, long: bool) -> Option<Vec<&'static str>> {
    if long {
        return specs
            .iter()
            .find(|spec| spec.long == name)
            .map(|spec| vec![spec.long]);
    }
    if name.is_empty() {
        return None;
    }

    name.chars()
        .map(|short| {
            specs
                .iter()
                .find(|spec| spec.short == short)
                .map(|spec| spec.long)
        })
        .collect()
}
