use crate::filesystem::VirtualFilesystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    NoMatch,
    /// The whole input with its last word completed
    Unique(String),
    /// Every entry name starting with the last word
    Ambiguous(Vec<String>),
}

/// Completes the last space-separated word of `input` against the entries
/// of the working directory. Directories complete with a trailing `/`.
pub fn complete(filesystem: &VirtualFilesystem, input: &str) -> Completion {
    let prefix = input.rsplit(' ').next().unwrap_or_default();
    if prefix.is_empty() {
        return Completion::NoMatch;
    }

    let Ok(entries) = filesystem.list(None) else {
        return Completion::NoMatch;
    };
    let matches: Vec<_> = entries
        .into_iter()
        .filter(|node| node.name().starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [] => Completion::NoMatch,
        [node] => {
            let completed = if node.is_directory() {
                format!("{}/", node.name())
            } else {
                node.name().to_string()
            };
            let head = &input[..input.len() - prefix.len()];
            Completion::Unique(format!("{head}{completed}"))
        }
        several => Completion::Ambiguous(
            several
                .iter()
                .map(|node| node.name().to_string())
                .collect(),
        ),
    }
}
