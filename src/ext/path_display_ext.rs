use std::path::{Component, Path, PathBuf};

/// Readable rendering of a path for messages and logs.
///
/// Existing paths are shown canonicalized. Paths that do not exist yet, like
/// a snapshot about to be written, are made absolute against the working
/// directory with `.` and `..` folded away.
pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        if let Ok(canonical) = self.canonicalize() {
            return canonical.display().to_string();
        }

        let absolute = match std::env::current_dir() {
            Ok(current_dir) if self.is_relative() => current_dir.join(self),
            _ => self.to_path_buf(),
        };
        fold_dots(&absolute).display().to_string()
    }
}

fn fold_dots(path: &Path) -> PathBuf {
    let mut folded: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(folded.last(), Some(Component::Normal(_))) {
                    folded.pop();
                }
            }
            _ => folded.push(component),
        }
    }
    folded.iter().collect()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn existing_paths_are_canonical() {
        let directory = TempDir::new().unwrap();
        std::fs::create_dir(directory.path().join("sub")).unwrap();
        let dotted = directory.path().join(".").join("sub").join("..");

        assert_eq!(
            dotted.best_effort_path_display(),
            directory.path().canonicalize().unwrap().display().to_string()
        );
    }

    #[test]
    fn missing_paths_are_folded() {
        let path = Path::new("/nonexistent/a/./b/../c.snapshot");
        assert_eq!(path.best_effort_path_display(), "/nonexistent/a/c.snapshot");
    }

    #[test]
    fn parent_of_root_stays_at_root() {
        assert_eq!(fold_dots(Path::new("/../x")), PathBuf::from("/x"));
    }
}
