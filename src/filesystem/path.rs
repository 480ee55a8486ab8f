//! Path resolution against the virtual filesystem tree.
//!
//! Paths are plain strings. A leading `/` makes a path absolute, anything
//! else is resolved against the working path. `.` stays in place, `..` moves
//! to the parent and is clamped at the root, empty segments are ignored.

use snafu::{OptionExt, ensure};

use super::error::{FilesystemError, InvalidNameSnafu, NotFoundSnafu};
use super::node::Directory;

pub const SEPARATOR: char = '/';

/// Deepest directory nesting below the root
pub const MAX_DEPTH: usize = 1024;

pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Non-empty segments of a path, in order
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|segment| !segment.is_empty())
}

/// Renders a segment list as an absolute path; the root renders as `/`.
pub fn render(segments: &[String]) -> String {
    format!("{SEPARATOR}{}", segments.join("/"))
}

/// Splits a path into its parent part and its last segment.
///
/// Returns `None` when the path has no last segment (`""`, `"/"`).
pub fn split_parent(path: &str) -> Option<(&str, &str)> {
    let trimmed = path.trim_end_matches(SEPARATOR);
    let (parent, name) = match trimmed.rfind(SEPARATOR) {
        Some(index) => (&trimmed[..=index], &trimmed[index + 1..]),
        None => ("", trimmed),
    };
    (!name.is_empty()).then_some((parent, name))
}

/// A node name must be a single segment that cannot be confused with navigation.
pub fn validate_name(name: &str) -> Result<(), FilesystemError> {
    ensure!(
        !name.is_empty() && !name.contains(SEPARATOR) && name != "." && name != "..",
        InvalidNameSnafu { name }
    );
    Ok(())
}

/// Resolves `path` to the segment list of an existing directory.
///
/// Every hop looks the next segment up in the live tree starting from the
/// root, so a segment naming a file or a missing entry fails the whole walk.
pub fn resolve_segments(
    root: &Directory,
    working_path: &[String],
    path: &str,
) -> Result<Vec<String>, FilesystemError> {
    let mut resolved = if is_absolute(path) {
        Vec::new()
    } else {
        working_path.to_vec()
    };

    for segment in segments(path) {
        match segment {
            "." => {}
            ".." => {
                resolved.pop();
            }
            name => {
                let parent = directory_at(root, &resolved).context(NotFoundSnafu { path })?;
                parent
                    .subdirectory(name)
                    .context(NotFoundSnafu { path })?;
                resolved.push(name.to_string());
            }
        }
    }

    Ok(resolved)
}

pub fn directory_at<'a>(root: &'a Directory, segments: &[String]) -> Option<&'a Directory> {
    segments
        .iter()
        .try_fold(root, |current, segment| current.subdirectory(segment))
}

pub fn directory_at_mut<'a>(
    root: &'a mut Directory,
    segments: &[String],
) -> Option<&'a mut Directory> {
    let mut current = root;
    for segment in segments {
        current = current.subdirectory_mut(segment)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use rstest::*;

    use super::*;
    use crate::filesystem::node::File;

    fn sample_tree() -> Directory {
        let mut root = Directory::new("/", "root");
        let mut home = Directory::new("home", "root");
        let mut user = Directory::new("user", "user");
        user.try_insert(File::new("notes.txt", "hi", "user").into())
            .unwrap();
        home.try_insert(user.into()).unwrap();
        root.try_insert(home.into()).unwrap();
        root.try_insert(Directory::new("tmp", "root").into())
            .unwrap();
        root
    }

    fn owned(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    #[case(&[], "/", &[])]
    #[case(&[], "/home/user", &["home", "user"])]
    #[case(&["home"], "user", &["home", "user"])]
    #[case(&["home", "user"], "..", &["home"])]
    #[case(&["home", "user"], "../../..", &[])]
    #[case(&[], "..", &[])]
    #[case(&["home"], "./user/.", &["home", "user"])]
    #[case(&["home"], "/tmp", &["tmp"])]
    #[case(&[], "home//user/", &["home", "user"])]
    #[case(&["tmp"], "../home/user/../user", &["home", "user"])]
    fn resolves_existing_directories(
        #[case] working_path: &[&str],
        #[case] path: &str,
        #[case] expected: &[&str],
    ) {
        let root = sample_tree();
        let resolved = resolve_segments(&root, &owned(working_path), path).unwrap();
        assert_eq!(resolved, owned(expected));
    }

    #[rstest]
    #[case(&[], "missing")]
    #[case(&[], "/home/user/notes.txt")]
    #[case(&["home"], "user/notes.txt/..")]
    #[case(&["tmp"], "user")]
    fn rejects_missing_or_file_segments(#[case] working_path: &[&str], #[case] path: &str) {
        let root = sample_tree();
        let result = resolve_segments(&root, &owned(working_path), path);
        assert!(matches!(result, Err(FilesystemError::NotFound { .. })));
    }

    #[rstest]
    #[case(&[], "/")]
    #[case(&["home"], "/home")]
    #[case(&["home", "user"], "/home/user")]
    fn renders_working_path(#[case] segments: &[&str], #[case] expected: &str) {
        assert_eq!(render(&owned(segments)), expected);
    }

    #[rstest]
    #[case("notes.txt", Some(("", "notes.txt")))]
    #[case("/notes.txt", Some(("/", "notes.txt")))]
    #[case("a/b/c.txt", Some(("a/b/", "c.txt")))]
    #[case("dir/", Some(("", "dir")))]
    #[case("/", None)]
    #[case("", None)]
    fn splits_parent_and_name(#[case] path: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(split_parent(path), expected);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    fn rejects_navigation_names(#[case] name: &str) {
        assert!(validate_name(name).is_err());
    }

    #[test]
    fn directory_at_mut_reaches_nested_directory() {
        let mut root = sample_tree();
        let user = directory_at_mut(&mut root, &owned(&["home", "user"])).unwrap();
        assert_eq!(user.name(), "user");
        assert!(directory_at_mut(&mut root, &owned(&["home", "nobody"])).is_none());
    }
}
