use std::fmt;
use std::str::FromStr;

use snafu::Snafu;

const SEPARATOR: char = '/';

/// A slash-delimited path split into its segments.
///
/// Leading and interior empty segments are kept, so `/a` and `a` address
/// different nodes. Trailing empty segments are dropped. A key always holds
/// at least one segment, which makes the trie root itself unaddressable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey {
    segments: Vec<String>,
}

impl PathKey {
    pub fn parse(path: &str) -> Result<Self, InvalidPathError> {
        let mut segments: Vec<String> = path.split(SEPARATOR).map(str::to_string).collect();
        while segments.last().is_some_and(String::is_empty) {
            segments.pop();
        }

        if segments.is_empty() {
            return InvalidPathSnafu { path }.fail();
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for PathKey {
    type Err = InvalidPathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        Self::parse(path)
    }
}

impl TryFrom<&str> for PathKey {
    type Error = InvalidPathError;

    fn try_from(path: &str) -> Result<Self, Self::Error> {
        Self::parse(path)
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(display("Path '{}' does not name any segment", path))]
pub struct InvalidPathError {
    path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("/folder1/file1.txt", &["", "folder1", "file1.txt"])]
    #[case("folder1/file1.txt", &["folder1", "file1.txt"])]
    #[case("/a/", &["", "a"])]
    #[case("a//b", &["a", "", "b"])]
    #[case("//a", &["", "", "a"])]
    #[case("./../a", &[".", "..", "a"])]
    #[case("name with spaces", &["name with spaces"])]
    fn parse_splits_on_slashes(#[case] path: &str, #[case] expected: &[&str]) {
        let key = PathKey::parse(path).unwrap();
        assert_eq!(key.segments(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    #[case("///")]
    fn parse_rejects_paths_without_segments(#[case] path: &str) {
        let err = PathKey::parse(path).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn display_drops_trailing_separator() {
        let key: PathKey = "/folder1/sub/".parse().unwrap();
        assert_eq!(key.to_string(), "/folder1/sub");
        assert_eq!(key.segments().len(), 3);
    }

    #[test]
    fn leading_slash_changes_identity() {
        let rooted = PathKey::try_from("/a").unwrap();
        let relative = PathKey::try_from("a").unwrap();
        assert_ne!(rooted, relative);
    }

    #[test]
    fn error_message_names_the_path() {
        let err = PathKey::parse("/").unwrap_err();
        assert!(err.to_string().contains("'/'"));
    }
}
