//! File selection dialog

use serde::Serialize;

use crate::args::{self, Token, TokenCursor};

use super::DEFAULT_SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileMode {
    ExistingFile,
    ExistingFiles,
    Directory,
    Save,
}

/// A name filter such as `Images | *.png *.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFilter {
    pub name: Option<String>,
    pub patterns: Vec<String>,
}

impl FileFilter {
    pub fn parse(value: &str) -> Self {
        let (name, patterns) = match value.split_once('|') {
            Some((name, patterns)) => {
                let name = name.trim();
                ((!name.is_empty()).then(|| name.to_string()), patterns)
            }
            None => (None, value),
        };
        FileFilter {
            name,
            patterns: patterns.split_whitespace().map(str::to_string).collect(),
        }
    }

    /// Glob-style match of a file name against the patterns. `*` and `?`
    /// are supported; an empty pattern list matches everything.
    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|p| glob_match(p, file_name))
    }
}

fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut p, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, n));
                p += 1;
            }
            Some(&c) if c == '?' || c == name[n] => {
                p += 1;
                n += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    n = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSelectionDescriptor {
    pub filename: Option<String>,
    pub mode: FileMode,
    pub separator: String,
    pub confirm_overwrite: bool,
    pub filter: Option<FileFilter>,
}

pub fn build(tokens: &[Token]) -> FileSelectionDescriptor {
    let mut descriptor = FileSelectionDescriptor {
        filename: None,
        mode: FileMode::ExistingFile,
        separator: DEFAULT_SEPARATOR.to_string(),
        confirm_overwrite: false,
        filter: None,
    };

    let mut cursor = TokenCursor::new(tokens);
    while let Some(flag) = cursor.next_token() {
        match flag {
            "--filename" => descriptor.filename = Some(cursor.value()),
            "--multiple" => descriptor.mode = FileMode::ExistingFiles,
            "--directory" => descriptor.mode = FileMode::Directory,
            "--save" => descriptor.mode = FileMode::Save,
            "--separator" => descriptor.separator = cursor.value(),
            "--confirm-overwrite" => descriptor.confirm_overwrite = true,
            "--file-filter" => descriptor.filter = Some(FileFilter::parse(&cursor.value())),
            other => args::unrecognized(other, &["--file-selection"]),
        }
    }

    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::tokenize;

    #[test]
    fn test_filter_forms() {
        let named = FileFilter::parse("Images | *.png *.jpg");
        assert_eq!(named.name.as_deref(), Some("Images"));
        assert_eq!(named.patterns, vec!["*.png", "*.jpg"]);

        let plain = FileFilter::parse("*.txt *.md");
        assert_eq!(plain.name, None);
        assert_eq!(plain.patterns, vec!["*.txt", "*.md"]);
    }

    #[test]
    fn test_filter_matching() {
        let filter = FileFilter::parse("Images | *.png photo-??.jpg");
        assert!(filter.matches("a.png"));
        assert!(filter.matches("photo-01.jpg"));
        assert!(!filter.matches("photo-1.jpg"));
        assert!(!filter.matches("a.png.bak"));
        assert!(FileFilter::parse("").matches("anything"));
    }

    #[test]
    fn test_last_mode_and_filter_win() {
        let tokens = tokenize([
            "--file-selection", "--multiple", "--save", "--file-filter", "*.a", "--file-filter=*.b",
            "--separator", ":", "--confirm-overwrite", "--filename", "/tmp/x",
        ]);
        let selection = build(&tokens);
        assert_eq!(selection.mode, FileMode::Save);
        assert_eq!(selection.filter.unwrap().patterns, vec!["*.b"]);
        assert_eq!(selection.separator, ":");
        assert!(selection.confirm_overwrite);
        assert_eq!(selection.filename.as_deref(), Some("/tmp/x"));
    }
}
