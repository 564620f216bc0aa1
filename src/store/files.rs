//! Recursive file discovery under the rule root.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// Which side of the markdown split to collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Markdown,
    NonMarkdown,
}

impl FileType {
    fn accepts(&self, path: &Path) -> bool {
        let is_markdown = is_markdown(path);
        match self {
            Self::Markdown => is_markdown,
            Self::NonMarkdown => !is_markdown,
        }
    }
}

pub(crate) fn is_markdown(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".md"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Recursively collect regular files of `file_type` below `dir`.
///
/// Hidden entries (leading `.`) are skipped along with everything beneath
/// them. Results are in file-name order at every level. A missing `dir`
/// yields an empty list; any other I/O failure is a [`Error::StoreRead`].
pub fn find_files_by_type(dir: &Path, file_type: FileType) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                let source = match err.into_io_error() {
                    Some(io) if io.kind() == ErrorKind::NotFound => continue,
                    Some(io) => io,
                    None => std::io::Error::other("filesystem loop detected"),
                };
                return Err(Error::store_read(path, source));
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if file_type.accepts(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Slash-separated path of `path` relative to `root`.
pub(crate) fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
