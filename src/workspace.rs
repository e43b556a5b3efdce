//! Document acquisition and persistence for the command-line host.

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand `roots` into the markdown files they name.
///
/// Files are taken as given; directories are walked recursively, skipping
/// hidden entries, and filtered by `extensions` (compared
/// case-insensitively, without the dot). Output is sorted and deduplicated.
pub fn discover_markdown_files(roots: &[PathBuf], extensions: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()));
        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the original file is left untouched.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    // Create tempfile in same directory to ensure same filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
