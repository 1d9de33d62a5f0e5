//! Configuration file discovery.

use std::path::{Path, PathBuf};

/// Directories searched for a relative configuration file name: the working
/// directory, then its parent.
pub fn search_directories() -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let parent = parent.to_path_buf();
            dirs.push(cwd);
            dirs.push(parent);
        } else {
            dirs.push(cwd);
        }
    }
    dirs
}

/// Find `name` in the standard search directories.
///
/// Absolute paths are returned as-is when they point at a file.
pub fn find_config_file(name: impl AsRef<Path>) -> Option<PathBuf> {
    find_config_file_in(name, &search_directories())
}

pub fn find_config_file_in(name: impl AsRef<Path>, dirs: &[PathBuf]) -> Option<PathBuf> {
    let name = name.as_ref();
    if name.is_absolute() {
        return name.is_file().then(|| name.to_path_buf());
    }

    let found = dirs.iter().map(|dir| dir.join(name)).find(|path| path.is_file());
    match &found {
        Some(path) => tracing::debug!(path = %path.display(), "configuration file found"),
        None => tracing::debug!(name = %name.display(), "configuration file not found"),
    }
    found
}
