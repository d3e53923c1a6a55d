//! Filesystem glue for scaffolding commands

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::ScaffoldError;

/// Mode for directories created by [`make_dir`]
pub const DIR_MODE: u32 = 0o755;

/// Lockfiles removed alongside `node_modules/`
pub const NODE_LOCKFILES: [&str; 3] = ["pnpm-lock.yaml", "yarn.lock", "package-lock.json"];

/// Create a directory and its parents; an existing directory is fine
pub fn make_dir(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    builder
        .create(path)
        .with_context(|| format!("Failed to create directory: {}", path.display()))
}

/// Replace every occurrence of `search` in the file at `path`
///
/// Returns whether the file changed.
pub fn replace_in_file(search: &str, replace: &str, path: &Path) -> Result<bool> {
    let content = read_existing(path)?;
    if search.is_empty() || !content.contains(search) {
        return Ok(false);
    }

    fs::write(path, content.replace(search, replace))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Read a file the caller expects to exist
pub fn read_existing(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(ScaffoldError::missing(path).into()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Recursively copy a directory, preserving executable bits
pub fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    if !src.exists() {
        return Err(ScaffoldError::missing(src).into());
    }

    make_dir(dest)?;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            // fs::copy carries the permission bits over on unix
            fs::copy(&src_path, &dest_path).with_context(|| {
                format!(
                    "Failed to copy: {} -> {}",
                    src_path.display(),
                    dest_path.display()
                )
            })?;
        }
    }

    Ok(())
}

/// Remove `node_modules/` and node lockfiles from the project root
///
/// Entries that are already gone are skipped. Returns what was removed.
pub fn flush_node_modules(root: &Path) -> Result<Vec<String>> {
    let mut removed = Vec::new();

    let modules = root.join("node_modules");
    if ignore_missing(fs::remove_dir_all(&modules))
        .with_context(|| format!("Failed to remove {}", modules.display()))?
    {
        removed.push("node_modules".to_string());
    }

    for lockfile in NODE_LOCKFILES {
        let path = root.join(lockfile);
        if ignore_missing(fs::remove_file(&path))
            .with_context(|| format!("Failed to remove {}", path.display()))?
        {
            removed.push(lockfile.to_string());
        }
    }

    Ok(removed)
}

fn ignore_missing(result: io::Result<()>) -> io::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
