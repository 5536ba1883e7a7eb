use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Global storage root (absolute), from `config::storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let root = config::storage_root();
    let p = PathBuf::from(root);
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Folder holding uploaded resource images: {STORAGE_ROOT}/resources
pub fn resource_images_dir() -> PathBuf {
    storage_root().join("resources")
}

/// Relative path (from the storage root) of a resource image with the given file name.
///
/// This is the value persisted in `resources.image_path`.
pub fn resource_image_relative(filename: &str) -> String {
    format!("resources/{filename}")
}

/// Resolve a stored relative path against the storage root.
pub fn resolve_stored(relative: &str) -> PathBuf {
    storage_root().join(relative)
}
