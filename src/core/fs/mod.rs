//! Filesystem path utilities.
//!
//! Pure path math for media file references. The engine never reads media
//! itself; it only rewrites `mediaFilePath` between absolute form (for
//! runtime use) and relative form (for portable captions files).

use std::path::{Component, Path, PathBuf};

/// Resolves a possibly-relative media path against a base directory.
///
/// Absolute paths are returned unchanged.
pub fn resolve_media_path(media: &str, base_dir: &Path) -> String {
    let path = Path::new(media);
    if path.is_absolute() {
        media.to_string()
    } else {
        base_dir.join(path).to_string_lossy().into_owned()
    }
}

/// Computes `path` relative to `base_dir`, walking up with `..` where needed.
///
/// Both paths must be absolute. Returns `None` when no common prefix exists
/// (e.g. different drives on Windows); callers keep the absolute form then.
pub fn relative_path(path: &Path, base_dir: &Path) -> Option<PathBuf> {
    if !path.is_absolute() || !base_dir.is_absolute() {
        return None;
    }

    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base_dir.components().collect();

    let mut common = 0;
    while common < path_parts.len()
        && common < base_parts.len()
        && path_parts[common] == base_parts[common]
    {
        common += 1;
    }

    if common == 0 {
        return None;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part);
    }

    Some(relative)
}

// =============================================================================
// Tests
// =============================================================================
