//! Source enumeration: turn a file or directory path into the ordered
//! list of images a run will process.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions accepted as still images (case-insensitive).
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Extensions recognized as video containers. Videos are not processed;
/// knowing them lets us reject one with a targeted message instead of a
/// decode failure deep inside the engine.
pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "avi", "mov", "mkv", "webm"];

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("Video sources are not supported, only still images: {0}")]
    Unsupported(PathBuf),
    #[error("Failed to scan {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn has_extension_in(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            extensions.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

pub fn is_image_file(path: &Path) -> bool {
    has_extension_in(path, &IMAGE_EXTENSIONS)
}

pub fn is_video_file(path: &Path) -> bool {
    has_extension_in(path, &VIDEO_EXTENSIONS)
}

/// List the images a source path resolves to.
///
/// A file path yields itself (videos are rejected; anything else is left
/// for the image decoder to judge). A directory is walked recursively,
/// keeping files with a known image extension, sorted by path so the
/// traversal order is stable across runs. A missing path is the distinct
/// not-found error, reported before any detection work starts.
pub fn list_images(source: &Path) -> Result<Vec<PathBuf>, SourceError> {
    if source.is_file() {
        if is_video_file(source) {
            return Err(SourceError::Unsupported(source.to_path_buf()));
        }
        return Ok(vec![source.to_path_buf()]);
    }
    if !source.exists() {
        return Err(SourceError::NotFound(source.to_path_buf()));
    }

    let mut images = Vec::new();
    scan_directory(source, &mut images)?;
    images.sort();
    Ok(images)
}

fn scan_directory(dir: &Path, images: &mut Vec<PathBuf>) -> Result<(), SourceError> {
    let entries = fs::read_dir(dir).map_err(|source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for entry in entries {
        let entry = entry.map_err(|source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            scan_directory(&path, images)?;
        } else if is_image_file(&path) {
            images.push(path);
        }
    }
    Ok(())
}
