//! File discovery for the input directory.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions accepted as input images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

/// List the image files directly inside `dir`, sorted by path.
///
/// The listing is flat: subdirectories are not entered. A missing or
/// unreadable directory yields an empty list.
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && is_image(path) {
            files.push(path.to_path_buf());
        }
    }

    // Sort by path for deterministic ordering
    files.sort();
    files
}

/// Check if a file has a supported image extension.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext_lower = ext.to_lowercase();
            IMAGE_EXTENSIONS.iter().any(|supported| *supported == ext_lower)
        })
        .unwrap_or(false)
}
