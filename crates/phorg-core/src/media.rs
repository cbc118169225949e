use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::date::{DateResolution, DateResolver};
use crate::error::OrganizeError;

/// Extensions picked up from the source folder, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff"];

#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Full path in the source folder
    pub path: PathBuf,
    /// Just the filename (lossy for display; `path` keeps the real bytes)
    pub filename: String,
    /// Lowercased extension
    pub extension: String,
    /// Resolved date, filled on first call to `resolve`
    pub resolution: Option<DateResolution>,
}

impl ImageFile {
    /// `None` unless `path` has one of the image extensions.
    pub fn new(path: PathBuf) -> Option<Self> {
        let extension = image_extension(&path)?;
        let filename = path.file_name()?.to_string_lossy().into_owned();
        Some(Self {
            path,
            filename,
            extension,
            resolution: None,
        })
    }

    pub fn resolve(&mut self, resolver: &DateResolver) -> &DateResolution {
        let path = &self.path;
        self.resolution.get_or_insert_with(|| resolver.resolve(path))
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        self.resolution.as_ref().map(|r| r.date)
    }
}

fn image_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub fn is_image(path: &Path) -> bool {
    image_extension(path).is_some()
}

/// Image files directly inside `dir`, sorted by filename. Subdirectories are
/// not descended into.
pub fn scan_images(dir: &Path) -> Result<Vec<ImageFile>, OrganizeError> {
    if !dir.is_dir() {
        return Err(OrganizeError::MissingSourceFolder(dir.to_path_buf()));
    }
    let entries =
        fs::read_dir(dir).map_err(|_| OrganizeError::MissingSourceFolder(dir.to_path_buf()))?;

    let mut images: Vec<ImageFile> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter_map(ImageFile::new)
        .collect();
    images.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(images)
}
