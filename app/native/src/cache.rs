//! Image cache locations.
//!
//! The current background is always downloaded to the same file, and a
//! fallback image is kept next to it. Both live in `<cache dir>/albumwall`
//! unless the configuration names another directory.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::config::ImagesConfig;
use crate::platform::path::expand_and_resolve;

/// Application directory name inside the platform cache directory.
const APP_DIR_NAME: &str = "albumwall";

/// File the current background is downloaded to.
pub const BACKGROUND_FILE_NAME: &str = "background.jpg";

/// Generated fallback image file.
pub const DEFAULT_IMAGE_FILE_NAME: &str = "default.png";

/// Size and colour of the generated fallback image.
const DEFAULT_IMAGE_SIZE: (u32, u32) = (64, 64);
const DEFAULT_IMAGE_COLOR: Rgb<u8> = Rgb([0x1e, 0x1e, 0x2e]);

/// Returns the root cache directory for the application, falling back to the
/// temp directory when the platform has none.
#[must_use]
pub fn get_cache_dir() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(std::env::temp_dir).join(APP_DIR_NAME)
}

/// Where the background and fallback images live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePaths {
    /// Fixed download target of the current background.
    pub background: PathBuf,
    /// Image applied when the fetched one cannot be set.
    pub default_image: PathBuf,
    /// Whether `default_image` is generated by us rather than user supplied.
    pub generated_default: bool,
}

impl ImagePaths {
    /// Paths for everything under `directory`, with a generated fallback.
    #[must_use]
    pub fn in_directory(directory: &Path) -> Self {
        Self {
            background: directory.join(BACKGROUND_FILE_NAME),
            default_image: directory.join(DEFAULT_IMAGE_FILE_NAME),
            generated_default: true,
        }
    }

    /// Resolves the configured paths. Relative paths are taken relative to
    /// `base_dir` (the configuration file's directory).
    #[must_use]
    pub fn from_config(images: &ImagesConfig, base_dir: &Path) -> Self {
        let directory = expand_and_resolve(&images.directory, base_dir);
        let directory = if directory.as_os_str().is_empty() { get_cache_dir() } else { directory };

        let mut paths = Self::in_directory(&directory);
        let default_image = expand_and_resolve(&images.default_image, base_dir);
        if !default_image.as_os_str().is_empty() {
            paths.default_image = default_image;
            paths.generated_default = false;
        }
        paths
    }

    /// Creates the image directory and, when it is ours to generate, the
    /// fallback image.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the image cannot be written.
    pub fn prepare(&self) -> Result<(), image::ImageError> {
        if let Some(parent) = self.background.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.generated_default && !self.default_image.exists() {
            write_default_image(&self.default_image)?;
        } else if !self.default_image.exists() {
            tracing::warn!(
                path = %self.default_image.display(),
                "configured default image does not exist"
            );
        }

        Ok(())
    }
}

/// Writes a small solid-colour PNG to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be encoded or written.
pub fn write_default_image(path: &Path) -> Result<(), image::ImageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let (width, height) = DEFAULT_IMAGE_SIZE;
    RgbImage::from_pixel(width, height, DEFAULT_IMAGE_COLOR).save(path)?;
    tracing::debug!(path = %path.display(), "default image generated");
    Ok(())
}
