//! Image host access.
//!
//! [`Gallery`] is the seam the operations talk to. [`ImgurGallery`] is the
//! real implementation: it scrapes the image ids out of the album's
//! script-free blog layout and downloads single images over HTTPS.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;

use super::source::AlbumSource;

/// Album page base; the blog layout lists every image without scripts.
const ALBUM_PAGE_BASE: &str = "https://imgur.com/a";

/// Direct image host.
const IMAGE_HOST: &str = "https://i.imgur.com";

/// Image ids inside the album blog layout.
static IMAGE_CONTAINER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"<div id="([a-zA-Z0-9]+)" class="post-image-container"#).ok()
});

/// Errors talking to the image host.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The HTTP request itself failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The host answered with an unexpected status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// Writing the downloaded image failed.
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote image gallery.
pub trait Gallery: Send {
    /// Lists the image ids of `album` in album order.
    ///
    /// # Errors
    ///
    /// Returns an error if the album page cannot be fetched.
    fn fetch_image_ids(&self, album: &AlbumSource) -> Result<Vec<String>, GalleryError>;

    /// Downloads image `image_id` to `dest`, overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the download or the write fails.
    fn fetch_image(&self, image_id: &str, dest: &Path) -> Result<PathBuf, GalleryError>;
}

/// Blocking Imgur client.
pub struct ImgurGallery {
    client: Client,
}

impl ImgurGallery {
    /// Builds a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, GalleryError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("albumwall/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, GalleryError> {
        tracing::debug!(%url, "GET");
        Ok(self.client.get(url).send()?)
    }
}

impl Gallery for ImgurGallery {
    fn fetch_image_ids(&self, album: &AlbumSource) -> Result<Vec<String>, GalleryError> {
        let response = self.get(&album_page_url(album.id()))?;

        match response.status() {
            StatusCode::OK => {
                let html = response.text()?;
                let ids = scrape_image_ids(&html);
                tracing::info!(album = %album.id(), images = ids.len(), "album loaded");
                Ok(ids)
            }
            StatusCode::NOT_FOUND => {
                // Gallery links can point at a single image instead of an album.
                let single = self.get(&format!("{IMAGE_HOST}/{}", album.id()))?;
                if single.status().is_success() {
                    tracing::info!(album = %album.id(), "source is a single image");
                    Ok(vec![album.id().to_string()])
                } else {
                    Err(GalleryError::Status(single.status().as_u16()))
                }
            }
            status => Err(GalleryError::Status(status.as_u16())),
        }
    }

    fn fetch_image(&self, image_id: &str, dest: &Path) -> Result<PathBuf, GalleryError> {
        let response = self.get(&image_url(image_id))?;
        if !response.status().is_success() {
            return Err(GalleryError::Status(response.status().as_u16()));
        }

        let bytes = response.bytes()?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, &bytes)?;

        tracing::debug!(image = image_id, bytes = bytes.len(), path = %dest.display(), "image downloaded");
        Ok(dest.to_path_buf())
    }
}

/// Blog-layout page listing every image of album `album_id`.
#[must_use]
pub fn album_page_url(album_id: &str) -> String { format!("{ALBUM_PAGE_BASE}/{album_id}/layout/blog") }

/// Direct URL of image `image_id`. The host serves the real format behind
/// any image extension.
#[must_use]
pub fn image_url(image_id: &str) -> String { format!("{IMAGE_HOST}/{image_id}.jpg") }

/// Extracts image ids from the album blog layout, in page order.
#[must_use]
pub fn scrape_image_ids(html: &str) -> Vec<String> {
    let Some(re) = IMAGE_CONTAINER.as_ref() else {
        return Vec::new();
    };

    re.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
