//! Image album handling: URL validation, the remote gallery, the rotation
//! position model and the operations the hotkeys trigger.

mod gallery;
mod operations;
mod position;
mod source;

pub use gallery::{Gallery, GalleryError, ImgurGallery, album_page_url, image_url, scrape_image_ids};
pub use operations::{
    Collaborators, OperationSet, RotationOutcome, SAVE_DEFAULT_FILE_NAME, SOURCE_PROMPT_TITLE,
};
pub use position::{AlbumState, Rotation, next_index, prev_index, random_index};
pub use source::AlbumSource;
