//! Album rotation state.
//!
//! `position` is 1-indexed over the image ids, with 0 meaning no image has
//! been shown yet from the current source. Every rotation turns the position
//! into a 0-based target index and, once the background was applied, moves
//! the position to `index + 1`.

use rand::Rng;

use crate::dispatch::Operation;
use crate::error::OperationError;
use crate::state::PersistedState;

/// Which way a rotation moves through the album.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Next,
    Prev,
    Random,
}

impl Rotation {
    /// Maps a rotation operation to its direction.
    #[must_use]
    pub const fn from_operation(operation: Operation) -> Option<Self> {
        match operation {
            Operation::Next => Some(Self::Next),
            Operation::Prev => Some(Self::Prev),
            Operation::Random => Some(Self::Random),
            Operation::Save | Operation::ChangeSource | Operation::Quit => None,
        }
    }
}

/// Index `next` selects: `P mod N`.
///
/// `len` must be non-zero.
#[must_use]
pub fn next_index(position: usize, len: usize) -> usize { position % len }

/// Index `prev` selects.
///
/// From no image (or in a one-image album) this is the last image, otherwise
/// `((P mod N) - 2) mod N` with a non-negative modulo. `len` must be non-zero.
#[must_use]
pub fn prev_index(position: usize, len: usize) -> usize {
    if position == 0 || len == 1 {
        return len - 1;
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    {
        let n = len as i64;
        ((position as i64 % n) - 2).rem_euclid(n) as usize
    }
}

/// Uniformly random index in `0..len`. `len` must be non-zero.
pub fn random_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> usize { rng.random_range(0..len) }

/// Source URL, its image ids and the rotation position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumState {
    source_url: String,
    image_ids: Vec<String>,
    position: usize,
}

impl AlbumState {
    /// Creates the state for a freshly loaded source.
    ///
    /// A position past the end of the album is reset to 0.
    #[must_use]
    pub fn new(source_url: impl Into<String>, image_ids: Vec<String>, position: usize) -> Self {
        let source_url = source_url.into();
        let position = if position > image_ids.len() {
            tracing::warn!(
                position,
                images = image_ids.len(),
                "persisted position is past the end of the album, starting over"
            );
            0
        } else {
            position
        };

        Self { source_url, image_ids, position }
    }

    #[must_use]
    pub fn source_url(&self) -> &str { &self.source_url }

    #[must_use]
    pub fn image_ids(&self) -> &[String] { &self.image_ids }

    #[must_use]
    pub fn len(&self) -> usize { self.image_ids.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.image_ids.is_empty() }

    /// Current 1-indexed position, 0 if nothing is shown.
    #[must_use]
    pub const fn position(&self) -> usize { self.position }

    /// Image id at a 0-based index.
    #[must_use]
    pub fn image_id(&self, index: usize) -> Option<&str> {
        self.image_ids.get(index).map(String::as_str)
    }

    /// Computes the index a rotation would select without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::EmptyAlbum`] if there are no images.
    pub fn target_index<R: Rng + ?Sized>(
        &self,
        rotation: Rotation,
        rng: &mut R,
    ) -> Result<usize, OperationError> {
        let len = self.len();
        if len == 0 {
            return Err(OperationError::EmptyAlbum);
        }

        Ok(match rotation {
            Rotation::Next => next_index(self.position, len),
            Rotation::Prev => prev_index(self.position, len),
            Rotation::Random => random_index(len, rng),
        })
    }

    /// Records that the image at `index` is now the background.
    pub fn commit(&mut self, index: usize) {
        debug_assert!(index < self.len());
        self.position = index + 1;
    }

    /// Switches to a new source. The position goes back to 0 and the image
    /// list stays empty until [`Self::set_image_ids`] is called.
    pub fn switch_source(&mut self, source_url: impl Into<String>) {
        self.source_url = source_url.into();
        self.image_ids.clear();
        self.position = 0;
    }

    /// Replaces the image list of the current source.
    pub fn set_image_ids(&mut self, image_ids: Vec<String>) { self.image_ids = image_ids; }

    /// The part of the state that survives restarts.
    #[must_use]
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            source_url: self.source_url.clone(),
            position: self.position,
        }
    }
}
