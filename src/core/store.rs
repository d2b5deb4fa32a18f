//! Named-image store.
//!
//! The store maps names to images. Entries are created by loads and by
//! transformations that name their output, overwritten on re-assignment, and
//! never dropped implicitly.

use crate::core::error::{DispatchError, DispatchResult};
use crate::core::types::Image;
use indexmap::IndexMap;

/// Registry of named images, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: IndexMap<String, Image>,
}

impl ImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry. Returns the previous image, if any.
    pub fn put(&mut self, name: impl Into<String>, image: Image) -> Option<Image> {
        let name = name.into();
        log::debug!("Storing '{}' ({}x{})", name, image.width(), image.height());
        self.images.insert(name, image)
    }

    /// Look an entry up.
    pub fn get(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    /// Look an entry up, failing with a missing-image error.
    pub fn require(&self, name: &str) -> DispatchResult<&Image> {
        self.get(name).ok_or_else(|| DispatchError::ImageNotFound {
            name: name.to_string(),
        })
    }

    /// Copy `source` onto `target`.
    pub fn reset(&mut self, target: &str, source: &str) -> DispatchResult<()> {
        let image = self.require(source)?.clone();
        self.put(target, image);
        Ok(())
    }

    /// Record the current `source` under `snapshot_name` so a later
    /// `reset(source, snapshot_name)` restores it.
    pub fn snapshot(&mut self, source: &str, snapshot_name: &str) -> DispatchResult<()> {
        self.reset(snapshot_name, source)
    }

    /// Check if an entry exists.
    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    /// All names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    /// Remove an entry explicitly.
    pub fn remove(&mut self, name: &str) -> Option<Image> {
        self.images.shift_remove(name)
    }

    /// Number of stored images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
