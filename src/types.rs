//! Shared types used across resolution, viewing and output.
//!
//! A [`Gallery`] is built once per page by the resolver and then handed to the
//! viewer. Its order is the discovery order (seeds first, then generated
//! candidates) and it is never resorted: positions in the gallery are the
//! indices the viewer and lightbox speak in.

use serde::{Deserialize, Serialize};

/// An image location declared by the page itself, before it has been probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedImage {
    pub source: String,
    /// Caption from markup. `None` falls back to the generic label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SeedImage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            label: None,
        }
    }

    pub fn labelled(source: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            label: Some(label.into()),
        }
    }
}

/// Where a gallery item came from. Reporting only; never affects order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Seed,
    Discovered,
}

/// A verified image in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub source: String,
    pub label: String,
    pub origin: Origin,
}

/// Ordered, source-unique list of verified images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Gallery {
    items: Vec<GalleryItem>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item unless its source is already present.
    ///
    /// Returns `false` (and leaves the gallery unchanged) for duplicates and
    /// blank sources.
    pub fn push(&mut self, item: GalleryItem) -> bool {
        if item.source.trim().is_empty() || self.contains(&item.source) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn contains(&self, source: &str) -> bool {
        self.items.iter().any(|i| i.source == source)
    }

    pub fn get(&self, index: usize) -> Option<&GalleryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GalleryItem> {
        self.items.iter()
    }

    /// Clamp an arbitrary index into `[0, len - 1]`. `None` when empty.
    pub fn clamp_index(&self, index: usize) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(index.min(self.items.len() - 1))
        }
    }

    pub fn sources(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.source.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Gallery {
    type Item = &'a GalleryItem;
    type IntoIter = std::slice::Iter<'a, GalleryItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
