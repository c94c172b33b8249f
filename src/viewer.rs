//! Viewer state: the primary image, its caption and the thumbnail rail.
//!
//! The viewer is either `Empty` (no images resolved) or `Active(i)` with `i`
//! always a valid gallery index. Transitions take the state by value and
//! return the next one; rendering is a pure function from state to
//! [`RenderCommand`]s.
//!
//! A primary image that fails to load degrades the current render to the
//! placeholder. It does not touch the index or the gallery, so showing the
//! same index again gets a fresh attempt.

use crate::config::LabelsConfig;
use crate::render::{RenderCommand, Thumbnail};
use crate::types::{Gallery, GalleryItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerMode {
    Empty,
    Active(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerState {
    gallery: Gallery,
    mode: ViewerMode,
    image_broken: bool,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new(Gallery::new())
    }
}

impl ViewerState {
    /// Initial state for a resolved gallery: first image, or `Empty`.
    pub fn new(gallery: Gallery) -> Self {
        let mode = if gallery.is_empty() {
            ViewerMode::Empty
        } else {
            ViewerMode::Active(0)
        };
        Self {
            gallery,
            mode,
            image_broken: false,
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn mode(&self) -> ViewerMode {
        self.mode
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.mode {
            ViewerMode::Empty => None,
            ViewerMode::Active(i) => Some(i),
        }
    }

    pub fn current_item(&self) -> Option<&GalleryItem> {
        self.current_index().and_then(|i| self.gallery.get(i))
    }

    /// Whether the last attempt to show the current image failed.
    pub fn image_broken(&self) -> bool {
        self.image_broken
    }

    /// Move to `index`, clamped into the gallery. No-op when empty.
    pub fn set_index(self, index: usize) -> Self {
        match self.gallery.clamp_index(index) {
            Some(i) => Self {
                mode: ViewerMode::Active(i),
                image_broken: false,
                ..self
            },
            None => self,
        }
    }

    /// The primary display could not show the current image.
    pub fn image_failed(self) -> Self {
        Self {
            image_broken: true,
            ..self
        }
    }

    /// The primary display finished loading the current image.
    pub fn image_loaded(self) -> Self {
        Self {
            image_broken: false,
            ..self
        }
    }

    /// One thumbnail per gallery item, in gallery order.
    pub fn thumbnails(&self, labels: &LabelsConfig) -> Vec<Thumbnail> {
        self.gallery
            .iter()
            .enumerate()
            .map(|(index, item)| Thumbnail {
                index,
                source: item.source.clone(),
                alt: item.label.clone(),
                aria_label: labels.thumbnail_label(index),
            })
            .collect()
    }

    /// Replace the thumbnail rail with one built from the current gallery.
    pub fn build_thumbnails(&self, labels: &LabelsConfig) -> RenderCommand {
        if self.gallery.is_empty() {
            RenderCommand::RemoveThumbnails
        } else {
            RenderCommand::ReplaceThumbnails(self.thumbnails(labels))
        }
    }

    pub fn render(&self, labels: &LabelsConfig) -> Vec<RenderCommand> {
        let Some((index, item)) = self
            .current_index()
            .and_then(|i| self.gallery.get(i).map(|item| (i, item)))
        else {
            return vec![
                RenderCommand::SetPlaceholderVisible(true),
                RenderCommand::SetImageVisible(false),
                RenderCommand::SetCaption(labels.not_ready.clone()),
            ];
        };

        let mut commands = vec![
            RenderCommand::SetImage {
                source: item.source.clone(),
                alt: item.label.clone(),
            },
            RenderCommand::SetCaption(item.label.clone()),
            RenderCommand::SetPlaceholderVisible(self.image_broken),
            RenderCommand::SetImageVisible(!self.image_broken),
        ];
        commands.extend((0..self.gallery.len()).map(|i| RenderCommand::SetThumbnailActive {
            index: i,
            active: i == index,
        }));
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gallery_of;

    fn labels() -> LabelsConfig {
        LabelsConfig::default()
    }

    fn active_thumbs(commands: &[RenderCommand]) -> Vec<usize> {
        commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::SetThumbnailActive { index, active: true } => Some(*index),
                _ => None,
            })
            .collect()
    }

    // =========================================================================
    // Initial state
    // =========================================================================

    #[test]
    fn non_empty_gallery_starts_at_zero() {
        let viewer = ViewerState::new(gallery_of(&["a.jpg", "b.jpg"]));
        assert_eq!(viewer.mode(), ViewerMode::Active(0));
        assert_eq!(viewer.current_item().unwrap().source, "a.jpg");
    }

    #[test]
    fn empty_gallery_is_empty_mode() {
        let viewer = ViewerState::new(Gallery::new());
        assert_eq!(viewer.mode(), ViewerMode::Empty);
        assert_eq!(viewer.current_index(), None);
    }

    // =========================================================================
    // set_index
    // =========================================================================

    #[test]
    fn set_index_clamps_high() {
        let viewer = ViewerState::new(gallery_of(&["a", "b", "c"])).set_index(99);
        assert_eq!(viewer.current_index(), Some(2));
    }

    #[test]
    fn set_index_on_empty_stays_empty() {
        let viewer = ViewerState::new(Gallery::new()).set_index(3);
        assert_eq!(viewer.mode(), ViewerMode::Empty);
    }

    #[test]
    fn set_index_is_idempotent() {
        let once = ViewerState::new(gallery_of(&["a", "b", "c"])).set_index(1);
        let twice = once.clone().set_index(1);
        assert_eq!(once, twice);
        assert_eq!(once.render(&labels()), twice.render(&labels()));
    }

    // =========================================================================
    // render
    // =========================================================================

    #[test]
    fn render_empty_shows_placeholder_and_not_ready() {
        let commands = ViewerState::new(Gallery::new()).render(&labels());
        assert_eq!(
            commands,
            vec![
                RenderCommand::SetPlaceholderVisible(true),
                RenderCommand::SetImageVisible(false),
                RenderCommand::SetCaption("Image coming soon".to_string()),
            ]
        );
    }

    #[test]
    fn render_active_sets_image_and_single_active_thumb() {
        let viewer = ViewerState::new(gallery_of(&["a", "b", "c"])).set_index(1);
        let commands = viewer.render(&labels());
        assert_eq!(
            commands[0],
            RenderCommand::SetImage {
                source: "b".to_string(),
                alt: "Product image".to_string(),
            }
        );
        assert!(commands.contains(&RenderCommand::SetImageVisible(true)));
        assert!(commands.contains(&RenderCommand::SetPlaceholderVisible(false)));
        assert_eq!(active_thumbs(&commands), vec![1]);
    }

    // =========================================================================
    // Image failure
    // =========================================================================

    #[test]
    fn image_failure_keeps_index_and_gallery() {
        let before = ViewerState::new(gallery_of(&["a", "b"])).set_index(1);
        let after = before.clone().image_failed();
        assert_eq!(after.current_index(), Some(1));
        assert_eq!(after.gallery(), before.gallery());

        let commands = after.render(&labels());
        assert!(commands.contains(&RenderCommand::SetPlaceholderVisible(true)));
        assert!(commands.contains(&RenderCommand::SetImageVisible(false)));
    }

    #[test]
    fn rerender_same_index_retries_image() {
        let viewer = ViewerState::new(gallery_of(&["a", "b"]))
            .image_failed()
            .set_index(0);
        assert!(!viewer.image_broken());
        assert!(
            viewer
                .render(&labels())
                .contains(&RenderCommand::SetImageVisible(true))
        );
    }

    #[test]
    fn image_loaded_clears_failure() {
        let viewer = ViewerState::new(gallery_of(&["a"])).image_failed().image_loaded();
        assert!(!viewer.image_broken());
    }

    // =========================================================================
    // Thumbnails
    // =========================================================================

    #[test]
    fn thumbnails_follow_gallery_order() {
        let viewer = ViewerState::new(gallery_of(&["x", "y"]));
        let thumbs = viewer.thumbnails(&labels());
        assert_eq!(thumbs.len(), 2);
        assert_eq!(thumbs[0].source, "x");
        assert_eq!(thumbs[1].index, 1);
        assert_eq!(thumbs[1].aria_label, "View image 2");
    }

    #[test]
    fn build_thumbnails_on_empty_removes_rail() {
        let viewer = ViewerState::new(Gallery::new());
        assert_eq!(
            viewer.build_thumbnails(&labels()),
            RenderCommand::RemoveThumbnails
        );
    }
}
