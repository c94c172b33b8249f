//! Render commands and the event driver tying viewer and lightbox together.
//!
//! State lives in plain values ([`ViewerState`], [`LightboxState`]);
//! [`DetailView`] feeds input events through their transitions and hands back
//! the [`RenderCommand`]s a concrete display should apply. Commands for
//! elements the page doesn't have are dropped here, once, according to the
//! page's [`Surface`].

use crate::config::LabelsConfig;
use crate::lightbox::{Key, LightboxState, LightboxTarget};
use crate::types::Gallery;
use crate::viewer::ViewerState;

/// A thumbnail control in the rail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Gallery position this thumbnail selects.
    pub index: usize,
    pub source: String,
    pub alt: String,
    pub aria_label: String,
}

/// One change to apply to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    SetImage { source: String, alt: String },
    SetImageVisible(bool),
    SetPlaceholderVisible(bool),
    SetCaption(String),
    /// Discard any existing rail and build this one.
    ReplaceThumbnails(Vec<Thumbnail>),
    RemoveThumbnails,
    SetThumbnailActive { index: usize, active: bool },
    HidePrevNext,
    MountLightbox { dialog_label: String, close_label: String },
    SetLightboxOpen(bool),
    SetLightboxContent { source: String, alt: String, caption: String },
    /// Page-level marker while the lightbox is open (e.g. to lock scrolling).
    SetPageLightboxMarker(bool),
}

/// Optional elements the page provides. The primary image and its frame are
/// always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub has_caption: bool,
    pub has_placeholder: bool,
    pub has_thumbnail_rail: bool,
    pub has_prev_next: bool,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            has_caption: true,
            has_placeholder: true,
            has_thumbnail_rail: true,
            has_prev_next: true,
        }
    }
}

impl Surface {
    pub fn supports(&self, command: &RenderCommand) -> bool {
        match command {
            RenderCommand::SetCaption(_) => self.has_caption,
            RenderCommand::SetPlaceholderVisible(_) => self.has_placeholder,
            RenderCommand::ReplaceThumbnails(_)
            | RenderCommand::RemoveThumbnails
            | RenderCommand::SetThumbnailActive { .. } => self.has_thumbnail_rail,
            RenderCommand::HidePrevNext => self.has_prev_next,
            _ => true,
        }
    }

    fn retain(&self, mut commands: Vec<RenderCommand>) -> Vec<RenderCommand> {
        commands.retain(|c| self.supports(c));
        commands
    }
}

/// Discrete input from the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    ThumbnailClicked(usize),
    /// Click on the primary image inside the frame.
    FrameImageClicked,
    KeyPressed(Key),
    LightboxClicked(LightboxTarget),
    PrimaryImageError,
    PrimaryImageLoaded,
}

/// Viewer + lightbox for one detail page.
#[derive(Debug, Clone)]
pub struct DetailView {
    viewer: ViewerState,
    lightbox: LightboxState,
    surface: Surface,
    labels: LabelsConfig,
}

impl DetailView {
    /// A view with nothing resolved yet.
    pub fn new(surface: Surface, labels: LabelsConfig) -> Self {
        Self {
            viewer: ViewerState::default(),
            lightbox: LightboxState::new(),
            surface,
            labels,
        }
    }

    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    pub fn lightbox(&self) -> &LightboxState {
        &self.lightbox
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Commands for the page before resolution completes: prev/next hidden,
    /// placeholder shown.
    pub fn initial_commands(&self) -> Vec<RenderCommand> {
        let mut commands = vec![RenderCommand::HidePrevNext];
        commands.extend(self.viewer.render(&self.labels));
        self.surface.retain(commands)
    }

    /// Install the resolved gallery: rebuild thumbnails, show the first image.
    pub fn load(&mut self, gallery: Gallery) -> Vec<RenderCommand> {
        self.viewer = ViewerState::new(gallery);
        let mut commands = vec![self.viewer.build_thumbnails(&self.labels)];
        commands.extend(self.render());
        self.surface.retain(commands)
    }

    /// Select a gallery position (thumbnail click).
    pub fn set_index(&mut self, index: usize) -> Vec<RenderCommand> {
        self.viewer = std::mem::take(&mut self.viewer).set_index(index);
        self.surface.retain(self.render())
    }

    pub fn open_lightbox(&mut self, index: usize) -> Vec<RenderCommand> {
        let viewer = std::mem::take(&mut self.viewer);
        let (lightbox, viewer, mut commands) = self.lightbox.open(viewer, index, &self.labels);
        self.lightbox = lightbox;
        self.viewer = viewer;
        if self.lightbox.is_open() {
            commands.extend(self.viewer.render(&self.labels));
        }
        self.surface.retain(commands)
    }

    pub fn close_lightbox(&mut self) -> Vec<RenderCommand> {
        let (lightbox, commands) = self.lightbox.close();
        self.lightbox = lightbox;
        commands
    }

    pub fn handle(&mut self, event: InputEvent) -> Vec<RenderCommand> {
        match event {
            InputEvent::ThumbnailClicked(index) => self.set_index(index),
            InputEvent::FrameImageClicked => match self.viewer.current_index() {
                Some(index) if !self.viewer.image_broken() => self.open_lightbox(index),
                _ => Vec::new(),
            },
            InputEvent::KeyPressed(key) if LightboxState::closes_on_key(&key) => {
                self.close_lightbox()
            }
            InputEvent::KeyPressed(_) => Vec::new(),
            InputEvent::LightboxClicked(target) if LightboxState::closes_on_click(target) => {
                self.close_lightbox()
            }
            InputEvent::LightboxClicked(_) => Vec::new(),
            InputEvent::PrimaryImageError => {
                self.viewer = std::mem::take(&mut self.viewer).image_failed();
                self.surface.retain(self.viewer.render(&self.labels))
            }
            InputEvent::PrimaryImageLoaded => {
                self.viewer = std::mem::take(&mut self.viewer).image_loaded();
                self.surface.retain(self.viewer.render(&self.labels))
            }
        }
    }

    /// Viewer render followed by the lightbox mirror.
    fn render(&self) -> Vec<RenderCommand> {
        let mut commands = self.viewer.render(&self.labels);
        commands.extend(self.lightbox.render(&self.viewer));
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightbox::LightboxMode;
    use crate::test_helpers::gallery_of;

    fn view(surface: Surface) -> DetailView {
        DetailView::new(surface, LabelsConfig::default())
    }

    fn lightbox_source(commands: &[RenderCommand]) -> Option<&str> {
        commands.iter().rev().find_map(|c| match c {
            RenderCommand::SetLightboxContent { source, .. } => Some(source.as_str()),
            _ => None,
        })
    }

    #[test]
    fn initial_commands_hide_prev_next_and_show_placeholder() {
        let commands = view(Surface::default()).initial_commands();
        assert_eq!(commands[0], RenderCommand::HidePrevNext);
        assert!(commands.contains(&RenderCommand::SetPlaceholderVisible(true)));
    }

    #[test]
    fn load_builds_thumbnails_and_shows_first() {
        let mut v = view(Surface::default());
        let commands = v.load(gallery_of(&["a.jpg", "main.png"]));
        match &commands[0] {
            RenderCommand::ReplaceThumbnails(thumbs) => assert_eq!(thumbs.len(), 2),
            other => panic!("expected thumbnails first, got {other:?}"),
        }
        assert_eq!(v.viewer().current_index(), Some(0));
    }

    #[test]
    fn empty_load_removes_rail_and_open_is_noop() {
        let mut v = view(Surface::default());
        let commands = v.load(Gallery::new());
        assert_eq!(commands[0], RenderCommand::RemoveThumbnails);
        assert!(commands.contains(&RenderCommand::SetPlaceholderVisible(true)));

        assert!(v.open_lightbox(0).is_empty());
        assert_eq!(v.lightbox().mode(), LightboxMode::Closed);
        assert!(v.handle(InputEvent::FrameImageClicked).is_empty());
    }

    #[test]
    fn open_then_select_updates_lightbox() {
        let mut v = view(Surface::default());
        v.load(gallery_of(&["a", "b", "c"]));
        let opened = v.open_lightbox(0);
        assert_eq!(lightbox_source(&opened), Some("a"));

        let selected = v.handle(InputEvent::ThumbnailClicked(2));
        assert_eq!(lightbox_source(&selected), Some("c"));
    }

    #[test]
    fn open_clamps_and_escape_keeps_index() {
        let mut v = view(Surface::default());
        v.load(gallery_of(&["a", "b", "c"]));
        let opened = v.open_lightbox(5);
        assert_eq!(lightbox_source(&opened), Some("c"));
        assert_eq!(v.viewer().current_index(), Some(2));

        v.handle(InputEvent::KeyPressed(Key::Escape));
        assert_eq!(v.lightbox().mode(), LightboxMode::Closed);
        assert_eq!(v.viewer().current_index(), Some(2));
    }

    #[test]
    fn stage_click_does_not_close() {
        let mut v = view(Surface::default());
        v.load(gallery_of(&["a"]));
        v.handle(InputEvent::FrameImageClicked);
        assert!(v.handle(InputEvent::LightboxClicked(LightboxTarget::Stage)).is_empty());
        assert!(v.lightbox().is_open());

        v.handle(InputEvent::LightboxClicked(LightboxTarget::Backdrop));
        assert!(!v.lightbox().is_open());
    }

    #[test]
    fn broken_primary_image_is_not_clickable() {
        let mut v = view(Surface::default());
        v.load(gallery_of(&["a"]));
        v.handle(InputEvent::PrimaryImageError);
        assert!(v.handle(InputEvent::FrameImageClicked).is_empty());
        assert_eq!(v.viewer().current_index(), Some(0));
    }

    #[test]
    fn surface_without_optional_elements_filters_commands() {
        let surface = Surface {
            has_caption: false,
            has_placeholder: false,
            has_thumbnail_rail: false,
            has_prev_next: false,
        };
        let mut v = view(surface);
        let mut commands = v.initial_commands();
        commands.extend(v.load(gallery_of(&["a", "b"])));
        commands.extend(v.set_index(1));
        assert!(commands.iter().all(|c| !matches!(
            c,
            RenderCommand::SetCaption(_)
                | RenderCommand::SetPlaceholderVisible(_)
                | RenderCommand::ReplaceThumbnails(_)
                | RenderCommand::SetThumbnailActive { .. }
                | RenderCommand::HidePrevNext
        )));
        assert!(commands.contains(&RenderCommand::SetImageVisible(true)));
    }

    #[test]
    fn repeated_selection_is_idempotent() {
        let mut v = view(Surface::default());
        v.load(gallery_of(&["a", "b", "c"]));
        let first = v.set_index(1);
        let second = v.set_index(1);
        assert_eq!(first, second);
    }
}
