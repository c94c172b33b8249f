//! Lightbox: a modal overlay showing the viewer's current image larger.
//!
//! The lightbox owns only whether it is open and whether its overlay exists
//! yet. What it shows is always read from the viewer at render time, so an
//! index change while it is open shows up on the next render.
//!
//! The overlay is mounted the first time the lightbox opens and never removed.

use crate::config::LabelsConfig;
use crate::render::RenderCommand;
use crate::viewer::ViewerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxMode {
    Closed,
    Open,
}

/// Keys the detail page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Where a click on the open lightbox landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxTarget {
    /// The dimmed overlay around the stage.
    Backdrop,
    /// The inner stage holding the image.
    Stage,
    CloseButton,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightboxState {
    mounted: bool,
    open: bool,
}

impl LightboxState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> LightboxMode {
        if self.open {
            LightboxMode::Open
        } else {
            LightboxMode::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Open at `index`, clamped into the gallery, making it the viewer's index.
    ///
    /// Does nothing when the gallery is empty.
    pub fn open(
        self,
        viewer: ViewerState,
        index: usize,
        labels: &LabelsConfig,
    ) -> (Self, ViewerState, Vec<RenderCommand>) {
        if viewer.gallery().is_empty() {
            return (self, viewer, Vec::new());
        }

        let mut commands = Vec::new();
        if !self.mounted {
            commands.push(RenderCommand::MountLightbox {
                dialog_label: labels.lightbox.clone(),
                close_label: labels.close.clone(),
            });
        }

        let viewer = viewer.set_index(index);
        let next = Self {
            mounted: true,
            open: true,
        };
        commands.push(RenderCommand::SetLightboxOpen(true));
        commands.extend(next.render(&viewer));
        commands.push(RenderCommand::SetPageLightboxMarker(true));
        (next, viewer, commands)
    }

    /// Close. Idempotent; never touches the viewer.
    pub fn close(self) -> (Self, Vec<RenderCommand>) {
        if !self.mounted {
            return (self, Vec::new());
        }
        (
            Self {
                open: false,
                ..self
            },
            vec![
                RenderCommand::SetLightboxOpen(false),
                RenderCommand::SetPageLightboxMarker(false),
            ],
        )
    }

    /// Content for the current viewer item, if open.
    pub fn render(&self, viewer: &ViewerState) -> Vec<RenderCommand> {
        if !self.open {
            return Vec::new();
        }
        match viewer.current_item() {
            Some(item) => vec![RenderCommand::SetLightboxContent {
                source: item.source.clone(),
                alt: item.label.clone(),
                caption: item.label.clone(),
            }],
            None => Vec::new(),
        }
    }

    pub fn closes_on_key(key: &Key) -> bool {
        *key == Key::Escape
    }

    pub fn closes_on_click(target: LightboxTarget) -> bool {
        matches!(
            target,
            LightboxTarget::Backdrop | LightboxTarget::CloseButton
        )
    }
}
