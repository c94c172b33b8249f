//! HTML surface: applies render commands to an in-memory page and writes it out.
//!
//! [`HtmlSurface`] is the concrete display the CLI drives. It holds exactly the
//! element state a browser page would (image source and visibility, caption
//! text, the thumbnail rail, the lightbox overlay, the page-level marker) and
//! serialises that state as HTML with the same class names and data attributes
//! the detail-page template uses:
//!
//! ```text
//! div.viewer
//! ├── div.viewer-frame
//! │   ├── img[data-viewer-img]
//! │   ├── div.viewer-ph
//! │   └── button[data-viewer-prev] / button[data-viewer-next]
//! ├── div.viewer-thumbs
//! │   └── button.viewer-thumb(.is-active) > img
//! └── p[data-viewer-caption]
//! div.viewer-lightbox(.is-open)
//! ├── div.viewer-lightbox__stage[role=dialog]
//! │   ├── button.viewer-lightbox__close
//! │   └── img.viewer-lightbox__img
//! └── p.viewer-lightbox__caption
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating with
//! automatic escaping of sources and captions.

use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::render::{RenderCommand, Surface, Thumbnail};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct LightboxElement {
    dialog_label: String,
    close_label: String,
    open: bool,
    source: Option<String>,
    alt: String,
    caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ThumbElement {
    thumb: Thumbnail,
    active: bool,
}

/// In-memory detail page.
#[derive(Debug, Clone)]
pub struct HtmlSurface {
    surface: Surface,
    image_source: Option<String>,
    image_alt: String,
    image_visible: bool,
    placeholder_visible: bool,
    caption: String,
    prev_next_hidden: bool,
    thumbnails: Option<Vec<ThumbElement>>,
    lightbox: Option<LightboxElement>,
    lightbox_marker: bool,
}

impl HtmlSurface {
    pub fn new(surface: Surface) -> Self {
        Self {
            surface,
            image_source: None,
            image_alt: String::new(),
            image_visible: true,
            placeholder_visible: false,
            caption: String::new(),
            prev_next_hidden: false,
            thumbnails: None,
            lightbox: None,
            lightbox_marker: false,
        }
    }

    pub fn apply(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::SetImage { source, alt } => {
                self.image_source = Some(source.clone());
                self.image_alt = alt.clone();
            }
            RenderCommand::SetImageVisible(visible) => self.image_visible = *visible,
            RenderCommand::SetPlaceholderVisible(visible) => self.placeholder_visible = *visible,
            RenderCommand::SetCaption(text) => self.caption = text.clone(),
            RenderCommand::ReplaceThumbnails(thumbs) => {
                self.thumbnails = Some(
                    thumbs
                        .iter()
                        .cloned()
                        .map(|thumb| ThumbElement {
                            thumb,
                            active: false,
                        })
                        .collect(),
                );
            }
            RenderCommand::RemoveThumbnails => self.thumbnails = None,
            RenderCommand::SetThumbnailActive { index, active } => {
                if let Some(el) = self.thumbnails.as_mut().and_then(|t| t.get_mut(*index)) {
                    el.active = *active;
                }
            }
            RenderCommand::HidePrevNext => self.prev_next_hidden = true,
            RenderCommand::MountLightbox {
                dialog_label,
                close_label,
            } => {
                if self.lightbox.is_none() {
                    self.lightbox = Some(LightboxElement {
                        dialog_label: dialog_label.clone(),
                        close_label: close_label.clone(),
                        ..LightboxElement::default()
                    });
                }
            }
            RenderCommand::SetLightboxOpen(open) => {
                if let Some(lb) = self.lightbox.as_mut() {
                    lb.open = *open;
                }
            }
            RenderCommand::SetLightboxContent {
                source,
                alt,
                caption,
            } => {
                if let Some(lb) = self.lightbox.as_mut() {
                    lb.source = Some(source.clone());
                    lb.alt = alt.clone();
                    lb.caption = caption.clone();
                }
            }
            RenderCommand::SetPageLightboxMarker(on) => self.lightbox_marker = *on,
        }
    }

    pub fn apply_all<'a>(&mut self, commands: impl IntoIterator<Item = &'a RenderCommand>) {
        for command in commands {
            self.apply(command);
        }
    }

    pub fn lightbox_marker(&self) -> bool {
        self.lightbox_marker
    }

    /// Source currently shown in the primary image, if any.
    pub fn image_source(&self) -> Option<&str> {
        self.image_source.as_deref()
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn thumbnail_count(&self) -> usize {
        self.thumbnails.as_ref().map_or(0, Vec::len)
    }

    /// Index of the active thumbnail, if exactly one is active.
    pub fn active_thumbnail(&self) -> Option<usize> {
        let thumbs = self.thumbnails.as_ref()?;
        let mut active = thumbs.iter().filter(|t| t.active);
        let first = active.next()?;
        match active.next() {
            Some(_) => None,
            None => Some(first.thumb.index),
        }
    }

    /// The viewer block and (if mounted) the lightbox overlay.
    pub fn render_fragment(&self) -> Markup {
        html! {
            div.viewer {
                div.viewer-frame {
                    img data-viewer-img src=[self.image_source.as_deref()] alt=(self.image_alt)
                        style=(display(self.image_visible, "block"));
                    @if self.surface.has_placeholder {
                        div.viewer-ph style=(display(self.placeholder_visible, "flex")) {}
                    }
                    @if self.surface.has_prev_next {
                        @let style = self.prev_next_hidden.then_some("display: none");
                        button type="button" data-viewer-prev style=[style] { "‹" }
                        button type="button" data-viewer-next style=[style] { "›" }
                    }
                }
                @if let Some(thumbs) = &self.thumbnails {
                    (render_thumbnails(thumbs))
                }
                @if self.surface.has_caption {
                    p data-viewer-caption { (self.caption) }
                }
            }
            @if let Some(lb) = &self.lightbox {
                (render_lightbox(lb))
            }
        }
    }

    /// A standalone document wrapping the fragment.
    pub fn render_document(&self, title: &str) -> Markup {
        base_document(
            title,
            self.lightbox_marker.then_some("is-lightbox-open"),
            self.render_fragment(),
        )
    }
}

fn display(visible: bool, shown: &str) -> String {
    format!("display: {}", if visible { shown } else { "none" })
}

fn render_thumbnails(thumbs: &[ThumbElement]) -> Markup {
    html! {
        div.viewer-thumbs {
            @for el in thumbs {
                button.viewer-thumb.is-active[el.active] type="button"
                    aria-label=(el.thumb.aria_label) data-index=(el.thumb.index) {
                    img src=(el.thumb.source) alt=(el.thumb.alt);
                }
            }
        }
    }
}

fn render_lightbox(lb: &LightboxElement) -> Markup {
    let aria_hidden = if lb.open { "false" } else { "true" };
    html! {
        div.viewer-lightbox.is-open[lb.open] aria-hidden=(aria_hidden) {
            div.viewer-lightbox__stage role="dialog" aria-modal="true" aria-label=(lb.dialog_label) {
                button.viewer-lightbox__close type="button" aria-label=(lb.close_label) { "×" }
                img.viewer-lightbox__img src=[lb.source.as_deref()] alt=(lb.alt);
            }
            p.viewer-lightbox__caption { (lb.caption) }
        }
    }
}

/// Renders the base HTML document structure
fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Write a rendered document, creating parent directories as needed.
pub fn write_snapshot(path: &Path, markup: Markup) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
