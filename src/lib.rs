//! # Detail Gallery
//!
//! Image gallery resolution and viewer state for product detail pages.
//! A page declares a few images of its own; the gallery fills in the rest by
//! guessing where shared images for the product probably live, keeping only
//! the ones that actually load.
//!
//! # Architecture: Resolve, Then View
//!
//! ```text
//! 1. Resolve   seeds + page key  →  Gallery        (probe seeds, then guessed candidates)
//! 2. View      Gallery + events  →  RenderCommand  (viewer + lightbox state machines)
//! 3. Apply     RenderCommand     →  HTML           (HtmlSurface, serialised with Maud)
//! ```
//!
//! Steps 1 and 2 are environment-free: resolution only talks to the world
//! through an [`probe::ExistenceProbe`], and the viewer and lightbox are plain
//! values moved through pure transitions. Everything that touches the disk
//! lives in [`site`], [`config`] and [`generate`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared data model: `SeedImage`, `GalleryItem`, `Gallery` |
//! | [`naming`] | Page key derivation and the ordered candidate location sequence |
//! | [`probe`] | `ExistenceProbe` trait, filesystem probe, counting wrapper |
//! | [`seeds`] | Seed sidecar parsing, label fallback, seed normalisation |
//! | [`resolve`] | `GalleryResolver`: seeds first, candidates until full or exhausted |
//! | [`viewer`] | Viewer state machine: current index, thumbnails, placeholder |
//! | [`lightbox`] | Lightbox state machine mirroring the viewer's current item |
//! | [`render`] | `RenderCommand`, `Surface` capabilities, `DetailView` event driver |
//! | [`generate`] | `HtmlSurface`: applies render commands, renders HTML with Maud |
//! | [`site`] | Finding pages on disk and resolving each against the filesystem |
//! | [`config`] | Cascading `config.toml` loading, validation, stock config text |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Seeds Short-Circuit Discovery
//!
//! Two loadable seeds are enough for a useful gallery, so no guessing happens
//! at all. With fewer, candidates are probed one at a time in a fixed priority
//! order and probing stops as soon as the gallery is full. Sequential probing
//! keeps the order deterministic and the number of requests small.
//!
//! ## One Casing at a Time
//!
//! Image directories are named inconsistently (`sofa`, `Sofa`, `SOFA`). The
//! candidate sequence exhausts one casing of the page key before trying the
//! next, so a directory matching the key's own casing always wins.
//!
//! ## Render Commands Over Direct Mutation
//!
//! The viewer and lightbox never touch a page. They emit [`render::RenderCommand`]s
//! which the page's [`render::Surface`] filters once, so a page missing a
//! caption or a thumbnail rail simply never receives those commands.
//!
//! ## Config Cascading (Root → Section → Page)
//!
//! ```text
//! site/config.toml                  ← root (overrides stock defaults)
//! site/products/config.toml         ← section (overrides root)
//! site/products/sofa/config.toml    ← page (overrides section)
//! ```
//!
//! The merge logic lives in [`config::merge_toml`].

pub mod config;
pub mod generate;
pub mod lightbox;
pub mod naming;
pub mod output;
pub mod probe;
pub mod render;
pub mod resolve;
pub mod seeds;
pub mod site;
pub mod types;
pub mod viewer;

#[cfg(test)]
pub(crate) mod test_helpers;
