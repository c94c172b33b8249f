//! Seed images: what the page itself declares.
//!
//! A detail page declares its images in two places: the primary viewer image,
//! and any number of content blocks that carry an image plus some text. On
//! disk these declarations live in a TOML sidecar next to the page, with the
//! same stem:
//!
//! ```text
//! products/sofa/index.html
//! products/sofa/index.toml
//! ```
//!
//! ```toml
//! viewer = "img/hero.jpg"
//!
//! [[block]]
//! img = "img/stitching.jpg"
//! caption = "Stitching detail"
//! heading = "Craft"
//! ```
//!
//! ## Labels
//!
//! The viewer image always gets the generic label. A block's label is the
//! first non-empty of its caption, its heading, and the generic label.
//!
//! ## Normalisation
//!
//! Before anything is probed, seeds are trimmed, blank sources are dropped and
//! only the first declaration of a source is kept.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::SeedImage;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Invalid seed sidecar {0}: {1}")]
    Toml(PathBuf, #[source] toml::de::Error),
}

/// Seed declarations for one page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSeeds {
    /// Source of the primary viewer image.
    pub viewer: Option<String>,
    /// Content blocks carrying images.
    #[serde(rename = "block")]
    pub blocks: Vec<SeedBlock>,
}

/// A content block with an image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedBlock {
    pub img: Option<String>,
    pub caption: Option<String>,
    pub heading: Option<String>,
}

impl PageSeeds {
    /// Seeds in declaration order: viewer image first, then blocks.
    pub fn to_seeds(&self) -> Vec<SeedImage> {
        let mut seeds = Vec::with_capacity(self.blocks.len() + 1);
        if let Some(viewer) = &self.viewer {
            seeds.push(SeedImage::new(viewer.clone()));
        }
        for block in &self.blocks {
            let Some(img) = &block.img else { continue };
            seeds.push(SeedImage {
                source: img.clone(),
                label: resolve(&[block.caption.as_deref(), block.heading.as_deref()]),
            });
        }
        seeds
    }
}

/// Return the first non-empty value, trimmed.
///
/// ```text
/// block label: resolve(&[caption, heading])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Sidecar path for a page: same stem, `.toml` extension.
pub fn sidecar_path(page: &Path) -> PathBuf {
    page.with_extension("toml")
}

/// Read the seed sidecar for a page.
///
/// A missing sidecar is not an error: the page simply declares nothing.
pub fn read_sidecar(page: &Path) -> Result<PageSeeds, SeedError> {
    let path = sidecar_path(page);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PageSeeds::default()),
        Err(e) => return Err(SeedError::Io(path, e)),
    };
    toml::from_str(&content).map_err(|e| SeedError::Toml(path, e))
}

/// Parse a command-line seed of the form `SRC` or `SRC=LABEL`.
pub fn parse_seed_arg(arg: &str) -> SeedImage {
    match arg.split_once('=') {
        Some((source, label)) => SeedImage {
            source: source.to_string(),
            label: resolve(&[Some(label)]),
        },
        None => SeedImage::new(arg),
    }
}

/// A seed after normalisation: non-empty trimmed source, resolved label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSeed {
    pub source: String,
    pub label: String,
}

/// Trim, drop blank sources, keep the first declaration of each source.
pub fn normalize(seeds: &[SeedImage], default_label: &str) -> Vec<NormalizedSeed> {
    let mut seen = HashSet::new();
    seeds
        .iter()
        .filter_map(|seed| {
            let source = seed.source.trim();
            if source.is_empty() || !seen.insert(source.to_string()) {
                return None;
            }
            let label = resolve(&[seed.label.as_deref(), Some(default_label)])
                .unwrap_or_else(|| default_label.to_string());
            Some(NormalizedSeed {
                source: source.to_string(),
                label,
            })
        })
        .collect()
}
