//! A static site on disk: finding detail pages and resolving each one.
//!
//! This is where the pure resolver meets the filesystem. For one page it:
//!
//! 1. derives the page key from the page's path under the site root,
//! 2. reads the page's seed sidecar and appends any extra seeds,
//! 3. loads the cascaded `config.toml` for the page's directory,
//! 4. resolves against an [`FsProbe`] rooted at the page's directory.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::{self, ConfigError, GalleryConfig};
use crate::naming;
use crate::probe::{CountingProbe, FsProbe};
use crate::resolve::{GalleryResolver, Resolution};
use crate::seeds::{self, SeedError};
use crate::types::SeedImage;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Seeds(#[from] SeedError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Page not found: {0}")]
    PageNotFound(PathBuf),
}

/// Everything known about one resolved page.
#[derive(Debug, Clone)]
pub struct PageResolution {
    /// Page path relative to the site root.
    pub page: PathBuf,
    pub config: GalleryConfig,
    /// Seeds in declaration order, before normalisation.
    pub seeds: Vec<SeedImage>,
    pub resolution: Resolution,
    /// Total existence checks made, seeds and candidates.
    pub probes: usize,
}

/// All `*.html` pages under `site_root`, relative and sorted.
///
/// Hidden directories below the root are skipped.
pub fn find_pages(site_root: &Path) -> Result<Vec<PathBuf>, SiteError> {
    let mut pages = Vec::new();
    for entry in WalkDir::new(site_root)
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_html_extension(entry.path()) {
            let rel = entry
                .path()
                .strip_prefix(site_root)
                .unwrap_or(entry.path())
                .to_path_buf();
            pages.push(rel);
        }
    }
    pages.sort();
    Ok(pages)
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

/// Page path as a URL-style path: `/products/sofa/index.html`.
pub fn resource_path(page: &Path) -> String {
    let segments: Vec<String> = page
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("/{}", segments.join("/"))
}

/// Resolve the gallery for `page` (relative to `site_root`, or already
/// prefixed with it).
pub async fn resolve_page(
    site_root: &Path,
    page: &Path,
    extra_seeds: &[SeedImage],
) -> Result<PageResolution, SiteError> {
    let rel = page.strip_prefix(site_root).unwrap_or(page).to_path_buf();
    let page_path = site_root.join(&rel);
    if !page_path.is_file() {
        return Err(SiteError::PageNotFound(page_path));
    }
    let page_dir = page_path.parent().unwrap_or(site_root).to_path_buf();

    let config = config::load_page_config(site_root, &page_dir)?;
    let mut seeds = seeds::read_sidecar(&page_path)?.to_seeds();
    seeds.extend_from_slice(extra_seeds);

    let key = naming::page_key(&resource_path(&rel));
    debug!(page = %rel.display(), key = %key, seeds = seeds.len(), "resolving page");

    let probe = CountingProbe::new(FsProbe::new(site_root, page_dir));
    let resolution = GalleryResolver::new(&config)
        .resolve(&seeds, &key, &probe)
        .await;

    Ok(PageResolution {
        page: rel,
        config,
        seeds,
        resolution,
        probes: probe.calls(),
    })
}

/// Outcome of checking one page: resolved, or the error that stopped it.
#[derive(Debug)]
pub struct PageCheck {
    pub page: PathBuf,
    pub result: Result<PageResolution, SiteError>,
}

/// Resolve every page in the site.
///
/// Only a failed walk is an error. A page whose sidecar or config can't be
/// read is reported in its [`PageCheck`] and the walk moves on.
pub async fn check_site(site_root: &Path) -> Result<Vec<PageCheck>, SiteError> {
    let mut checks = Vec::new();
    for page in find_pages(site_root)? {
        let result = resolve_page(site_root, &page, &[]).await;
        if let Err(e) = &result {
            warn!(page = %page.display(), error = %e, "page check failed");
        }
        checks.push(PageCheck { page, result });
    }
    Ok(checks)
}

// ============================================================================
// Tests
// ============================================================================
