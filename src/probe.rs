//! Existence probes: can this image location actually be shown?
//!
//! A probe answers one question for one location and never fails: anything
//! that goes wrong (missing file, unreadable file, undecodable bytes, a
//! location the probe can't reach at all) is simply `false`.
//!
//! The resolver awaits probes one at a time, in priority order. Probes must
//! not assume anything about who calls them or in what order.
//!
//! ## Filesystem probing
//!
//! [`FsProbe`] stands in for a browser's image loader against a site on disk.
//! Locations resolve the way a browser would resolve an `<img src>` on the page:
//!
//! | Location | Resolved against |
//! |----------|------------------|
//! | `img/a.jpg`, `../shared/img/x.png` | the page's directory |
//! | `/shared/img/x.png` | the site root |
//! | `https://…`, `data:…` | not reachable, always `false` |
//!
//! Path segments are percent-decoded, and `..` stops at the site root.
//!
//! A file counts as loadable only when it decodes: raster images must yield
//! dimensions, SVG files must contain an `<svg` element.

use percent_encoding::percent_decode_str;
use std::cell::Cell;
use std::collections::HashSet;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

/// Checks whether an image location is loadable.
pub trait ExistenceProbe {
    fn exists(&self, location: &str) -> impl Future<Output = bool>;
}

/// Membership test; handy for dry runs and tests.
impl ExistenceProbe for HashSet<String> {
    async fn exists(&self, location: &str) -> bool {
        self.contains(location)
    }
}

impl<P: ExistenceProbe> ExistenceProbe for &P {
    fn exists(&self, location: &str) -> impl Future<Output = bool> {
        (**self).exists(location)
    }
}

/// Wraps a probe and records every location it was asked about.
#[derive(Debug, Default)]
pub struct CountingProbe<P> {
    inner: P,
    calls: Cell<usize>,
}

impl<P> CountingProbe<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: ExistenceProbe> ExistenceProbe for CountingProbe<P> {
    async fn exists(&self, location: &str) -> bool {
        self.calls.set(self.calls.get() + 1);
        self.inner.exists(location).await
    }
}

/// Probes locations against a site on disk.
#[derive(Debug, Clone)]
pub struct FsProbe {
    site_root: PathBuf,
    page_dir: PathBuf,
}

impl FsProbe {
    pub fn new(site_root: impl Into<PathBuf>, page_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            page_dir: page_dir.into(),
        }
    }

    /// Map a location to a filesystem path, or `None` if it isn't a local path.
    ///
    /// Segments are percent-decoded. `..` never climbs above the site root,
    /// just as a URL path never climbs above `/`.
    pub fn resolve_path(&self, location: &str) -> Option<PathBuf> {
        let location = strip_query(location.trim());
        if location.is_empty() || is_remote(location) {
            return None;
        }
        let (mut segments, rest) = match location.strip_prefix('/') {
            Some(rooted) => (Vec::new(), rooted),
            None => (self.page_segments(), location),
        };
        for raw in rest.split('/') {
            let segment = percent_decode_str(raw).decode_utf8().ok()?;
            match &*segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s if s.contains(['/', '\\']) => return None,
                s => segments.push(s.to_string()),
            }
        }
        let mut path = self.site_root.clone();
        path.extend(segments);
        Some(path)
    }

    /// The page directory as path segments under the site root.
    ///
    /// A page directory outside the site root resolves as the root itself.
    fn page_segments(&self) -> Vec<String> {
        let Ok(relative) = self.page_dir.strip_prefix(&self.site_root) else {
            return Vec::new();
        };
        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
                Component::ParentDir => {
                    segments.pop();
                }
                _ => {}
            }
        }
        segments
    }
}

impl ExistenceProbe for FsProbe {
    async fn exists(&self, location: &str) -> bool {
        let Some(path) = self.resolve_path(location) else {
            debug!(location, "probe: not a local location");
            return false;
        };
        let loadable = is_loadable(path.clone()).await;
        if loadable {
            debug!(location, path = %path.display(), "probe: loadable");
        } else {
            trace!(location, path = %path.display(), "probe: not loadable");
        }
        loadable
    }
}

async fn is_loadable(path: PathBuf) -> bool {
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        _ => return false,
    }

    if is_svg(&path) {
        return match tokio::fs::read_to_string(&path).await {
            Ok(text) => text.contains("<svg"),
            Err(_) => false,
        };
    }

    tokio::task::spawn_blocking(move || image::image_dimensions(&path).is_ok())
        .await
        .unwrap_or(false)
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn is_remote(location: &str) -> bool {
    location.starts_with("//")
        || location.starts_with("data:")
        || location
            .split_once("://")
            .is_some_and(|(scheme, _)| !scheme.is_empty() && !scheme.contains('/'))
}

fn strip_query(location: &str) -> &str {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    &location[..end]
}
