//! Shared test utilities for the detail-gallery test suite.
//!
//! Provides in-memory probes, gallery builders and on-disk site fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let probe = RecordingProbe::new(&["a.jpg"]);
//! let res = resolver.resolve(&seeds, "sofa", &probe).await;
//! assert_eq!(probe.probed()[0], "a.jpg");
//!
//! let tmp = TempDir::new().unwrap();
//! write_page(tmp.path(), "products/sofa/index.html");
//! write_png(&tmp.path().join("products/shared/img/sofa/main.png"));
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::probe::ExistenceProbe;
use crate::types::{Gallery, GalleryItem, Origin};

// =========================================================================
// Probes
// =========================================================================

/// Locations an in-memory probe reports as loadable.
pub fn available(locations: &[&str]) -> HashSet<String> {
    locations.iter().map(|l| l.to_string()).collect()
}

/// In-memory probe that records every location it was asked about, in order.
pub struct RecordingProbe {
    present: HashSet<String>,
    probed: RefCell<Vec<String>>,
}

impl RecordingProbe {
    pub fn new(present: &[&str]) -> Self {
        Self {
            present: available(present),
            probed: RefCell::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.borrow().clone()
    }
}

impl ExistenceProbe for RecordingProbe {
    async fn exists(&self, location: &str) -> bool {
        self.probed.borrow_mut().push(location.to_string());
        self.present.contains(location)
    }
}

// =========================================================================
// Galleries
// =========================================================================

/// Gallery of seed items with the stock label.
pub fn gallery_of(sources: &[&str]) -> Gallery {
    let mut gallery = Gallery::new();
    for source in sources {
        gallery.push(GalleryItem {
            source: source.to_string(),
            label: "Product image".to_string(),
            origin: Origin::Seed,
        });
    }
    gallery
}

// =========================================================================
// Site fixtures
// =========================================================================

/// Write a decodable 2x2 PNG, creating parent directories.
pub fn write_png(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(2, 2).save(path).unwrap();
}

/// Write a minimal SVG document, creating parent directories.
pub fn write_svg(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        path,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"></svg>"#,
    )
    .unwrap();
}

/// Write a placeholder detail page at `rel` under `root`.
pub fn write_page(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "<!DOCTYPE html><html><body></body></html>").unwrap();
}
