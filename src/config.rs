//! Gallery configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files. Configuration
//! is hierarchical: stock defaults are overridden by a `config.toml` in the site
//! root, which is in turn overridden by one in any directory on the way down to
//! the page being resolved.
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml              # Root config (overrides stock defaults)
//! ├── shared/img/              # Image root probed by discovery
//! └── products/
//!     ├── config.toml          # Section config (overrides root)
//!     └── sofa/
//!         ├── config.toml      # Page config (overrides section)
//!         ├── index.html
//!         └── index.toml       # Seed sidecar
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [discovery]
//! image_root = "../shared/img"   # Base of the probed directories
//! guide_dir = "guide"            # Secondary directory under image_root
//! base_names = ["main", "cover", "01", "1"]
//! extensions = ["png", "jpg", "jpeg", "webp", "gif", "svg"]
//! max_index = 8                  # Numbered candidates run 1..=max_index
//! max_images = 8                 # Stop once the gallery holds this many
//! seed_short_circuit = 2         # Skip discovery when this many seeds load
//!
//! [labels]
//! default = "Product image"
//! not_ready = "Image coming soon"
//! thumbnail = "View image {n}"
//! lightbox = "Enlarged image view"
//! close = "Close"
//!
//! [surface]
//! caption = true
//! placeholder = true
//! thumbnails = true
//! prev_next = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::render::Surface;
use crate::resolve::ResolvePolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Candidate generation and resolver stop conditions.
    pub discovery: DiscoveryConfig,
    /// User-visible strings.
    pub labels: LabelsConfig,
    /// Which optional display elements the page provides.
    pub surface: SurfaceConfig,
}

impl GalleryConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.discovery;
        if d.image_root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "discovery.image_root must not be empty".into(),
            ));
        }
        if d.base_names.is_empty() {
            return Err(ConfigError::Validation(
                "discovery.base_names must not be empty".into(),
            ));
        }
        if d.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "discovery.extensions must not be empty".into(),
            ));
        }
        if d.max_index == 0 {
            return Err(ConfigError::Validation(
                "discovery.max_index must be at least 1".into(),
            ));
        }
        if d.max_images == 0 {
            return Err(ConfigError::Validation(
                "discovery.max_images must be at least 1".into(),
            ));
        }
        if d.seed_short_circuit == 0 {
            return Err(ConfigError::Validation(
                "discovery.seed_short_circuit must be at least 1".into(),
            ));
        }
        if self.labels.default.trim().is_empty() || self.labels.not_ready.trim().is_empty() {
            return Err(ConfigError::Validation(
                "labels.default and labels.not_ready must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> ResolvePolicy {
        ResolvePolicy {
            seed_short_circuit: self.discovery.seed_short_circuit,
            max_images: self.discovery.max_images,
        }
    }

    pub fn surface(&self) -> Surface {
        Surface {
            has_caption: self.surface.caption,
            has_placeholder: self.surface.placeholder,
            has_thumbnail_rail: self.surface.thumbnails,
            has_prev_next: self.surface.prev_next,
        }
    }
}

/// Candidate generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Base of both probed directories, relative to the page.
    pub image_root: String,
    /// Name of the secondary directory under `image_root`.
    pub guide_dir: String,
    /// Fixed base names tried before the numbered ones.
    pub base_names: Vec<String>,
    /// Extensions tried for every base name, in order.
    pub extensions: Vec<String>,
    /// Numbered candidates run from 1 to this value inclusive.
    pub max_index: u32,
    /// Resolution stops once the gallery holds this many images.
    pub max_images: usize,
    /// Discovery is skipped when at least this many seeds load.
    pub seed_short_circuit: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            image_root: "../shared/img".to_string(),
            guide_dir: "guide".to_string(),
            base_names: ["main", "cover", "01", "1"].map(String::from).to_vec(),
            extensions: ["png", "jpg", "jpeg", "webp", "gif", "svg"]
                .map(String::from)
                .to_vec(),
            max_index: 8,
            max_images: 8,
            seed_short_circuit: 2,
        }
    }
}

/// User-visible strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    /// Caption for images without one.
    pub default: String,
    /// Caption shown while the gallery is empty.
    pub not_ready: String,
    /// Thumbnail button label; `{n}` is the 1-based position.
    pub thumbnail: String,
    /// Accessible name of the lightbox dialog.
    pub lightbox: String,
    /// Accessible name of the lightbox close button.
    pub close: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            default: "Product image".to_string(),
            not_ready: "Image coming soon".to_string(),
            thumbnail: "View image {n}".to_string(),
            lightbox: "Enlarged image view".to_string(),
            close: "Close".to_string(),
        }
    }
}

impl LabelsConfig {
    /// Thumbnail button label for a 0-based gallery position.
    pub fn thumbnail_label(&self, index: usize) -> String {
        self.thumbnail.replace("{n}", &(index + 1).to_string())
    }
}

/// Optional display elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurfaceConfig {
    pub caption: bool,
    pub placeholder: bool,
    pub thumbnails: bool,
    pub prev_next: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            caption: true,
            placeholder: true,
            thumbnails: true,
            prev_next: true,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(GalleryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Deserialize and validate a merged value.
pub fn resolve_config(merged: toml::Value) -> Result<GalleryConfig, ConfigError> {
    let config: GalleryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config for the site root only.
pub fn load_config(site_root: &Path) -> Result<GalleryConfig, ConfigError> {
    load_page_config(site_root, site_root)
}

/// Load config for a page directory.
///
/// Merges stock defaults, then every `config.toml` from `site_root` down to
/// `page_dir` inclusive. A `page_dir` outside `site_root` only sees the root.
pub fn load_page_config(site_root: &Path, page_dir: &Path) -> Result<GalleryConfig, ConfigError> {
    let mut merged = stock_defaults_value();
    if let Some(root) = load_raw_config(site_root)? {
        merged = merge_toml(merged, root);
    }

    if let Ok(relative) = page_dir.strip_prefix(site_root) {
        let mut dir = site_root.to_path_buf();
        for component in relative.components() {
            dir.push(component);
            if let Some(layer) = load_raw_config(&dir)? {
                merged = merge_toml(merged, layer);
            }
        }
    }

    resolve_config(merged)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# detail-gallery configuration
# ============================
# All settings are optional. Values shown below are the defaults.
#
# Config files can be placed at any level of the site tree:
#   site/config.toml                  -> root (overrides stock defaults)
#   site/products/config.toml         -> section (overrides root)
#   site/products/sofa/config.toml    -> page (overrides section)
#
# Each level only needs the keys it wants to override.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Image discovery
# ---------------------------------------------------------------------------
[discovery]
# Both probed directories live under this path, relative to the page:
#   {image_root}/{key}/ and {image_root}/{guide_dir}/{key}/
image_root = "../shared/img"
guide_dir = "guide"

# Fixed names tried first, before the numbered {key}_01 style names.
base_names = ["main", "cover", "01", "1"]

# Extensions tried for every name, in this order.
extensions = ["png", "jpg", "jpeg", "webp", "gif", "svg"]

# Numbered names run from 1 to max_index inclusive.
max_index = 8

# Discovery stops as soon as the gallery holds this many images.
max_images = 8

# When at least this many declared images load, nothing is guessed.
seed_short_circuit = 2

# ---------------------------------------------------------------------------
# Labels
# ---------------------------------------------------------------------------
[labels]
default = "Product image"
not_ready = "Image coming soon"
# {n} is replaced by the 1-based thumbnail position.
thumbnail = "View image {n}"
lightbox = "Enlarged image view"
close = "Close"

# ---------------------------------------------------------------------------
# Page elements
# ---------------------------------------------------------------------------
[surface]
# Set to false when the page template lacks the element.
caption = true
placeholder = true
thumbnails = true
prev_next = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_discovery_values() {
        let config = GalleryConfig::default();
        assert_eq!(config.discovery.image_root, "../shared/img");
        assert_eq!(config.discovery.guide_dir, "guide");
        assert_eq!(config.discovery.base_names, vec!["main", "cover", "01", "1"]);
        assert_eq!(config.discovery.extensions.len(), 6);
        assert_eq!(config.discovery.max_index, 8);
        assert_eq!(config.discovery.max_images, 8);
        assert_eq!(config.discovery.seed_short_circuit, 2);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[labels]
default = "Produktbild"
"#;
        let config: GalleryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.labels.default, "Produktbild");
        assert_eq!(config.labels.not_ready, "Image coming soon");
        assert_eq!(config.discovery.max_images, 8);
    }

    #[test]
    fn thumbnail_label_is_one_based() {
        let labels = LabelsConfig::default();
        assert_eq!(labels.thumbnail_label(0), "View image 1");
        assert_eq!(labels.thumbnail_label(4), "View image 5");
    }

    #[test]
    fn policy_and_surface_follow_config() {
        let mut config = GalleryConfig::default();
        config.discovery.max_images = 3;
        config.surface.thumbnails = false;
        assert_eq!(config.policy().max_images, 3);
        assert_eq!(config.policy().seed_short_circuit, 2);
        assert!(!config.surface().has_thumbnail_rail);
        assert!(config.surface().has_caption);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.discovery.max_index, 8);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[discovery]
image_root = "/assets/img"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.discovery.image_root, "/assets/img");
        assert_eq!(config.discovery.guide_dir, "guide");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_page_config_cascades_root_to_page() {
        let tmp = TempDir::new().unwrap();
        let page_dir = tmp.path().join("products/sofa");
        fs::create_dir_all(&page_dir).unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[discovery]
max_images = 6
max_index = 4
"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("products/config.toml"),
            r#"
[discovery]
max_images = 5
"#,
        )
        .unwrap();
        fs::write(
            page_dir.join("config.toml"),
            r#"
[labels]
default = "Sofa"
"#,
        )
        .unwrap();

        let config = load_page_config(tmp.path(), &page_dir).unwrap();
        assert_eq!(config.discovery.max_index, 4);
        assert_eq!(config.discovery.max_images, 5);
        assert_eq!(config.labels.default, "Sofa");
    }

    #[test]
    fn load_page_config_outside_root_uses_root_only() {
        let site = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        fs::write(
            elsewhere.path().join("config.toml"),
            r#"
[discovery]
max_images = 1
"#,
        )
        .unwrap();

        let config = load_page_config(site.path(), elsewhere.path()).unwrap();
        assert_eq!(config.discovery.max_images, 8);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[discovery]
max_index = 8
max_images = 8
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[discovery]
max_images = 4
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let discovery = merged.get("discovery").unwrap();
        assert_eq!(discovery.get("max_images").unwrap().as_integer(), Some(4));
        assert_eq!(discovery.get("max_index").unwrap().as_integer(), Some(8));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base: toml::Value = toml::from_str(r#"extensions = ["png", "jpg"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"extensions = ["webp"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("extensions").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[discovery]
max_imgs = 3
"#;
        let result: Result<GalleryConfig, _> = toml::from_str(toml_str);
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<GalleryConfig, _> = toml::from_str("[probe]\nx = 1\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(GalleryConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut config = GalleryConfig::default();
        config.discovery.max_images = 0;
        assert!(config.validate().unwrap_err().to_string().contains("max_images"));

        let mut config = GalleryConfig::default();
        config.discovery.max_index = 0;
        assert!(config.validate().is_err());

        let mut config = GalleryConfig::default();
        config.discovery.seed_short_circuit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_lists() {
        let mut config = GalleryConfig::default();
        config.discovery.extensions.clear();
        assert!(config.validate().is_err());

        let mut config = GalleryConfig::default();
        config.discovery.base_names.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[labels]
default = "  "
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: GalleryConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = GalleryConfig::default();
        assert_eq!(config.discovery.base_names, defaults.discovery.base_names);
        assert_eq!(config.discovery.extensions, defaults.discovery.extensions);
        assert_eq!(config.discovery.max_images, defaults.discovery.max_images);
        assert_eq!(config.labels.thumbnail, defaults.labels.thumbnail);
        assert!(config.surface.prev_next);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.get("discovery").is_some());
        assert!(val.get("labels").is_some());
        assert!(val.get("surface").is_some());
    }
}
