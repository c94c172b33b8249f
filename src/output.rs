//! CLI output formatting for resolve, render and check.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every gallery item
//! leads with its positional index and label; its source location and where
//! it came from are indented context lines. Page paths are secondary to the
//! page key the gallery was resolved for.
//!
//! # Output Format
//!
//! ## Resolve
//!
//! ```text
//! sofa (products/sofa/index.html)
//!     Seeds: 1 declared, 1 probed
//!     Candidates: 24 probed, 0 skipped
//!     Stopped: candidates exhausted
//! 001 Product image
//!     Source: img/a.png
//!     Origin: seed
//! 002 Product image
//!     Source: ../shared/img/sofa/main.png
//!     Origin: discovered
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 products/sofa/index.html → sofa (2 images, 25 probes)
//! 002 index.html → no key (0 images, 0 probes) placeholder
//! 003 products/lamp/index.html → error: Invalid seed sidecar …
//!
//! Checked 3 pages, 1 with images, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use std::path::Path;

use crate::resolve::{Resolution, StopReason};
use crate::site::{PageCheck, PageResolution};
use crate::types::Origin;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// Page key, or a marker when the page has none.
fn key_display(key: &str) -> &str {
    if key.is_empty() { "no key" } else { key }
}

fn stop_display(stop: StopReason) -> &'static str {
    match stop {
        StopReason::SeedsSufficient => "seeds sufficient",
        StopReason::NoPageKey => "no page key",
        StopReason::CapReached => "gallery full",
        StopReason::Exhausted => "candidates exhausted",
    }
}

fn origin_display(origin: Origin) -> &'static str {
    match origin {
        Origin::Seed => "seed",
        Origin::Discovered => "discovered",
    }
}

// ============================================================================
// Resolve output
// ============================================================================

/// Format one resolution: page header, probe stats, then the gallery.
pub fn format_resolution(page: &Path, resolution: &Resolution) -> Vec<String> {
    let stats = &resolution.stats;
    let mut lines = vec![
        format!(
            "{} ({})",
            key_display(&resolution.page_key),
            page.display()
        ),
        format!(
            "{}Seeds: {} declared, {} probed",
            indent(1),
            stats.seeds_declared,
            stats.seed_probes
        ),
        format!(
            "{}Candidates: {} probed, {} skipped",
            indent(1),
            stats.candidate_probes,
            stats.candidates_skipped
        ),
        format!("{}Stopped: {}", indent(1), stop_display(stats.stop)),
    ];

    if resolution.gallery.is_empty() {
        lines.push(format!("{}(no images, placeholder shown)", indent(1)));
    }

    for (i, item) in resolution.gallery.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), item.label));
        lines.push(format!("{}Source: {}", indent(1), item.source));
        lines.push(format!("{}Origin: {}", indent(1), origin_display(item.origin)));
    }

    lines
}

/// Print resolve output to stdout.
pub fn print_resolution(page: &Path, resolution: &Resolution) {
    for line in format_resolution(page, resolution) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format a single page's summary line.
///
/// ```text
/// 001 products/sofa/index.html → sofa (2 images, 25 probes)
/// ```
pub fn format_check_line(index: usize, page: &PageResolution) -> String {
    let gallery = &page.resolution.gallery;
    let suffix = if gallery.is_empty() { " placeholder" } else { "" };
    format!(
        "{} {} → {} ({}, {}){}",
        format_index(index),
        page.page.display(),
        key_display(&page.resolution.page_key),
        plural(gallery.len(), "image", "images"),
        plural(page.probes, "probe", "probes"),
        suffix
    )
}

/// Format a page that could not be resolved.
///
/// ```text
/// 002 products/lamp/index.html → error: Invalid seed sidecar …
/// ```
pub fn format_check_error(index: usize, page: &Path, error: &dyn std::fmt::Display) -> String {
    format!("{} {} → error: {}", format_index(index), page.display(), error)
}

/// Format the whole check report.
pub fn format_check_output(checks: &[PageCheck]) -> Vec<String> {
    let mut lines: Vec<String> = checks
        .iter()
        .enumerate()
        .map(|(i, check)| match &check.result {
            Ok(page) => format_check_line(i + 1, page),
            Err(e) => format_check_error(i + 1, &check.page, e),
        })
        .collect();

    let with_images = checks
        .iter()
        .filter(|c| {
            c.result
                .as_ref()
                .is_ok_and(|p| !p.resolution.gallery.is_empty())
        })
        .count();
    let failed = checks.iter().filter(|c| c.result.is_err()).count();

    let mut summary = format!(
        "Checked {}, {} with images",
        plural(checks.len(), "page", "pages"),
        with_images
    );
    if failed > 0 {
        summary.push_str(&format!(", {} failed", failed));
    }
    lines.push(String::new());
    lines.push(summary);
    lines
}

/// Print check output to stdout.
pub fn print_check_output(checks: &[PageCheck]) {
    for line in format_check_output(checks) {
        println!("{}", line);
    }
}

// ============================================================================
// Render output
// ============================================================================

/// Summary after a snapshot was written to a file.
///
/// ```text
/// sofa → out/sofa.html (2 images, lightbox open)
/// ```
pub fn format_render_summary(
    resolution: &Resolution,
    output: &Path,
    lightbox_open: bool,
) -> String {
    let state = if lightbox_open { ", lightbox open" } else { "" };
    format!(
        "{} → {} ({}{})",
        key_display(&resolution.page_key),
        output.display(),
        plural(resolution.gallery.len(), "image", "images"),
        state
    )
}

// ============================================================================
// Tests
// ============================================================================
