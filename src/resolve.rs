//! Gallery resolution.
//!
//! Turns a page's seed declarations and its key into a [`Gallery`] of images
//! that actually load. This runs once per page, before the viewer starts.
//!
//! ## Algorithm
//!
//! 1. Normalise seeds (trim, drop blanks, first declaration wins).
//! 2. Probe every seed in order and keep the ones that load.
//! 3. If enough seeds loaded, or there is no page key, stop: the page already
//!    says what to show, or there is nothing to guess from.
//! 4. Otherwise walk the candidate sequence (see [`crate::naming`]) for every
//!    casing of the key, skipping anything already declared or accepted, and
//!    append each candidate that loads. Stop at the image cap or when the
//!    candidates run out.
//!
//! ## Ordering
//!
//! Probes are awaited one at a time. With the same probe answers the result is
//! always the same gallery in the same order, and nothing past the cap is
//! ever probed.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

use crate::config::{DiscoveryConfig, GalleryConfig};
use crate::naming;
use crate::probe::ExistenceProbe;
use crate::seeds;
use crate::types::{Gallery, GalleryItem, Origin, SeedImage};

/// Stop conditions for resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Skip discovery once this many seeds load.
    pub seed_short_circuit: usize,
    /// Stop discovery once the gallery holds this many images.
    pub max_images: usize,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            seed_short_circuit: 2,
            max_images: 8,
        }
    }
}

impl ResolvePolicy {
    pub fn seeds_sufficient(&self, valid_seeds: usize) -> bool {
        valid_seeds >= self.seed_short_circuit
    }

    pub fn is_full(&self, gallery_len: usize) -> bool {
        gallery_len >= self.max_images
    }
}

/// Why resolution stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Enough seeds loaded; nothing was guessed.
    SeedsSufficient,
    /// The page has no key to guess from.
    NoPageKey,
    /// The gallery reached the image cap.
    CapReached,
    /// Every candidate was tried.
    Exhausted,
}

/// Counters describing one resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    pub seeds_declared: usize,
    pub seed_probes: usize,
    pub candidate_probes: usize,
    /// Candidates not probed because their source was already seen.
    pub candidates_skipped: usize,
    pub stop: StopReason,
}

/// Result of resolving one page.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub page_key: String,
    pub gallery: Gallery,
    pub stats: ResolveStats,
}

/// Resolves galleries with a fixed discovery configuration.
#[derive(Debug, Clone)]
pub struct GalleryResolver {
    discovery: DiscoveryConfig,
    policy: ResolvePolicy,
    default_label: String,
}

impl GalleryResolver {
    pub fn new(config: &GalleryConfig) -> Self {
        Self {
            discovery: config.discovery.clone(),
            policy: config.policy(),
            default_label: config.labels.default.clone(),
        }
    }

    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    #[instrument(skip(self, seeds, probe), fields(seeds = seeds.len()))]
    pub async fn resolve<P: ExistenceProbe>(
        &self,
        seeds: &[SeedImage],
        page_key: &str,
        probe: &P,
    ) -> Resolution {
        let normalized = seeds::normalize(seeds, &self.default_label);
        let mut seen: HashSet<String> = normalized.iter().map(|s| s.source.clone()).collect();
        let mut gallery = Gallery::new();
        let mut seed_probes = 0;

        for seed in &normalized {
            seed_probes += 1;
            if probe.exists(&seed.source).await {
                gallery.push(GalleryItem {
                    source: seed.source.clone(),
                    label: seed.label.clone(),
                    origin: Origin::Seed,
                });
            } else {
                debug!(source = %seed.source, "seed did not load");
            }
        }

        let mut stats = ResolveStats {
            seeds_declared: normalized.len(),
            seed_probes,
            candidate_probes: 0,
            candidates_skipped: 0,
            stop: StopReason::Exhausted,
        };

        let page_key = page_key.trim();
        if self.policy.seeds_sufficient(gallery.len()) {
            stats.stop = StopReason::SeedsSufficient;
        } else if page_key.is_empty() {
            stats.stop = StopReason::NoPageKey;
        } else {
            let mut candidates = naming::all_candidates(page_key, &self.discovery);
            stats.stop = loop {
                if self.policy.is_full(gallery.len()) {
                    break StopReason::CapReached;
                }
                let Some(candidate) = candidates.next() else {
                    break StopReason::Exhausted;
                };
                if seen.contains(&candidate) {
                    stats.candidates_skipped += 1;
                    continue;
                }
                stats.candidate_probes += 1;
                if probe.exists(&candidate).await {
                    debug!(source = %candidate, "discovered image");
                    seen.insert(candidate.clone());
                    gallery.push(GalleryItem {
                        source: candidate,
                        label: self.default_label.clone(),
                        origin: Origin::Discovered,
                    });
                }
            };
        }

        info!(
            images = gallery.len(),
            seed_probes = stats.seed_probes,
            candidate_probes = stats.candidate_probes,
            stop = ?stats.stop,
            "gallery resolved"
        );

        Resolution {
            page_key: page_key.to_string(),
            gallery,
            stats,
        }
    }
}
