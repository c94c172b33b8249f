//! Candidate naming convention for images that pages don't declare.
//!
//! Product images are dropped into a shared image tree under a directory named
//! after the page key, with filenames that follow one of a handful of loose
//! conventions. Nothing records which one was used, so discovery guesses:
//!
//! ```text
//! ../shared/img/sofa/main.png
//! ../shared/img/sofa/sofa_01.jpg
//! ../shared/img/guide/sofa/sofa-g-2.webp
//! ```
//!
//! ## Ordering
//!
//! Candidates are produced directory-major, then by name, then by extension.
//! The order is the probe priority: the resolver stops early, so anything
//! earlier in the sequence wins under partial availability.
//!
//! ## Numbered names
//!
//! For each `i` in `1..=max_index`, with `n`, `n2`, `n3` being `i` unpadded and
//! zero-padded to two and three digits:
//!
//! ```text
//! {key}_{n}    {key}_{n2}    {key}_{n3}
//! {key}_g_{n}  {key}_g_{n2}  {key}_g_{n3}
//! {key}-g_{n}  {key}-g_{n2}
//! {key}-g-{n}  {key}-g-{n2}
//! ```

use crate::config::DiscoveryConfig;

/// Page key from a resource path: the second-to-last non-empty segment.
///
/// - `"/products/sofa/index.html"` → `"sofa"`
/// - `"products/sofa/"` → `"products"`
/// - `"index.html"` → `""`
pub fn page_key(resource_path: &str) -> String {
    let normalized = resource_path.replace('\\', "/");
    let parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();
    if parts.len() < 2 {
        return String::new();
    }
    parts[parts.len() - 2].to_string()
}

/// Casings of a key to try, in order: original, lower, upper.
///
/// Duplicates and empty strings are dropped, so an all-lowercase key yields
/// two variants and a key with no cased letters yields one.
pub fn key_variants(key: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::with_capacity(3);
    for v in [key.to_string(), key.to_lowercase(), key.to_uppercase()] {
        if !v.is_empty() && !variants.contains(&v) {
            variants.push(v);
        }
    }
    variants
}

/// Base names for one key: the fixed names, then the numbered ones.
pub fn base_names(key: &str, fixed: &[String], max_index: u32) -> Vec<String> {
    let mut names: Vec<String> = fixed.to_vec();
    for index in 1..=max_index {
        let n = index.to_string();
        let n2 = format!("{index:02}");
        let n3 = format!("{index:03}");
        names.extend([
            format!("{key}_{n}"),
            format!("{key}_{n2}"),
            format!("{key}_{n3}"),
            format!("{key}_g_{n}"),
            format!("{key}_g_{n2}"),
            format!("{key}_g_{n3}"),
            format!("{key}-g_{n}"),
            format!("{key}-g_{n2}"),
            format!("{key}-g-{n}"),
            format!("{key}-g-{n2}"),
        ]);
    }
    names
}

/// Directories probed for one key: primary first, then the guide directory.
pub fn candidate_dirs(key: &str, discovery: &DiscoveryConfig) -> [String; 2] {
    let root = discovery.image_root.trim_end_matches('/');
    [
        format!("{root}/{key}"),
        format!("{root}/{}/{key}", discovery.guide_dir.trim_matches('/')),
    ]
}

/// Lazily generated candidate locations for a single key casing.
///
/// Finite and deterministic; no I/O.
pub fn candidates(
    key: &str,
    discovery: &DiscoveryConfig,
) -> impl Iterator<Item = String> + use<> {
    let names = base_names(key, &discovery.base_names, discovery.max_index);
    let extensions = discovery.extensions.clone();
    candidate_dirs(key, discovery)
        .into_iter()
        .flat_map(move |dir| {
            let names = names.clone();
            let extensions = extensions.clone();
            names.into_iter().flat_map(move |name| {
                let dir = dir.clone();
                extensions
                    .clone()
                    .into_iter()
                    .map(move |ext| format!("{dir}/{name}.{ext}"))
            })
        })
}

/// Candidates for every casing of `key`, one casing exhausted before the next.
pub fn all_candidates(
    key: &str,
    discovery: &DiscoveryConfig,
) -> impl Iterator<Item = String> + use<> {
    let discovery = discovery.clone();
    key_variants(key)
        .into_iter()
        .flat_map(move |variant| candidates(&variant, &discovery))
}
