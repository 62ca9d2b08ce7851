//! Search and filter engine over the catalog
//!
//! One walk of the global catalog per call. Every descriptor that passes
//! the filters is written into the descriptor cache so a follow-up
//! exact-key resolution is O(1). The result cap is hard; callers page by
//! narrowing filters or raising the cap.

use super::cache::DescriptorCache;
use super::spawner::{extract_descriptor, reroute_descriptor, NodeSpawnerDescriptor, NEUTRAL_RELEVANCE};
use crate::catalog::CatalogProvider;
use crate::graph::ScriptDocument;
use log::debug;

/// Default result cap when the caller does not pass one
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Active filters for one discovery call; all active filters must pass
#[derive(Debug, Clone)]
pub struct DiscoverFilter {
    pub search_term: Option<String>,
    pub category: Option<String>,
    pub owner_type: Option<String>,
    pub max_results: usize,
}

impl Default for DiscoverFilter {
    fn default() -> Self {
        Self {
            search_term: None,
            category: None,
            owner_type: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl DiscoverFilter {
    pub fn with_term(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn passes_filters(descriptor: &NodeSpawnerDescriptor, filter: &DiscoverFilter) -> bool {
    if let Some(term) = &filter.search_term {
        let member_name = descriptor
            .member
            .as_ref()
            .map(|m| m.member_name.as_str())
            .unwrap_or_default();
        let hit = contains_ci(&descriptor.display_name, term)
            || contains_ci(member_name, term)
            || contains_ci(&descriptor.spawner_key, term);
        if !hit {
            return false;
        }
    }
    if let Some(category) = &filter.category {
        if !contains_ci(&descriptor.category, category) {
            return false;
        }
    }
    if let Some(owner) = &filter.owner_type {
        let owning_type = descriptor
            .member
            .as_ref()
            .and_then(|m| m.owning_type.as_deref())
            .or_else(|| {
                descriptor
                    .variable
                    .as_ref()
                    .and_then(|v| v.owning_type.as_deref())
            })
            .unwrap_or_default();
        if !contains_ci(owning_type, owner) {
            return false;
        }
    }
    true
}

/// Relevance score used for client-side ranking only, never for
/// inclusion or exclusion
fn relevance(descriptor: &NodeSpawnerDescriptor, term: Option<&str>) -> u32 {
    let term = match term {
        Some(t) if !t.is_empty() => t,
        _ => return NEUTRAL_RELEVANCE,
    };
    let term_lower = term.to_lowercase();

    let name_score = |name: &str| -> u32 {
        let name_lower = name.to_lowercase();
        if name_lower == term_lower {
            100
        } else if name_lower.starts_with(&term_lower) {
            80
        } else if name_lower.contains(&term_lower) {
            60
        } else {
            0
        }
    };

    let member_name = descriptor
        .member
        .as_ref()
        .map(|m| m.member_name.as_str())
        .unwrap_or_default();
    let mut score = name_score(&descriptor.display_name).max(name_score(member_name));

    if descriptor
        .keywords
        .iter()
        .any(|keyword| contains_ci(keyword, term))
    {
        score += 40;
    }
    if contains_ci(&descriptor.tooltip, term) {
        score += 20;
    }
    score
}

/// Walks the catalog once, returning a bounded, relevance-ordered set of
/// descriptors. Passing descriptors are cached under their spawner keys.
pub fn discover(
    catalog: &dyn CatalogProvider,
    document: &ScriptDocument,
    cache: &mut DescriptorCache,
    filter: &DiscoverFilter,
) -> Vec<NodeSpawnerDescriptor> {
    let mut results: Vec<NodeSpawnerDescriptor> = Vec::new();
    let mut exhausted = true;

    for handle in catalog.entries() {
        // Entries can die between calls; revalidate, never dereference blind
        let Some(entry) = handle.get() else { continue };
        let mut descriptor = extract_descriptor(&entry, document);
        if !passes_filters(&descriptor, filter) {
            continue;
        }
        descriptor.relevance = relevance(&descriptor, filter.search_term.as_deref());
        cache.insert(descriptor.spawner_key.clone(), &entry);
        results.push(descriptor);
        if results.len() >= filter.max_results {
            exhausted = false;
            break;
        }
    }

    // Node kinds with no catalog representation come last, only when the
    // walk ran to the end of the catalog
    if exhausted && results.len() < filter.max_results {
        let mut synthetic = reroute_descriptor();
        if passes_filters(&synthetic, filter) {
            synthetic.relevance = relevance(&synthetic, filter.search_term.as_deref());
            results.push(synthetic);
        }
    }

    results.sort_by(|a, b| {
        b.relevance
            .cmp(&a.relevance)
            .then_with(|| a.spawner_key.cmp(&b.spawner_key))
    });
    debug!(
        "discover: {} result(s), cache now holds {} key(s)",
        results.len(),
        cache.len()
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::standard_catalog;
    use crate::descriptor::spawner::SpawnerKind;
    use crate::graph::ScriptDocument;
    use std::collections::BTreeSet;

    fn doc() -> ScriptDocument {
        ScriptDocument::new("BP_Door", "Actor")
    }

    #[test]
    fn test_discover_print_string() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let filter = DiscoverFilter {
            search_term: Some("PrintString".to_string()),
            max_results: 10,
            ..DiscoverFilter::default()
        };
        let results = discover(&catalog, &document, &mut cache, &filter);

        assert!(!results.is_empty());
        let hit = results
            .iter()
            .find(|d| d.node_kind == SpawnerKind::FunctionCall)
            .expect("a function_call descriptor");
        assert_eq!(hit.member.as_ref().unwrap().member_name, "PrintString");
        // Discovery primes the cache for exact-key resolution
        assert!(cache.lookup(&hit.spawner_key).is_some());
    }

    #[test]
    fn test_filters_and_semantics() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        // Category and owner filters AND together with the term
        let filter = DiscoverFilter {
            search_term: Some("Velocity".to_string()),
            owner_type: Some("MovementComponent".to_string()),
            ..DiscoverFilter::default()
        };
        let results = discover(&catalog, &document, &mut cache, &filter);
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].member.as_ref().unwrap().owning_type.as_deref(),
            Some("MovementComponent")
        );
    }

    #[test]
    fn test_max_results_is_a_hard_cap() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let filter = DiscoverFilter {
            max_results: 3,
            ..DiscoverFilter::default()
        };
        let results = discover(&catalog, &document, &mut cache, &filter);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_unfiltered_walk_appends_synthetic_reroute() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let results = discover(&catalog, &document, &mut cache, &DiscoverFilter::default());
        let reroute = results
            .iter()
            .find(|d| d.node_kind == SpawnerKind::Reroute)
            .expect("synthetic reroute");
        assert!(reroute.is_synthetic);
        // No backing entry means no cache write for the synthetic
        assert!(cache.lookup("Reroute").is_none());
    }

    #[test]
    fn test_discover_is_idempotent_as_a_set() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();
        let filter = DiscoverFilter::with_term("Get");

        let first: BTreeSet<String> = discover(&catalog, &document, &mut cache, &filter)
            .into_iter()
            .map(|d| d.spawner_key)
            .collect();
        let second: BTreeSet<String> = discover(&catalog, &document, &mut cache, &filter)
            .into_iter()
            .map(|d| d.spawner_key)
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_relevance_orders_exact_match_first() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let results = discover(
            &catalog,
            &document,
            &mut cache,
            &DiscoverFilter::with_term("Delay"),
        );
        assert!(!results.is_empty());
        assert_eq!(results[0].display_name, "Delay");
        assert!(results[0].relevance >= 100);
    }

    #[test]
    fn test_descriptor_keys_are_never_empty() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        for descriptor in discover(&catalog, &document, &mut cache, &DiscoverFilter::default()) {
            assert!(!descriptor.spawner_key.is_empty());
        }
    }
}
