//! Spawner resolution pipeline
//!
//! An ordered chain of resolver strategies, each tried only when the prior
//! one fails. The tie-break order is a first-class property: `TIER_ORDER`
//! is the single place it is defined, and each tier is its own function so
//! tests can exercise one tier in isolation. Every success below tier 1 is
//! cached at the most specific key it was found under, so repeated
//! creation of the same kind degenerates to a cache hit.

use crate::catalog::{CatalogProvider, EditingContext, NodeTemplate};
use crate::descriptor::{extract_descriptor, DescriptorCache};
use crate::error::EngineError;
use crate::graph::ScriptDocument;
use log::debug;
use std::sync::Arc;

/// What the client gave us to resolve: an exact key, a kind name, hints
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    /// Exact spawner key from a prior discovery, preferred by all callers
    pub spawner_key: Option<String>,
    /// Node-kind name (member or display name) when no key is known
    pub kind_name: Option<String>,
    /// Owning-type hint narrowing overloaded member names
    pub owner_hint: Option<String>,
}

impl ResolveRequest {
    pub fn exact(key: impl Into<String>) -> Self {
        Self {
            spawner_key: Some(key.into()),
            ..Self::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            kind_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn by_name_and_owner(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            kind_name: Some(name.into()),
            owner_hint: Some(owner.into()),
            ..Self::default()
        }
    }

    /// Kind name, falling back to the member part of a `Owner::Member` key
    fn effective_kind_name(&self) -> Option<&str> {
        self.kind_name.as_deref().or_else(|| {
            self.spawner_key
                .as_deref()
                .map(|key| key.rsplit("::").next().unwrap_or(key))
        })
    }

    /// Owner hint, falling back to the owner part of a `Owner::Member` key
    fn effective_owner(&self) -> Option<&str> {
        self.owner_hint.as_deref().or_else(|| {
            self.spawner_key
                .as_deref()
                .and_then(|key| key.rsplit_once("::").map(|(owner, _)| owner))
        })
    }

    /// The identifier reported when nothing resolves
    fn attempted_key(&self) -> String {
        if let Some(key) = &self.spawner_key {
            return key.clone();
        }
        match (&self.kind_name, &self.owner_hint) {
            (Some(kind), Some(owner)) => format!("{}::{}", owner, kind),
            (Some(kind), None) => kind.clone(),
            _ => String::new(),
        }
    }
}

/// The resolution tiers, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveTier {
    ExactKey,
    CompositeKey,
    UnscopedScan,
    ContextScan,
}

impl ResolveTier {
    pub fn name(&self) -> &'static str {
        match self {
            ResolveTier::ExactKey => "exact key",
            ResolveTier::CompositeKey => "cached composite key",
            ResolveTier::UnscopedScan => "unscoped catalog scan",
            ResolveTier::ContextScan => "context-filtered scan",
        }
    }
}

/// Tie-break order of the pipeline
pub const TIER_ORDER: [ResolveTier; 4] = [
    ResolveTier::ExactKey,
    ResolveTier::CompositeKey,
    ResolveTier::UnscopedScan,
    ResolveTier::ContextScan,
];

fn name_matches(template: &NodeTemplate, name: &str) -> bool {
    if template.display_name.eq_ignore_ascii_case(name) {
        return true;
    }
    template
        .member()
        .map(|spec| spec.member_name.eq_ignore_ascii_case(name))
        .unwrap_or(false)
}

/// Tier 1: exact key straight out of the cache
fn exact_key(cache: &mut DescriptorCache, request: &ResolveRequest) -> Option<Arc<NodeTemplate>> {
    let key = request.spawner_key.as_deref()?;
    cache.lookup(key)
}

/// Tier 2: composite `owner::kind` key, checked before any search so that
/// repeated creation of the same kind is cheap
fn composite_key(
    cache: &mut DescriptorCache,
    request: &ResolveRequest,
) -> Option<Arc<NodeTemplate>> {
    let kind = request.kind_name.as_deref()?;
    let owner = request.owner_hint.as_deref()?;
    cache.lookup(&format!("{}::{}", owner, kind))
}

/// Tier 3: scan for any entry whose name matches the kind name. Only
/// attempted when no owning-type hint narrows the request.
fn scan_unscoped(
    catalog: &dyn CatalogProvider,
    request: &ResolveRequest,
) -> Option<Arc<NodeTemplate>> {
    if request.effective_owner().is_some() {
        return None;
    }
    let name = request.effective_kind_name()?;
    catalog
        .entries()
        .into_iter()
        .filter_map(|handle| handle.get())
        .find(|entry| name_matches(entry, name))
}

/// Tier 4: collect every name match, keep the context-legal subset, and
/// prefer an exact owning-type match within it over the first result
fn scan_context(
    catalog: &dyn CatalogProvider,
    document: &ScriptDocument,
    request: &ResolveRequest,
) -> Option<Arc<NodeTemplate>> {
    let name = request.effective_kind_name()?;
    let candidates: Vec<Arc<NodeTemplate>> = catalog
        .entries()
        .into_iter()
        .filter_map(|handle| handle.get())
        .filter(|entry| name_matches(entry, name))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let context = EditingContext { document };
    let legal: Vec<Arc<NodeTemplate>> = candidates
        .iter()
        .filter(|entry| catalog.is_legal_in_context(entry, &context))
        .cloned()
        .collect();
    let pool = if legal.is_empty() { &candidates } else { &legal };

    if let Some(owner) = request.effective_owner() {
        if let Some(exact) = pool
            .iter()
            .find(|entry| {
                entry
                    .effective_owning_type()
                    .map(|o| o.eq_ignore_ascii_case(owner))
                    .unwrap_or(false)
            })
            .cloned()
        {
            return Some(exact);
        }
    }
    pool.first().cloned()
}

/// Resolves a client request to one concrete catalog entry
///
/// Returns the entry and the tier that produced it; failure reports the
/// attempted key and the last tier reached, never a fabricated node.
pub fn resolve(
    catalog: &dyn CatalogProvider,
    document: &ScriptDocument,
    cache: &mut DescriptorCache,
    request: &ResolveRequest,
) -> Result<(Arc<NodeTemplate>, ResolveTier), EngineError> {
    let mut last_tier = ResolveTier::ExactKey;

    for tier in TIER_ORDER {
        last_tier = tier;
        let hit = match tier {
            ResolveTier::ExactKey => exact_key(cache, request),
            ResolveTier::CompositeKey => composite_key(cache, request),
            ResolveTier::UnscopedScan => scan_unscoped(catalog, request),
            ResolveTier::ContextScan => scan_context(catalog, document, request),
        };
        if let Some(entry) = hit {
            debug!(
                "resolve: '{}' found via {}",
                request.attempted_key(),
                tier.name()
            );
            if tier != ResolveTier::ExactKey {
                // Cache under the canonical key so the next request lands
                // on tier 1; the composite hint key is stored too when the
                // request carried one
                let canonical = extract_descriptor(&entry, document).spawner_key;
                cache.insert(canonical, &entry);
                if let (Some(kind), Some(owner)) =
                    (request.kind_name.as_deref(), request.owner_hint.as_deref())
                {
                    cache.insert(format!("{}::{}", owner, kind), &entry);
                }
            }
            return Ok((entry, tier));
        }
    }

    Err(EngineError::spawner_not_found(
        request.attempted_key(),
        last_tier.name(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::standard_catalog;
    use crate::descriptor::{discover, DiscoverFilter};
    use crate::graph::ScriptDocument;

    fn doc() -> ScriptDocument {
        ScriptDocument::new("BP_Door", "Actor")
    }

    #[test]
    fn test_exact_key_round_trip() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let results = discover(
            &catalog,
            &document,
            &mut cache,
            &DiscoverFilter::with_term("PrintString"),
        );
        let key = results[0].spawner_key.clone();

        let (entry, tier) = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest::exact(&key),
        )
        .unwrap();
        assert_eq!(tier, ResolveTier::ExactKey);
        // Same underlying catalog entry as the descriptor came from
        assert_eq!(
            extract_descriptor(&entry, &document).spawner_key,
            key
        );
    }

    #[test]
    fn test_unscoped_scan_by_member_name() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let (entry, tier) = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest::by_name("Delay"),
        )
        .unwrap();
        assert_eq!(tier, ResolveTier::UnscopedScan);
        assert_eq!(entry.display_name, "Delay");

        // The success was cached at the canonical key; tier 1 now hits
        let (_, tier) = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest::exact("SystemLibrary::Delay"),
        )
        .unwrap();
        assert_eq!(tier, ResolveTier::ExactKey);
    }

    #[test]
    fn test_owner_hint_disambiguates_overloads() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let (entry, tier) = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest::by_name_and_owner("GetVelocity", "MovementComponent"),
        )
        .unwrap();
        assert_eq!(tier, ResolveTier::ContextScan);
        assert_eq!(entry.effective_owning_type(), Some("MovementComponent"));

        // Second identical request hits the cached composite key
        let (_, tier) = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest::by_name_and_owner("GetVelocity", "MovementComponent"),
        )
        .unwrap();
        assert_eq!(tier, ResolveTier::CompositeKey);
    }

    #[test]
    fn test_context_filter_prunes_candidates() {
        let mut catalog = standard_catalog();
        // Only the component overload is legal in this host context
        catalog.set_context_filter(Box::new(|template, _| {
            template.effective_owning_type() != Some("Actor")
        }));
        let document = doc();
        let mut cache = DescriptorCache::new();

        let (entry, _) = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest {
                kind_name: Some("GetVelocity".to_string()),
                owner_hint: Some("NoSuchOwner".to_string()),
                spawner_key: None,
            },
        )
        .unwrap();
        assert_eq!(entry.effective_owning_type(), Some("MovementComponent"));
    }

    #[test]
    fn test_unresolvable_key_reports_attempted_key() {
        let catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        let err = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest::exact("Foo::Bar"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Foo::Bar"));
        assert!(err.suggestion().unwrap().contains("discover_nodes"));
    }

    #[test]
    fn test_stale_cache_entry_falls_through_to_scan() {
        let mut catalog = standard_catalog();
        let document = doc();
        let mut cache = DescriptorCache::new();

        // Prime the cache, then drop the backing entry
        discover(
            &catalog,
            &document,
            &mut cache,
            &DiscoverFilter::with_term("Delay"),
        );
        assert!(catalog.unregister("Delay"));

        // Tier 1 self-heals (dead handle evicted) and the scan tiers find
        // nothing because the entry is really gone
        let err = resolve(
            &catalog,
            &document,
            &mut cache,
            &ResolveRequest::exact("SystemLibrary::Delay"),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
        assert_eq!(cache.stats().evictions, 1);
    }
}
