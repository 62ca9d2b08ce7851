//! Catalog provider: the registry of node templates
//!
//! The global catalog is host-owned mutable state. Components that search
//! or resolve against it take it as a read-only [`CatalogProvider`]
//! dependency instead of reaching for a hidden global, so they can be unit
//! tested against a small fake catalog.

use super::handle::Handle;
use super::template::{NodeTemplate, TemplateKind, VariableAccess, VariableSpec};
use crate::graph::ScriptDocument;
use log::debug;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Editing context a candidate entry is judged against
pub struct EditingContext<'a> {
    pub document: &'a ScriptDocument,
}

/// Context-sensitivity predicate: is this candidate legal to place in this
/// document context. The host's internal heuristics are not replicated
/// here; callers inject whatever rule their host applies.
pub type ContextFilter = Box<dyn Fn(&NodeTemplate, &EditingContext) -> bool + Send + Sync>;

/// Read-only view over the catalog
pub trait CatalogProvider {
    /// Snapshot of the current entries as weak handles, in deterministic
    /// registration-key order
    fn entries(&self) -> Vec<Handle<NodeTemplate>>;

    /// Applies the context-sensitivity filter to one candidate
    fn is_legal_in_context(&self, template: &NodeTemplate, context: &EditingContext) -> bool;
}

/// In-memory catalog registry
///
/// Entries are keyed by their registration key (display name, suffixed on
/// collision) purely for deterministic iteration; identity for clients is
/// the spawner key derived at extraction time.
pub struct ScriptCatalog {
    templates: BTreeMap<String, Arc<NodeTemplate>>,
    context_filter: Option<ContextFilter>,
}

impl ScriptCatalog {
    /// Creates a new empty catalog
    pub fn new() -> Self {
        Self {
            templates: BTreeMap::new(),
            context_filter: None,
        }
    }

    /// Installs the context-sensitivity predicate
    pub fn set_context_filter(&mut self, filter: ContextFilter) {
        self.context_filter = Some(filter);
    }

    /// Registers a template, returning the strong reference the catalog
    /// keeps
    pub fn register(&mut self, template: NodeTemplate) -> Arc<NodeTemplate> {
        let mut key = template.display_name.clone();
        let mut suffix = 1;
        while self.templates.contains_key(&key) {
            suffix += 1;
            key = format!("{} #{}", template.display_name, suffix);
        }
        let entry = Arc::new(template);
        debug!("catalog: registered '{}'", key);
        self.templates.insert(key, entry.clone());
        entry
    }

    /// Registers GET/SET accessor entries for every variable a document
    /// declares, the way the host's reflection system contributes them
    pub fn register_document_variables(&mut self, document: &ScriptDocument) {
        for decl in &document.variables {
            let variable = VariableSpec {
                name: decl.name.clone(),
                declared_type: decl.declared_type.clone(),
                owning_type: Some(document.generated_type.clone()),
            };
            self.register(
                NodeTemplate::new(
                    format!("Get {}", decl.name),
                    "Variables",
                    TemplateKind::VariableAccessor {
                        access: VariableAccess::Get,
                        variable: variable.clone(),
                    },
                )
                .with_scope(document.generated_type.clone()),
            );
            self.register(
                NodeTemplate::new(
                    format!("Set {}", decl.name),
                    "Variables",
                    TemplateKind::VariableAccessor {
                        access: VariableAccess::Set,
                        variable,
                    },
                )
                .with_scope(document.generated_type.clone()),
            );
        }
    }

    /// Drops the entry registered under the given key; weak handles held
    /// elsewhere go stale and self-heal on their next lookup
    pub fn unregister(&mut self, key: &str) -> bool {
        self.templates.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for ScriptCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogProvider for ScriptCatalog {
    fn entries(&self) -> Vec<Handle<NodeTemplate>> {
        self.templates.values().map(Handle::from_arc).collect()
    }

    fn is_legal_in_context(&self, template: &NodeTemplate, context: &EditingContext) -> bool {
        match &self.context_filter {
            Some(filter) => filter(template, context),
            None => true,
        }
    }
}
