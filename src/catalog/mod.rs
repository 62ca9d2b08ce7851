//! Catalog model - templates, the provider trait, and weak handles

pub mod builtin;
pub mod handle;
pub mod provider;
pub mod template;

pub use builtin::standard_catalog;
pub use handle::Handle;
pub use provider::{CatalogProvider, ContextFilter, EditingContext, ScriptCatalog};
pub use template::{MemberSpec, NodeTemplate, TemplateKind, VariableAccess, VariableSpec};
