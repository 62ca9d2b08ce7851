//! Nodelink core library
//!
//! Catalog resolution and script-node configuration engine for visual
//! script graphs: descriptor extraction, search, multi-tier spawner
//! resolution, node instantiation with kind-specific configuration, port
//! defaults, and pass-through path building.

// Public modules
pub mod catalog;
pub mod commands;
pub mod configure;
pub mod descriptor;
pub mod error;
pub mod graph;
pub mod resolve;
pub mod typeres;

// Re-export commonly used types
pub use catalog::{CatalogProvider, NodeTemplate, ScriptCatalog};
pub use commands::Engine;
pub use descriptor::{DescriptorCache, DiscoverFilter, NodeSpawnerDescriptor};
pub use error::EngineError;
pub use graph::{Node, NodeId, NodeKind, ScriptDocument, ScriptGraph};
pub use resolve::{ResolveRequest, ResolveTier};
pub use typeres::TypeRegistry;
