//! Descriptor extraction, caching, and catalog search

pub mod cache;
pub mod port_desc;
pub mod search;
pub mod spawner;

pub use cache::{CacheStats, DescriptorCache};
pub use port_desc::PortDescriptor;
pub use search::{discover, DiscoverFilter, DEFAULT_MAX_RESULTS};
pub use spawner::{
    extract_descriptor, reroute_descriptor, CastInfo, MemberInfo, NodeSpawnerDescriptor,
    SpawnerKind, VariableInfo,
};
