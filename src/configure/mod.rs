//! Node instantiation and kind-specific configuration dispatch

pub mod defaults;
pub mod routing;

pub use defaults::{apply_defaults, DefaultsReport, FailedPort};
pub use routing::{create_reroute_path, insert_reroute, GRID_SIZE};

use crate::catalog::NodeTemplate;
use crate::error::EngineError;
use crate::graph::{CallTarget, Node, NodeId, NodeKind, ScriptDocument};
use crate::typeres::TypeRegistry;
use glam::Vec2;
use log::{debug, warn};
use std::sync::Arc;

/// What to create: a resolved catalog entry, or the synthetic pass-through
/// kind that has no catalog representation
pub enum CreationSource {
    Catalog(Arc<NodeTemplate>),
    Reroute,
}

/// Kind-specific configuration hints parsed from the client's request
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Owning type for an external variable access
    pub owner_class: Option<String>,
    /// "external" or "local"; external forces an owner lookup
    pub member_scope: Option<String>,
    /// `false` means the variable is not local to the document
    pub is_local: Option<bool>,
    /// Cast target override
    pub target_type: Option<String>,
    /// Class whose instance a spawn-style call should produce
    pub class_to_spawn: Option<String>,
}

impl NodeConfig {
    fn wants_external_member(&self) -> bool {
        self.owner_class.is_some()
            || self.member_scope.as_deref() == Some("external")
            || self.is_local == Some(false)
    }
}

/// Creates a node from the resolved source at `position` inside the
/// document's graph, then dispatches configuration by node kind.
///
/// Port reallocation is the final step of every branch, so port shape
/// always reflects the just-applied configuration.
pub fn create_and_configure(
    document: &mut ScriptDocument,
    types: &TypeRegistry,
    source: CreationSource,
    position: Vec2,
    config: &NodeConfig,
) -> Result<NodeId, EngineError> {
    let node_id = match source {
        CreationSource::Catalog(template) => template.invoke(&mut document.graph, position),
        CreationSource::Reroute => {
            // Constructed directly; its two ports carry no type until wired
            let node = Node::new(0, NodeKind::Reroute, position);
            document.graph.add_node(node)
        }
    };

    let self_type = document.generated_type.clone();
    let parent_class = document.parent_class.clone();

    // A node that fails configuration is removed again; a half-configured
    // node must not be left behind in the graph
    if let Err(err) = configure_node(document, types, node_id, config, &self_type, &parent_class) {
        document.graph.remove_node(node_id);
        return Err(err);
    }
    Ok(node_id)
}

fn configure_node(
    document: &mut ScriptDocument,
    types: &TypeRegistry,
    node_id: NodeId,
    config: &NodeConfig,
    self_type: &str,
    parent_class: &str,
) -> Result<(), EngineError> {
    let node = document
        .graph
        .node_mut(node_id)
        .ok_or_else(|| EngineError::node_not_found(node_id.to_string()))?;

    match &mut node.kind {
        NodeKind::FunctionCall(binding) => {
            if let Some(class) = &config.class_to_spawn {
                // Resolved before port allocation; the result pin's shape
                // depends on the chosen class
                let resolved = types
                    .resolve(class)
                    .ok_or_else(|| EngineError::type_not_found(class.clone()))?;
                binding.class_to_spawn = Some(resolved.name.clone());
            }
            binding.call_target = if binding.is_static {
                CallTarget::External
            } else {
                let is_self = binding
                    .owning_type
                    .as_deref()
                    .map(|owner| types.is_a(self_type, owner) || types.is_a(parent_class, owner))
                    .unwrap_or(false);
                if is_self {
                    CallTarget::SelfContext
                } else {
                    CallTarget::External
                }
            };
            debug!(
                "configured call '{}' target={:?}",
                binding.member_name, binding.call_target
            );
        }
        NodeKind::VariableGet(binding) | NodeKind::VariableSet(binding) => {
            if config.wants_external_member() {
                match config.owner_class.as_deref().and_then(|c| types.resolve(c)) {
                    Some(owner) => {
                        binding.owning_type = Some(owner.name.clone());
                        binding.is_external = true;
                    }
                    None => {
                        warn!(
                            "variable '{}': external owner hint {:?} did not resolve, \
                             falling back to self member",
                            binding.variable_name, config.owner_class
                        );
                        binding.owning_type = None;
                        binding.is_external = false;
                    }
                }
            } else {
                binding.is_external = binding
                    .owning_type
                    .as_deref()
                    .map(|owner| owner != self_type)
                    .unwrap_or(false);
            }
        }
        NodeKind::Cast(cast) => {
            let raw = config
                .target_type
                .clone()
                .or_else(|| cast.target_type.clone());
            if let Some(raw) = raw {
                let resolved = types
                    .resolve(&raw)
                    .ok_or_else(|| EngineError::type_not_found(raw.clone()))?;
                cast.target_type = Some(resolved.name.clone());
            }
        }
        NodeKind::Reroute | NodeKind::Generic => {}
    }

    node.rebuild_ports();
    Ok(())
}
