//! Spawner descriptors: the serializable summary of one catalog entry
//!
//! Extraction never fails. Any metadata gap degrades the classification to
//! `generic` and keys the entry by display name; a classification failure
//! must never block discovery.

use super::port_desc::PortDescriptor;
use crate::catalog::{NodeTemplate, TemplateKind, VariableAccess};
use crate::graph::{Node, NodeKind, ScriptDocument};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Kind classification carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnerKind {
    FunctionCall,
    VariableGet,
    VariableSet,
    Cast,
    Reroute,
    Generic,
}

/// Callable-member metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberInfo {
    pub member_name: String,
    pub owning_type: Option<String>,
    pub module: Option<String>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_pure: bool,
}

/// Variable metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableInfo {
    pub variable_name: String,
    pub declared_type: String,
    pub owning_type: Option<String>,
    pub is_external_member: bool,
}

/// Cast metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastInfo {
    pub target_type: String,
}

/// Stable, serializable descriptor for one catalog entry
///
/// Exactly one kind-specific metadata block is populated. `spawner_key` is
/// the identity used for exact re-lookup; it is stable within one catalog
/// snapshot, not across host restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpawnerDescriptor {
    pub spawner_key: String,
    pub display_name: String,
    pub category: String,
    pub tooltip: String,
    pub keywords: Vec<String>,
    pub node_kind: SpawnerKind,
    pub member: Option<MemberInfo>,
    pub variable: Option<VariableInfo>,
    pub cast: Option<CastInfo>,
    pub ports: Vec<PortDescriptor>,
    pub expected_port_count: usize,
    pub is_synthetic: bool,
    /// Ranking score from the search that produced this descriptor
    pub relevance: u32,
}

/// Neutral relevance for descriptors produced outside a term search
pub const NEUTRAL_RELEVANCE: u32 = 50;

/// Extracts a descriptor for one catalog entry in the context of the given
/// document. Never fails.
pub fn extract_descriptor(
    template: &NodeTemplate,
    document: &ScriptDocument,
) -> NodeSpawnerDescriptor {
    let mut descriptor = NodeSpawnerDescriptor {
        spawner_key: template.display_name.clone(),
        display_name: template.display_name.clone(),
        category: template.category.clone(),
        tooltip: template.tooltip.clone(),
        keywords: template.keywords.clone(),
        node_kind: SpawnerKind::Generic,
        member: None,
        variable: None,
        cast: None,
        ports: vec![],
        expected_port_count: 0,
        is_synthetic: false,
        relevance: NEUTRAL_RELEVANCE,
    };

    match &template.kind {
        TemplateKind::CallableMember(spec) => {
            // Owning type from the declaration, then the registry scope;
            // with neither, stay generic rather than guessing an owner
            match template.effective_owning_type() {
                Some(owner) => {
                    descriptor.spawner_key = format!("{}::{}", owner, spec.member_name);
                    descriptor.node_kind = SpawnerKind::FunctionCall;
                    descriptor.member = Some(MemberInfo {
                        member_name: spec.member_name.clone(),
                        owning_type: Some(owner.to_string()),
                        module: spec.module.clone(),
                        is_static: spec.is_static,
                        is_const: spec.is_const,
                        is_pure: spec.is_pure,
                    });
                }
                None => {
                    descriptor.node_kind = SpawnerKind::Generic;
                }
            }
        }
        TemplateKind::VariableAccessor { access, variable } => {
            let is_external = match &variable.owning_type {
                Some(owner) => !document.owns_generated_type(owner),
                None => false,
            };
            let verb = match access {
                VariableAccess::Get => "GET",
                VariableAccess::Set => "SET",
            };
            descriptor.spawner_key = if is_external {
                let owner = variable.owning_type.as_deref().unwrap_or_default();
                format!("{}::{} {}", owner, verb, variable.name)
            } else {
                format!("{} {}", verb, variable.name)
            };
            descriptor.node_kind = match access {
                VariableAccess::Get => SpawnerKind::VariableGet,
                VariableAccess::Set => SpawnerKind::VariableSet,
            };
            descriptor.variable = Some(VariableInfo {
                variable_name: variable.name.clone(),
                declared_type: variable.declared_type.name.clone(),
                owning_type: variable.owning_type.clone(),
                is_external_member: is_external,
            });
        }
        TemplateKind::Cast { target_type } => {
            descriptor.node_kind = SpawnerKind::Cast;
            descriptor.cast = Some(CastInfo {
                target_type: target_type.clone(),
            });
        }
        TemplateKind::Opaque => {
            descriptor.node_kind = SpawnerKind::Generic;
        }
    }

    // Port shape comes from a scratch allocation of the node this entry
    // would produce; the graph is never touched
    let mut scratch = Node::new(0, template.node_kind(), Vec2::ZERO);
    scratch.rebuild_ports();
    descriptor.ports = PortDescriptor::from_node(&scratch);
    descriptor.expected_port_count = descriptor.ports.len();

    descriptor
}

/// Descriptor for the pass-through kind, which has no catalog entry
pub fn reroute_descriptor() -> NodeSpawnerDescriptor {
    let mut scratch = Node::new(0, NodeKind::Reroute, Vec2::ZERO);
    scratch.rebuild_ports();
    let ports = PortDescriptor::from_node(&scratch);
    NodeSpawnerDescriptor {
        spawner_key: "Reroute".to_string(),
        display_name: "Reroute".to_string(),
        category: "Utilities".to_string(),
        tooltip: "Cosmetic pass-through node for tidying wire routing".to_string(),
        keywords: vec!["reroute".to_string(), "knot".to_string(), "wire".to_string()],
        node_kind: SpawnerKind::Reroute,
        member: None,
        variable: None,
        cast: None,
        expected_port_count: ports.len(),
        ports,
        is_synthetic: true,
        relevance: NEUTRAL_RELEVANCE,
    }
}
