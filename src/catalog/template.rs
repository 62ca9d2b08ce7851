//! Node templates: the catalog's factory entries
//!
//! A template is the opaque object capable of producing one node instance
//! of one node class. The catalog owns them; everything else references
//! them weakly and revalidates before use.

use crate::graph::{
    CallTarget, CastConfig, MemberBinding, Node, NodeId, NodeKind, ParamSpec, PinType, ScriptGraph,
    VariableBinding,
};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Signature and flags of a callable member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberSpec {
    pub member_name: String,
    pub owning_type: Option<String>,
    pub module: Option<String>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_pure: bool,
    pub params: Vec<ParamSpec>,
}

impl MemberSpec {
    pub fn new(member_name: impl Into<String>) -> Self {
        Self {
            member_name: member_name.into(),
            owning_type: None,
            module: None,
            is_static: false,
            is_const: false,
            is_pure: false,
            params: vec![],
        }
    }

    pub fn owned_by(mut self, owning_type: impl Into<String>) -> Self {
        self.owning_type = Some(owning_type.into());
        self
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn const_member(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn pure_member(mut self) -> Self {
        self.is_pure = true;
        self
    }

    pub fn with_params(mut self, params: Vec<ParamSpec>) -> Self {
        self.params = params;
        self
    }
}

/// Whether a variable accessor template reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableAccess {
    Get,
    Set,
}

/// A variable as the catalog sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,
    pub declared_type: PinType,
    /// Generated type of the declaring document
    pub owning_type: Option<String>,
}

/// What a template produces, with the metadata needed to produce it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TemplateKind {
    CallableMember(MemberSpec),
    VariableAccessor {
        access: VariableAccess,
        variable: VariableSpec,
    },
    Cast {
        target_type: String,
    },
    /// Entry the reflection system contributed without enough metadata to
    /// classify; still creatable, just generic
    Opaque,
}

/// One catalog entry: display metadata plus the recipe for one node class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub display_name: String,
    pub category: String,
    pub tooltip: String,
    pub keywords: Vec<String>,
    /// Registry scope the entry was contributed under; used as the owning
    /// type fallback when the member declaration does not carry one
    pub registry_scope: Option<String>,
    pub kind: TemplateKind,
}

impl NodeTemplate {
    pub fn new(display_name: impl Into<String>, category: impl Into<String>, kind: TemplateKind) -> Self {
        Self {
            display_name: display_name.into(),
            category: category.into(),
            tooltip: String::new(),
            keywords: vec![],
            registry_scope: None,
            kind,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<&str>) -> Self {
        self.keywords = keywords.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.registry_scope = Some(scope.into());
        self
    }

    /// The member spec, when this entry binds a callable member
    pub fn member(&self) -> Option<&MemberSpec> {
        match &self.kind {
            TemplateKind::CallableMember(spec) => Some(spec),
            _ => None,
        }
    }

    /// Owning type as the extractor resolves it: declaration first, then
    /// the registry scope the entry was contributed under
    pub fn effective_owning_type(&self) -> Option<&str> {
        match &self.kind {
            TemplateKind::CallableMember(spec) => spec
                .owning_type
                .as_deref()
                .or(self.registry_scope.as_deref()),
            TemplateKind::VariableAccessor { variable, .. } => variable.owning_type.as_deref(),
            _ => self.registry_scope.as_deref(),
        }
    }

    /// Builds the node kind payload this template configures
    pub fn node_kind(&self) -> NodeKind {
        match &self.kind {
            TemplateKind::CallableMember(spec) => NodeKind::FunctionCall(MemberBinding {
                member_name: spec.member_name.clone(),
                owning_type: spec
                    .owning_type
                    .clone()
                    .or_else(|| self.registry_scope.clone()),
                module: spec.module.clone(),
                is_static: spec.is_static,
                is_const: spec.is_const,
                is_pure: spec.is_pure,
                call_target: CallTarget::External,
                class_to_spawn: None,
                params: spec.params.clone(),
            }),
            TemplateKind::VariableAccessor { access, variable } => {
                let binding = VariableBinding {
                    variable_name: variable.name.clone(),
                    declared_type: variable.declared_type.clone(),
                    owning_type: variable.owning_type.clone(),
                    is_external: false,
                };
                match access {
                    VariableAccess::Get => NodeKind::VariableGet(binding),
                    VariableAccess::Set => NodeKind::VariableSet(binding),
                }
            }
            TemplateKind::Cast { target_type } => NodeKind::Cast(CastConfig {
                target_type: Some(target_type.clone()),
            }),
            TemplateKind::Opaque => NodeKind::Generic,
        }
    }

    /// Invokes this entry against a graph, producing a new node at the
    /// given position
    pub fn invoke(&self, graph: &mut ScriptGraph, position: Vec2) -> NodeId {
        let mut node = Node::new(0, self.node_kind(), position);
        node.rebuild_ports();
        if matches!(self.kind, TemplateKind::Opaque) {
            node.title = self.display_name.clone();
        }
        graph.add_node(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PortDirection;

    #[test]
    fn test_owning_type_falls_back_to_scope() {
        let template = NodeTemplate::new(
            "Trace",
            "Utilities",
            TemplateKind::CallableMember(MemberSpec::new("Trace")),
        )
        .with_scope("SystemLibrary");
        assert_eq!(template.effective_owning_type(), Some("SystemLibrary"));
    }

    #[test]
    fn test_invoke_produces_configured_node() {
        let template = NodeTemplate::new(
            "Print String",
            "Development",
            TemplateKind::CallableMember(
                MemberSpec::new("PrintString")
                    .owned_by("SystemLibrary")
                    .static_member()
                    .with_params(vec![ParamSpec::input("InString", PinType::new("string"))]),
            ),
        );

        let mut graph = ScriptGraph::new();
        let id = template.invoke(&mut graph, Vec2::new(10.0, 20.0));
        let node = graph.node(id).unwrap();
        assert_eq!(node.position, Vec2::new(10.0, 20.0));
        assert!(matches!(node.kind, NodeKind::FunctionCall(_)));
        assert!(node
            .inputs
            .iter()
            .any(|p| p.name == "InString" && p.direction == PortDirection::Input));
    }

    #[test]
    fn test_opaque_invoke_keeps_display_title() {
        let template = NodeTemplate::new("Timeline", "Animation", TemplateKind::Opaque);
        let mut graph = ScriptGraph::new();
        let id = template.invoke(&mut graph, Vec2::ZERO);
        assert_eq!(graph.node(id).unwrap().title, "Timeline");
    }
}
