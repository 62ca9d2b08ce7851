//! Node types and core node functionality
//!
//! A node's behavior is carried by [`NodeKind`], a tagged union with one
//! payload per kind. Configuration code switches on it exactly once, so a
//! new kind is a compile-time exhaustiveness concern rather than an
//! open-ended chain of type tests.

use super::port::{PinType, Port, PortDirection, PortId};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node within its graph
pub type NodeId = usize;

/// One parameter of a callable member's signature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub pin_type: PinType,
    pub direction: PortDirection,
    pub default_value: String,
}

impl ParamSpec {
    pub fn input(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            pin_type,
            direction: PortDirection::Input,
            default_value: String::new(),
        }
    }

    pub fn output(name: impl Into<String>, pin_type: PinType) -> Self {
        Self {
            name: name.into(),
            pin_type,
            direction: PortDirection::Output,
            default_value: String::new(),
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }
}

/// Whether a bound call runs against the owning document's own instance or
/// an explicitly wired external instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallTarget {
    SelfContext,
    External,
}

/// Binding of a function-call node to a callable member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberBinding {
    pub member_name: String,
    pub owning_type: Option<String>,
    pub module: Option<String>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_pure: bool,
    pub call_target: CallTarget,
    /// Class whose instance this call spawns; set before port allocation
    /// because the result pin's type depends on it
    pub class_to_spawn: Option<String>,
    pub params: Vec<ParamSpec>,
}

/// Binding of a variable accessor node to a variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableBinding {
    pub variable_name: String,
    pub declared_type: PinType,
    pub owning_type: Option<String>,
    pub is_external: bool,
}

/// Configuration of a dynamic-cast node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastConfig {
    pub target_type: Option<String>,
}

/// Kind of node plus its kind-specific configuration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    FunctionCall(MemberBinding),
    VariableGet(VariableBinding),
    VariableSet(VariableBinding),
    Cast(CastConfig),
    Reroute,
    Generic,
}

impl NodeKind {
    /// Stable lowercase name used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::FunctionCall(_) => "function_call",
            NodeKind::VariableGet(_) => "variable_get",
            NodeKind::VariableSet(_) => "variable_set",
            NodeKind::Cast(_) => "cast",
            NodeKind::Reroute => "reroute",
            NodeKind::Generic => "generic",
        }
    }

    /// Display title a node of this kind starts with
    pub fn default_title(&self) -> String {
        match self {
            NodeKind::FunctionCall(binding) => binding.member_name.clone(),
            NodeKind::VariableGet(binding) => format!("Get {}", binding.variable_name),
            NodeKind::VariableSet(binding) => format!("Set {}", binding.variable_name),
            NodeKind::Cast(config) => match &config.target_type {
                Some(target) => format!("Cast To {}", target),
                None => "Cast".to_string(),
            },
            NodeKind::Reroute => "Reroute".to_string(),
            NodeKind::Generic => "Node".to_string(),
        }
    }
}

/// Core node structure representing one placed unit in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub position: Vec2,
    pub kind: NodeKind,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
}

impl Node {
    /// Creates a new node of the given kind; ports are allocated separately
    /// via [`Node::rebuild_ports`] once configuration has settled
    pub fn new(id: NodeId, kind: NodeKind, position: Vec2) -> Self {
        Self {
            id,
            title: kind.default_title(),
            position,
            kind,
            inputs: vec![],
            outputs: vec![],
        }
    }

    /// Adds an input port to the node
    pub fn add_input(&mut self, name: impl Into<String>, pin_type: PinType) -> &mut Self {
        let port_id = self.inputs.len();
        self.inputs
            .push(Port::new(port_id, name, PortDirection::Input, pin_type));
        self
    }

    /// Adds an output port to the node
    pub fn add_output(&mut self, name: impl Into<String>, pin_type: PinType) -> &mut Self {
        let port_id = self.outputs.len();
        self.outputs
            .push(Port::new(port_id, name, PortDirection::Output, pin_type));
        self
    }

    /// Find an input port by name (case-insensitive)
    pub fn find_input(&self, name: &str) -> Option<&Port> {
        self.inputs
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Find an output port by name (case-insensitive)
    pub fn find_output(&self, name: &str) -> Option<&Port> {
        self.outputs
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn find_input_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.inputs
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// First non-exec output port id, if any
    pub fn first_data_output(&self) -> Option<PortId> {
        self.outputs
            .iter()
            .find(|p| !p.pin_type.is_exec())
            .map(|p| p.id)
    }

    /// First non-exec input port id, if any
    pub fn first_data_input(&self) -> Option<PortId> {
        self.inputs
            .iter()
            .find(|p| !p.pin_type.is_exec())
            .map(|p| p.id)
    }

    /// Rebuilds the port list from the current kind payload
    ///
    /// This is the final step of every configuration branch, so port shape
    /// always reflects the just-applied configuration. Generic nodes keep
    /// whatever ports their template gave them.
    pub fn rebuild_ports(&mut self) {
        if matches!(self.kind, NodeKind::Generic) {
            return;
        }
        self.inputs.clear();
        self.outputs.clear();

        // Borrow the payload immutably while pushing through locals
        let kind = self.kind.clone();
        match kind {
            NodeKind::FunctionCall(binding) => {
                if !binding.is_pure {
                    self.add_input("Exec", PinType::exec());
                    self.add_output("Then", PinType::exec());
                }
                if !binding.is_static && binding.call_target == CallTarget::External {
                    let target_type = binding
                        .owning_type
                        .clone()
                        .unwrap_or_else(|| "Object".to_string());
                    self.add_input("Target", PinType::object(target_type));
                }
                for param in &binding.params {
                    match param.direction {
                        PortDirection::Input => {
                            self.add_input(&param.name, param.pin_type.clone());
                            if !param.default_value.is_empty() {
                                if let Some(port) = self.inputs.last_mut() {
                                    port.default_value = param.default_value.clone();
                                }
                            }
                        }
                        PortDirection::Output => {
                            // The spawn result adopts the configured class
                            let pin_type = match (&binding.class_to_spawn, param.name.as_str()) {
                                (Some(class), "ReturnValue") => PinType::object(class.clone()),
                                _ => param.pin_type.clone(),
                            };
                            self.add_output(&param.name, pin_type);
                        }
                    }
                }
            }
            NodeKind::VariableGet(binding) => {
                self.add_output(&binding.variable_name, binding.declared_type.clone());
            }
            NodeKind::VariableSet(binding) => {
                self.add_input("Exec", PinType::exec());
                self.add_output("Then", PinType::exec());
                self.add_input(&binding.variable_name, binding.declared_type.clone());
                self.add_output(&binding.variable_name, binding.declared_type.clone());
            }
            NodeKind::Cast(config) => {
                self.add_input("Exec", PinType::exec());
                self.add_input("Object", PinType::object("Object"));
                self.add_output("Then", PinType::exec());
                self.add_output("Cast Failed", PinType::exec());
                if let Some(target) = &config.target_type {
                    self.add_output(format!("As {}", target), PinType::object(target.clone()));
                }
            }
            NodeKind::Reroute => {
                // No type constraint until wired
                self.add_input("In", PinType::wildcard());
                self.add_output("Out", PinType::wildcard());
            }
            NodeKind::Generic => unreachable!(),
        }
        self.title = self.kind.default_title();
    }
}
