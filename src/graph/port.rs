//! Port types and functionality for node connections

use serde::{Deserialize, Serialize};

/// Unique identifier for a port within one side (inputs or outputs) of a node
pub type PortId = usize;

/// Direction of a port (input or output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

/// Logical type carried by a pin
///
/// `name` is the type's short name ("float", "bool", "exec", a struct or
/// class name); `type_owner` is the path of the owning class/struct for
/// object and struct pins. The wildcard type connects to anything and is
/// what reroute pins start with until wired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinType {
    pub name: String,
    pub type_owner: Option<String>,
    pub is_array: bool,
    pub is_reference: bool,
}

impl PinType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_owner: None,
            is_array: false,
            is_reference: false,
        }
    }

    /// Execution pin type
    pub fn exec() -> Self {
        Self::new("exec")
    }

    /// Untyped wildcard, used by reroute pins until they are wired
    pub fn wildcard() -> Self {
        Self::new("wildcard")
    }

    /// Object pin referencing a named class
    pub fn object(class_name: impl Into<String>) -> Self {
        let class_name = class_name.into();
        Self {
            type_owner: Some(class_name.clone()),
            name: class_name,
            is_array: false,
            is_reference: false,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.type_owner = Some(owner.into());
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn is_exec(&self) -> bool {
        self.name == "exec"
    }

    pub fn is_wildcard(&self) -> bool {
        self.name == "wildcard"
    }
}

/// Represents a connection point on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub direction: PortDirection,
    pub pin_type: PinType,
    /// Literal default used when the port is unconnected; empty means unset
    pub default_value: String,
    pub tooltip: String,
    pub hidden: bool,
    pub advanced: bool,
}

impl Port {
    /// Creates a new port
    pub fn new(id: PortId, name: impl Into<String>, direction: PortDirection, pin_type: PinType) -> Self {
        Self {
            id,
            name: name.into(),
            direction,
            pin_type,
            default_value: String::new(),
            tooltip: String::new(),
            hidden: false,
            advanced: false,
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Checks if this port is an input
    pub fn is_input(&self) -> bool {
        matches!(self.direction, PortDirection::Input)
    }

    /// Checks if this port is an output
    pub fn is_output(&self) -> bool {
        matches!(self.direction, PortDirection::Output)
    }
}
