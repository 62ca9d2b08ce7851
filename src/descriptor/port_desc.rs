//! Flat, serializable port descriptions
//!
//! Derived by read-only inspection of a callable signature or a live node;
//! never mutated independently of the thing they describe.

use crate::graph::{Node, Port, PortDirection};
use serde::{Deserialize, Serialize};

/// Serializable description of one port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortDescriptor {
    pub name: String,
    pub type_name: String,
    pub type_owner: Option<String>,
    pub direction: PortDirection,
    pub is_array: bool,
    pub is_reference: bool,
    pub hidden: bool,
    pub advanced: bool,
    pub default_value: String,
    pub tooltip: String,
}

impl PortDescriptor {
    /// Describes one live port
    pub fn from_port(port: &Port) -> Self {
        Self {
            name: port.name.clone(),
            type_name: port.pin_type.name.clone(),
            type_owner: port.pin_type.type_owner.clone(),
            direction: port.direction,
            is_array: port.pin_type.is_array,
            is_reference: port.pin_type.is_reference,
            hidden: port.hidden,
            advanced: port.advanced,
            default_value: port.default_value.clone(),
            tooltip: port.tooltip.clone(),
        }
    }

    /// Describes every port of a live node, inputs first
    pub fn from_node(node: &Node) -> Vec<Self> {
        node.inputs
            .iter()
            .chain(node.outputs.iter())
            .map(Self::from_port)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, NodeKind, PinType};
    use glam::Vec2;

    #[test]
    fn test_describe_live_node() {
        let mut node = Node::new(0, NodeKind::Reroute, Vec2::ZERO);
        node.rebuild_ports();

        let ports = PortDescriptor::from_node(&node);
        assert_eq!(ports.len(), 2);
        assert_eq!(ports[0].name, "In");
        assert_eq!(ports[0].direction, PortDirection::Input);
        assert_eq!(ports[1].name, "Out");
        assert_eq!(ports[1].direction, PortDirection::Output);
    }

    #[test]
    fn test_descriptor_captures_type_and_default() {
        let mut node = Node::new(0, NodeKind::Generic, Vec2::ZERO);
        node.add_input("Duration", PinType::new("float"));
        node.inputs[0].default_value = "2.0".to_string();

        let desc = PortDescriptor::from_port(&node.inputs[0]);
        assert_eq!(desc.type_name, "float");
        assert_eq!(desc.default_value, "2.0");
        assert!(!desc.is_array);
    }
}
