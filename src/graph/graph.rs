//! Script graph data structures and operations

use super::node::{Node, NodeId};
use super::port::PortId;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a connection between two ports on different nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from_node: NodeId,
    pub from_port: PortId,
    pub to_node: NodeId,
    pub to_port: PortId,
}

impl Connection {
    /// Creates a new connection
    pub fn new(from_node: NodeId, from_port: PortId, to_node: NodeId, to_port: PortId) -> Self {
        Self {
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }
}

/// A graph containing nodes and their connections
///
/// The graph is the owner and authority for structural validity: code that
/// creates or configures nodes goes through it for every wiring change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub connections: Vec<Connection>,
    next_node_id: NodeId,
}

impl ScriptGraph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the graph and returns its ID
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = self.next_node_id;
        node.id = id;
        self.nodes.insert(id, node);
        self.next_node_id += 1;
        id
    }

    /// Removes a node and all its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections
            .retain(|conn| conn.from_node != node_id && conn.to_node != node_id);
        self.nodes.remove(&node_id)
    }

    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Adds a connection between an output port and an input port
    pub fn connect(&mut self, connection: Connection) -> Result<(), EngineError> {
        if connection.from_node == connection.to_node {
            return Err(EngineError::invalid_state(
                "cannot connect a node to itself",
            ));
        }
        let from = self
            .nodes
            .get(&connection.from_node)
            .ok_or_else(|| EngineError::node_not_found(connection.from_node.to_string()))?;
        let to = self
            .nodes
            .get(&connection.to_node)
            .ok_or_else(|| EngineError::node_not_found(connection.to_node.to_string()))?;

        if from.outputs.get(connection.from_port).is_none() {
            return Err(EngineError::port_not_found(format!(
                "{}:{}",
                connection.from_node, connection.from_port
            )));
        }
        if to.inputs.get(connection.to_port).is_none() {
            return Err(EngineError::port_not_found(format!(
                "{}:{}",
                connection.to_node, connection.to_port
            )));
        }

        self.connections.push(connection);
        Ok(())
    }

    /// Helper to connect by node IDs and port indices
    pub fn connect_by_ids(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<(), EngineError> {
        self.connect(Connection::new(from_node, from_port, to_node, to_port))
    }

    /// Removes connections that end at the given input port, returning how
    /// many were removed
    pub fn disconnect_input(&mut self, node_id: NodeId, port_id: PortId) -> usize {
        let before = self.connections.len();
        self.connections
            .retain(|conn| !(conn.to_node == node_id && conn.to_port == port_id));
        before - self.connections.len()
    }

    /// True when the given input port has at least one incoming connection
    pub fn is_input_connected(&self, node_id: NodeId, port_id: PortId) -> bool {
        self.connections
            .iter()
            .any(|conn| conn.to_node == node_id && conn.to_port == port_id)
    }

    /// Connections arriving at any input of the given node
    pub fn incoming(&self, node_id: NodeId) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|conn| conn.to_node == node_id)
            .collect()
    }
}
