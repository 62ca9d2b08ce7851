//! Pass-through path building
//!
//! Inserts cosmetic reroute nodes between two ports, singly with automatic
//! midpoint placement, or as a multi-waypoint path wired in sequence.

use crate::error::EngineError;
use crate::graph::{Node, NodeId, NodeKind, PortId, ScriptGraph};
use glam::Vec2;
use log::warn;

/// Node positions snap to this grid
pub const GRID_SIZE: f32 = 16.0;

/// Rounds both components to the nearest grid line
pub fn snap_to_grid(position: Vec2) -> Vec2 {
    (position / GRID_SIZE).round() * GRID_SIZE
}

fn spawn_reroute(graph: &mut ScriptGraph, position: Vec2) -> NodeId {
    let mut node = Node::new(0, NodeKind::Reroute, position);
    node.rebuild_ports();
    graph.add_node(node)
}

fn validate_endpoints(
    graph: &ScriptGraph,
    source: (NodeId, PortId),
    target: (NodeId, PortId),
) -> Result<(), EngineError> {
    let from_node = graph
        .node(source.0)
        .ok_or_else(|| EngineError::node_not_found(source.0.to_string()))?;
    let to_node = graph
        .node(target.0)
        .ok_or_else(|| EngineError::node_not_found(target.0.to_string()))?;

    if from_node.outputs.get(source.1).is_none() {
        return Err(EngineError::port_not_found(format!(
            "{}:{} (expected an output)",
            source.0, source.1
        )));
    }
    if to_node.inputs.get(target.1).is_none() {
        return Err(EngineError::port_not_found(format!(
            "{}:{} (expected an input)",
            target.0, target.1
        )));
    }
    Ok(())
}

/// Inserts one reroute between an output and an input
///
/// With no explicit position, the knot lands at the midpoint of the two
/// owning nodes, snapped to the grid.
pub fn insert_reroute(
    graph: &mut ScriptGraph,
    source: (NodeId, PortId),
    target: (NodeId, PortId),
    position: Option<Vec2>,
) -> Result<NodeId, EngineError> {
    validate_endpoints(graph, source, target)?;

    let position = match position {
        Some(given) => given,
        None => {
            let from_pos = graph.node(source.0).expect("validated").position;
            let to_pos = graph.node(target.0).expect("validated").position;
            snap_to_grid((from_pos + to_pos) * 0.5)
        }
    };

    let knot = spawn_reroute(graph, position);
    graph.connect_by_ids(source.0, source.1, knot, 0)?;
    graph.connect_by_ids(knot, 0, target.0, target.1)?;
    Ok(knot)
}

/// Creates one reroute per waypoint and wires them in sequence,
/// source → knot₁ → knot₂ → … → target
///
/// A waypoint that fails to wire is logged and skipped; the path continues
/// through the knots that did come up.
pub fn create_reroute_path(
    graph: &mut ScriptGraph,
    source: (NodeId, PortId),
    target: (NodeId, PortId),
    waypoints: &[Vec2],
) -> Result<Vec<NodeId>, EngineError> {
    validate_endpoints(graph, source, target)?;

    let mut knots: Vec<NodeId> = Vec::with_capacity(waypoints.len());
    let mut cursor: (NodeId, PortId) = source;

    for (index, waypoint) in waypoints.iter().enumerate() {
        let knot = spawn_reroute(graph, *waypoint);
        match graph.connect_by_ids(cursor.0, cursor.1, knot, 0) {
            Ok(()) => {
                knots.push(knot);
                cursor = (knot, 0);
            }
            Err(err) => {
                warn!(
                    "reroute path: waypoint {} at {:?} skipped: {}",
                    index, waypoint, err
                );
                graph.remove_node(knot);
            }
        }
    }

    graph.connect_by_ids(cursor.0, cursor.1, target.0, target.1)?;
    Ok(knots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PinType;

    fn data_node(graph: &mut ScriptGraph, position: Vec2) -> NodeId {
        let mut node = Node::new(0, NodeKind::Generic, position);
        node.add_input("In", PinType::new("float"));
        node.add_output("Out", PinType::new("float"));
        graph.add_node(node)
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Vec2::new(200.0, 0.0)).x, 208.0);
        assert_eq!(snap_to_grid(Vec2::new(199.0, 7.0)), Vec2::new(192.0, 0.0));
        assert_eq!(snap_to_grid(Vec2::new(16.0, -16.0)), Vec2::new(16.0, -16.0));
    }

    #[test]
    fn test_single_insert_midpoint_placement() {
        let mut graph = ScriptGraph::new();
        let a = data_node(&mut graph, Vec2::new(0.0, 0.0));
        let b = data_node(&mut graph, Vec2::new(400.0, 0.0));

        let knot = insert_reroute(&mut graph, (a, 0), (b, 0), None).unwrap();
        let pos = graph.node(knot).unwrap().position;
        // Midpoint 200 rounds to a 16-unit grid line
        assert!(pos.x == 192.0 || pos.x == 208.0);
        assert_eq!(pos.y, 0.0);

        // Wired source→knot and knot→target
        assert!(graph.is_input_connected(knot, 0));
        assert!(graph.is_input_connected(b, 0));
        assert_eq!(graph.connections.len(), 2);
    }

    #[test]
    fn test_explicit_position_is_not_snapped() {
        let mut graph = ScriptGraph::new();
        let a = data_node(&mut graph, Vec2::ZERO);
        let b = data_node(&mut graph, Vec2::new(100.0, 100.0));

        let knot = insert_reroute(&mut graph, (a, 0), (b, 0), Some(Vec2::new(33.0, 7.0))).unwrap();
        assert_eq!(graph.node(knot).unwrap().position, Vec2::new(33.0, 7.0));
    }

    #[test]
    fn test_endpoints_must_be_output_then_input() {
        let mut graph = ScriptGraph::new();
        let a = data_node(&mut graph, Vec2::ZERO);
        let b = data_node(&mut graph, Vec2::ZERO);

        // Port 5 does not exist on either side
        assert!(insert_reroute(&mut graph, (a, 5), (b, 0), None).is_err());
        assert!(insert_reroute(&mut graph, (a, 0), (b, 5), None).is_err());
    }

    #[test]
    fn test_waypoint_path_wires_in_sequence() {
        let mut graph = ScriptGraph::new();
        let a = data_node(&mut graph, Vec2::ZERO);
        let b = data_node(&mut graph, Vec2::new(600.0, 0.0));

        let waypoints = [
            Vec2::new(160.0, 64.0),
            Vec2::new(320.0, 64.0),
            Vec2::new(480.0, 64.0),
        ];
        let knots = create_reroute_path(&mut graph, (a, 0), (b, 0), &waypoints).unwrap();
        assert_eq!(knots.len(), 3);

        // source→k1, k1→k2, k2→k3, k3→target
        assert_eq!(graph.connections.len(), 4);
        assert!(graph.is_input_connected(knots[0], 0));
        assert!(graph.is_input_connected(knots[1], 0));
        assert!(graph.is_input_connected(knots[2], 0));
        assert!(graph.is_input_connected(b, 0));

        let knot_node = graph.node(knots[1]).unwrap();
        assert!(matches!(knot_node.kind, NodeKind::Reroute));
        assert_eq!(knot_node.position, Vec2::new(320.0, 64.0));
    }

    #[test]
    fn test_empty_waypoint_list_wires_directly() {
        let mut graph = ScriptGraph::new();
        let a = data_node(&mut graph, Vec2::ZERO);
        let b = data_node(&mut graph, Vec2::new(100.0, 0.0));

        let knots = create_reroute_path(&mut graph, (a, 0), (b, 0), &[]).unwrap();
        assert!(knots.is_empty());
        assert_eq!(graph.connections.len(), 1);
    }
}
