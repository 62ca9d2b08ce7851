//! Port default application
//!
//! Assigns literal default values onto unconnected input ports. Each
//! port's outcome is independent and reported individually; the batch as a
//! whole succeeds only when nothing failed. Values arrive as JSON and are
//! coerced to the port's literal text form.

use crate::error::EngineError;
use crate::graph::{NodeId, ScriptGraph};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One port that could not take its default, with the reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedPort {
    pub port: String,
    pub reason: String,
}

/// Per-port outcome of one apply_defaults call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsReport {
    pub applied: Vec<String>,
    pub failed: Vec<FailedPort>,
}

impl DefaultsReport {
    /// True when every requested port took its value
    pub fn all_applied(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Struct shapes with a known literal form. Field lookup is
/// case-insensitive; alpha defaults to 1 when omitted.
fn coerce_struct(object: &Map<String, Value>) -> Result<String, String> {
    let field = |name: &str| -> Option<f64> {
        object
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_f64())
    };

    if let (Some(x), Some(y), Some(z)) = (field("x"), field("y"), field("z")) {
        return Ok(format!("(X={},Y={},Z={})", x, y, z));
    }
    if let (Some(pitch), Some(yaw), Some(roll)) = (field("pitch"), field("yaw"), field("roll")) {
        return Ok(format!("(Pitch={},Yaw={},Roll={})", pitch, yaw, roll));
    }
    if let (Some(r), Some(g), Some(b)) = (field("r"), field("g"), field("b")) {
        let a = field("a").unwrap_or(1.0);
        return Ok(format!("(R={},G={},B={},A={})", r, g, b, a));
    }
    if let (Some(x), Some(y)) = (field("x"), field("y")) {
        return Ok(format!("(X={},Y={})", x, y));
    }

    let keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
    Err(format!(
        "unrecognized struct shape with fields [{}]; known shapes are vector (x,y,z), \
         rotator (pitch,yaw,roll), 2D vector (x,y), linear color (r,g,b,a)",
        keys.join(", ")
    ))
}

/// Coerces one JSON value to a port's literal default text
fn coerce_value(value: &Value) -> Result<String, String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        // Rust float formatting is locale-independent
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(if *flag { "true" } else { "false" }.to_string()),
        Value::Object(object) => coerce_struct(object),
        Value::Array(_) => Err("array defaults are not supported".to_string()),
        Value::Null => Err("null is not a default value".to_string()),
    }
}

/// Applies `{port name: value}` defaults to the node's input ports
///
/// Errors only when the node itself is missing; everything below that is
/// a per-port outcome.
pub fn apply_defaults(
    graph: &mut ScriptGraph,
    node_id: NodeId,
    values: &Map<String, Value>,
) -> Result<DefaultsReport, EngineError> {
    if graph.node(node_id).is_none() {
        return Err(EngineError::node_not_found(node_id.to_string()));
    }

    let mut report = DefaultsReport::default();
    for (port_name, value) in values {
        // Output ports with the same name must not shadow the check, so
        // look the port up among inputs only
        let port_id = {
            let node = graph.node(node_id).expect("checked above");
            match node.find_input(port_name) {
                Some(port) => port.id,
                None => {
                    if node.find_output(port_name).is_some() {
                        report.failed.push(FailedPort {
                            port: port_name.clone(),
                            reason: "port is an output; defaults apply to inputs only".to_string(),
                        });
                    } else {
                        report.failed.push(FailedPort {
                            port: port_name.clone(),
                            reason: "no input port with this name".to_string(),
                        });
                    }
                    continue;
                }
            }
        };

        if graph.is_input_connected(node_id, port_id) {
            report.failed.push(FailedPort {
                port: port_name.clone(),
                reason: "port is connected; break the connection before setting a default"
                    .to_string(),
            });
            continue;
        }

        match coerce_value(value) {
            Ok(literal) => {
                let node = graph.node_mut(node_id).expect("checked above");
                node.inputs[port_id].default_value = literal;
                report.applied.push(port_name.clone());
            }
            Err(reason) => {
                report.failed.push(FailedPort {
                    port: port_name.clone(),
                    reason,
                });
            }
        }
    }

    debug!(
        "apply_defaults: node {} applied={} failed={}",
        node_id,
        report.applied.len(),
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, NodeKind, PinType};
    use glam::Vec2;
    use serde_json::json;

    fn graph_with_input_node() -> (ScriptGraph, NodeId) {
        let mut graph = ScriptGraph::new();
        let mut node = Node::new(0, NodeKind::Generic, Vec2::ZERO);
        node.add_input("Duration", PinType::new("float"));
        node.add_input("Message", PinType::new("string"));
        node.add_input("Location", PinType::new("vector"));
        node.add_output("Result", PinType::new("float"));
        let id = graph.add_node(node);
        (graph, id)
    }

    #[test]
    fn test_scalar_coercion() {
        let (mut graph, id) = graph_with_input_node();
        let values = json!({
            "Duration": 2.5,
            "Message": "hello",
        });
        let report = apply_defaults(&mut graph, id, values.as_object().unwrap()).unwrap();
        assert!(report.all_applied());

        let node = graph.node(id).unwrap();
        assert_eq!(node.find_input("Duration").unwrap().default_value, "2.5");
        assert_eq!(node.find_input("Message").unwrap().default_value, "hello");
    }

    #[test]
    fn test_numeric_round_trip() {
        let (mut graph, id) = graph_with_input_node();
        let values = json!({ "Duration": 0.30000001192092896f64 });
        apply_defaults(&mut graph, id, values.as_object().unwrap()).unwrap();

        let text = graph
            .node(id)
            .unwrap()
            .find_input("Duration")
            .unwrap()
            .default_value
            .clone();
        let parsed: f64 = text.parse().unwrap();
        assert!((parsed - 0.30000001192092896).abs() < 1e-9);
    }

    #[test]
    fn test_struct_shapes() {
        let (mut graph, id) = graph_with_input_node();
        let values = json!({ "Location": { "x": 1.0, "y": 2.0, "z": 3.0 } });
        let report = apply_defaults(&mut graph, id, values.as_object().unwrap()).unwrap();
        assert!(report.all_applied());
        assert_eq!(
            graph.node(id).unwrap().find_input("Location").unwrap().default_value,
            "(X=1,Y=2,Z=3)"
        );
    }

    #[test]
    fn test_color_alpha_defaults_to_one() {
        assert_eq!(
            coerce_value(&json!({ "r": 0.5, "g": 0.25, "b": 1.0 })).unwrap(),
            "(R=0.5,G=0.25,B=1,A=1)"
        );
    }

    #[test]
    fn test_unrecognized_struct_shape_fails_explicitly() {
        let (mut graph, id) = graph_with_input_node();
        let values = json!({ "Location": { "foo": 1.0 } });
        let report = apply_defaults(&mut graph, id, values.as_object().unwrap()).unwrap();
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].reason.contains("unrecognized struct shape"));
    }

    #[test]
    fn test_connected_port_is_rejected_and_unchanged() {
        let (mut graph, id) = graph_with_input_node();

        // Wire something into Duration first
        let mut source = Node::new(0, NodeKind::Generic, Vec2::ZERO);
        source.add_output("Out", PinType::new("float"));
        let source_id = graph.add_node(source);
        graph.connect_by_ids(source_id, 0, id, 0).unwrap();

        let before = graph.connections.len();
        let values = json!({ "Duration": 9.0 });
        let report = apply_defaults(&mut graph, id, values.as_object().unwrap()).unwrap();

        assert!(!report.all_applied());
        assert_eq!(report.failed[0].port, "Duration");
        assert!(report.failed[0].reason.contains("connected"));
        // Connection and default are untouched
        assert_eq!(graph.connections.len(), before);
        assert_eq!(graph.node(id).unwrap().find_input("Duration").unwrap().default_value, "");
    }

    #[test]
    fn test_output_port_is_rejected() {
        let (mut graph, id) = graph_with_input_node();
        let values = json!({ "Result": 1.0 });
        let report = apply_defaults(&mut graph, id, values.as_object().unwrap()).unwrap();
        assert!(report.failed[0].reason.contains("output"));
    }

    #[test]
    fn test_outcomes_are_independent() {
        let (mut graph, id) = graph_with_input_node();
        let values = json!({
            "Duration": 1.0,
            "NoSuchPort": 2.0,
        });
        let report = apply_defaults(&mut graph, id, values.as_object().unwrap()).unwrap();
        assert_eq!(report.applied, vec!["Duration"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].port, "NoSuchPort");
    }

    #[test]
    fn test_missing_node_is_an_error() {
        let mut graph = ScriptGraph::new();
        let values = json!({ "Duration": 1.0 });
        assert!(apply_defaults(&mut graph, 99, values.as_object().unwrap()).is_err());
    }
}
