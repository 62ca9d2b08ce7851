//! JSON command surface
//!
//! Each request carries an `action` name and a flat parameter object; the
//! response is a JSON object with a `success` boolean and, on failure, an
//! `error` string plus `suggestion`/`usage_hint` text. The client is a
//! non-interactive agent that must self-correct from the response alone,
//! so nothing is allowed to panic past this boundary and every failure
//! names the call that would unblock it.

use crate::catalog::{standard_catalog, ScriptCatalog};
use crate::configure::{
    apply_defaults, create_and_configure, create_reroute_path, insert_reroute, CreationSource,
    NodeConfig,
};
use crate::descriptor::{discover, DescriptorCache, DiscoverFilter, PortDescriptor, DEFAULT_MAX_RESULTS};
use crate::error::EngineError;
use crate::graph::{NodeId, PortId, ScriptDocument};
use crate::resolve::{resolve, ResolveRequest};
use crate::typeres::TypeRegistry;
use glam::Vec2;
use log::info;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// The engine behind the command channel: catalog, cache, types, and the
/// open documents
pub struct Engine {
    pub catalog: ScriptCatalog,
    pub cache: DescriptorCache,
    pub types: TypeRegistry,
    documents: HashMap<String, ScriptDocument>,
}

impl Engine {
    /// Engine over the seeded standard catalog and class hierarchy
    pub fn new() -> Self {
        Self {
            catalog: standard_catalog(),
            cache: DescriptorCache::new(),
            types: TypeRegistry::with_standard_classes(),
            documents: HashMap::new(),
        }
    }

    /// Opens (registers) a document and contributes its variables and
    /// generated type to the catalog and type registry
    pub fn open_document(&mut self, document: ScriptDocument) -> &ScriptDocument {
        self.catalog.register_document_variables(&document);
        self.types.register_generated(
            &document.generated_type,
            &document.parent_class,
            &format!("/Game/{}.{}", document.name, document.generated_type),
        );
        let name = document.name.clone();
        info!("opened document '{}'", name);
        self.documents.entry(name).or_insert(document)
    }

    pub fn document(&self, name: &str) -> Option<&ScriptDocument> {
        self.documents.get(name)
    }

    fn document_required(&self, params: &Value) -> Result<String, Value> {
        let name = match params.get("document").and_then(Value::as_str) {
            Some(name) => name.to_string(),
            None => {
                return Err(fail_usage(
                    "missing required parameter 'document'",
                    "pass the document name every action operates on",
                ))
            }
        };
        if self.documents.contains_key(&name) {
            Ok(name)
        } else {
            Err(fail(&EngineError::document_not_found(name)))
        }
    }

    /// Entry point for one request object `{action, params}`
    pub fn handle(&mut self, request: &Value) -> Value {
        let action = request.get("action").and_then(Value::as_str).unwrap_or("");
        let empty = json!({});
        let params = request.get("params").unwrap_or(&empty);
        self.dispatch(action, params)
    }

    /// Dispatches one action with its flat parameter object
    pub fn dispatch(&mut self, action: &str, params: &Value) -> Value {
        match action {
            "discover_nodes" => self.discover_nodes(params),
            "create_node" => self.create_node(params),
            "apply_pin_defaults" => self.apply_pin_defaults(params),
            "connect_pins" => self.connect_pins(params),
            "insert_reroute" => self.insert_reroute(params),
            "create_reroute_path" => self.create_reroute_path(params),
            other => fail_usage(
                &format!("unknown action '{}'", other),
                "supported actions: discover_nodes, create_node, apply_pin_defaults, \
                 connect_pins, insert_reroute, create_reroute_path",
            ),
        }
    }

    fn discover_nodes(&mut self, params: &Value) -> Value {
        let name = match self.document_required(params) {
            Ok(name) => name,
            Err(response) => return response,
        };
        let filter = DiscoverFilter {
            search_term: params
                .get("search_term")
                .and_then(Value::as_str)
                .map(str::to_string),
            category: params
                .get("category")
                .and_then(Value::as_str)
                .map(str::to_string),
            owner_type: params
                .get("owner_type_filter")
                .and_then(Value::as_str)
                .map(str::to_string),
            max_results: params
                .get("max_results")
                .and_then(Value::as_u64)
                .map(|n| n as usize)
                .unwrap_or(DEFAULT_MAX_RESULTS),
        };

        let document = self.documents.get(&name).expect("checked above");
        let results = discover(&self.catalog, document, &mut self.cache, &filter);
        json!({
            "success": true,
            "count": results.len(),
            "nodes": results,
        })
    }

    fn create_node(&mut self, params: &Value) -> Value {
        let name = match self.document_required(params) {
            Ok(name) => name,
            Err(response) => return response,
        };

        let node_params = params.get("node_params").cloned().unwrap_or(json!({}));
        let position = parse_position(params).or_else(|| parse_position(&node_params));
        let config = NodeConfig {
            owner_class: string_field(&node_params, "owner_class")
                .or_else(|| string_field(params, "owner_class")),
            member_scope: string_field(&node_params, "member_scope"),
            is_local: node_params.get("is_local").and_then(Value::as_bool),
            target_type: string_field(&node_params, "target_type"),
            class_to_spawn: string_field(&node_params, "class_to_spawn"),
        };

        let spawner_key = string_field(params, "spawner_key");
        let kind_name = string_field(params, "node_kind");

        // The synthetic pass-through kind has no catalog entry and is
        // constructed directly
        let is_reroute = kind_name
            .as_deref()
            .map(|k| k.eq_ignore_ascii_case("reroute"))
            .unwrap_or(false)
            || spawner_key
                .as_deref()
                .map(|k| k.eq_ignore_ascii_case("reroute"))
                .unwrap_or(false);

        let source = if is_reroute {
            CreationSource::Reroute
        } else {
            if spawner_key.is_none() && kind_name.is_none() {
                return fail_usage(
                    "missing 'spawner_key' (or 'node_kind')",
                    "run discover_nodes and pass the exact spawner_key from the results",
                );
            }
            let request = ResolveRequest {
                spawner_key,
                kind_name,
                owner_hint: config.owner_class.clone(),
            };
            let document = self.documents.get(&name).expect("checked above");
            match resolve(&self.catalog, document, &mut self.cache, &request) {
                Ok((entry, _tier)) => CreationSource::Catalog(entry),
                Err(err) => return fail(&err),
            }
        };

        let document = self.documents.get_mut(&name).expect("checked above");
        let created = create_and_configure(
            document,
            &self.types,
            source,
            position.unwrap_or(Vec2::ZERO),
            &config,
        );
        let node_id = match created {
            Ok(id) => id,
            Err(err) => return fail(&err),
        };

        // Kind config is settled; pin defaults ride along in the same call
        let mut defaults_report = None;
        if let Some(defaults) = node_params.get("pin_defaults").and_then(Value::as_object) {
            match apply_defaults(&mut document.graph, node_id, defaults) {
                Ok(report) => defaults_report = Some(report),
                Err(err) => return fail(&err),
            }
        }

        let node = document.graph.node(node_id).expect("just created");
        let mut response = json!({
            "success": true,
            "node_id": node_id,
            "title": node.title,
            "node_kind": node.kind.name(),
            "position": [node.position.x, node.position.y],
            "ports": PortDescriptor::from_node(node),
        });
        if let Some(report) = defaults_report {
            response["pin_defaults"] = json!(report);
        }
        response
    }

    fn apply_pin_defaults(&mut self, params: &Value) -> Value {
        let name = match self.document_required(params) {
            Ok(name) => name,
            Err(response) => return response,
        };
        let node_id = match params.get("node_id").and_then(Value::as_u64) {
            Some(id) => id as NodeId,
            None => {
                return fail_usage(
                    "missing required parameter 'node_id'",
                    "pass the node_id returned by create_node",
                )
            }
        };
        let empty = Map::new();
        let values = params
            .get("pin_defaults")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let document = self.documents.get_mut(&name).expect("checked above");
        match apply_defaults(&mut document.graph, node_id, values) {
            Ok(report) => {
                if report.all_applied() {
                    json!({ "success": true, "applied": report.applied })
                } else {
                    json!({
                        "success": false,
                        "error": "one or more ports rejected their default",
                        "applied": report.applied,
                        "failed": report.failed,
                        "suggestion": "fix the listed ports and re-run apply_pin_defaults \
                                       with only those entries",
                    })
                }
            }
            Err(err) => fail(&err),
        }
    }

    fn connect_pins(&mut self, params: &Value) -> Value {
        let name = match self.document_required(params) {
            Ok(name) => name,
            Err(response) => return response,
        };
        let document = self.documents.get_mut(&name).expect("checked above");
        let endpoints = match parse_endpoints(document, params) {
            Ok(endpoints) => endpoints,
            Err(err) => return fail(&err),
        };
        match document.graph.connect_by_ids(
            endpoints.0 .0,
            endpoints.0 .1,
            endpoints.1 .0,
            endpoints.1 .1,
        ) {
            Ok(()) => json!({ "success": true }),
            Err(err) => fail(&err),
        }
    }

    fn insert_reroute(&mut self, params: &Value) -> Value {
        let name = match self.document_required(params) {
            Ok(name) => name,
            Err(response) => return response,
        };
        let position = parse_position(params);
        let document = self.documents.get_mut(&name).expect("checked above");
        let endpoints = match parse_endpoints(document, params) {
            Ok(endpoints) => endpoints,
            Err(err) => return fail(&err),
        };
        match insert_reroute(&mut document.graph, endpoints.0, endpoints.1, position) {
            Ok(knot) => {
                let node = document.graph.node(knot).expect("just created");
                json!({
                    "success": true,
                    "node_id": knot,
                    "position": [node.position.x, node.position.y],
                })
            }
            Err(err) => fail(&err),
        }
    }

    fn create_reroute_path(&mut self, params: &Value) -> Value {
        let name = match self.document_required(params) {
            Ok(name) => name,
            Err(response) => return response,
        };
        let waypoints: Vec<Vec2> = params
            .get("waypoints")
            .and_then(Value::as_array)
            .map(|points| {
                points
                    .iter()
                    .filter_map(|point| {
                        let x = point.get(0).and_then(Value::as_f64)?;
                        let y = point.get(1).and_then(Value::as_f64)?;
                        Some(Vec2::new(x as f32, y as f32))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let document = self.documents.get_mut(&name).expect("checked above");
        let endpoints = match parse_endpoints(document, params) {
            Ok(endpoints) => endpoints,
            Err(err) => return fail(&err),
        };
        match create_reroute_path(&mut document.graph, endpoints.0, endpoints.1, &waypoints) {
            Ok(knots) => json!({ "success": true, "node_ids": knots }),
            Err(err) => fail(&err),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn parse_position(params: &Value) -> Option<Vec2> {
    let point = params.get("position")?.as_array()?;
    let x = point.first().and_then(Value::as_f64)?;
    let y = point.get(1).and_then(Value::as_f64)?;
    Some(Vec2::new(x as f32, y as f32))
}

type Endpoints = ((NodeId, PortId), (NodeId, PortId));

/// Resolves `{from_node, from_port, to_node, to_port}` to port indices.
/// Ports are accepted by name or by index.
fn parse_endpoints(document: &ScriptDocument, params: &Value) -> Result<Endpoints, EngineError> {
    let node_id = |key: &str| -> Result<NodeId, EngineError> {
        params
            .get(key)
            .and_then(Value::as_u64)
            .map(|id| id as NodeId)
            .ok_or_else(|| EngineError::node_not_found(format!("(missing '{}')", key)))
    };
    let from_node = node_id("from_node")?;
    let to_node = node_id("to_node")?;

    let port_id = |node: NodeId, key: &str, output: bool| -> Result<PortId, EngineError> {
        let node_ref = document
            .graph
            .node(node)
            .ok_or_else(|| EngineError::node_not_found(node.to_string()))?;
        match params.get(key) {
            Some(Value::Number(index)) => index
                .as_u64()
                .map(|id| id as PortId)
                .ok_or_else(|| EngineError::port_not_found(format!("{}:{:?}", node, key))),
            Some(Value::String(name)) => {
                let port = if output {
                    node_ref.find_output(name)
                } else {
                    node_ref.find_input(name)
                };
                port.map(|p| p.id)
                    .ok_or_else(|| EngineError::port_not_found(format!("{}:{}", node, name)))
            }
            _ => {
                // Unnamed: first data port keeps reroute chains terse
                let first = if output {
                    node_ref.first_data_output()
                } else {
                    node_ref.first_data_input()
                };
                first.ok_or_else(|| EngineError::port_not_found(format!("{}:<default>", node)))
            }
        }
    };

    let from_port = port_id(from_node, "from_port", true)?;
    let to_port = port_id(to_node, "to_port", false)?;
    Ok(((from_node, from_port), (to_node, to_port)))
}

fn fail(err: &EngineError) -> Value {
    let mut response = json!({
        "success": false,
        "error": err.to_string(),
    });
    if let Some(suggestion) = err.suggestion() {
        response["suggestion"] = json!(suggestion);
    }
    response
}

fn fail_usage(error: &str, usage_hint: &str) -> Value {
    json!({
        "success": false,
        "error": error,
        "usage_hint": usage_hint,
    })
}
