//! Script graph core - documents, graphs, nodes, and ports

pub mod document;
pub mod graph;
pub mod node;
pub mod port;

pub use document::{ScriptDocument, VariableDecl};
pub use graph::{Connection, ScriptGraph};
pub use node::{
    CallTarget, CastConfig, MemberBinding, Node, NodeId, NodeKind, ParamSpec, VariableBinding,
};
pub use port::{PinType, Port, PortDirection, PortId};
