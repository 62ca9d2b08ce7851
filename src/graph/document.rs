//! Script documents: a named graph plus the identity the editor gives it
//!
//! A document is the unit the automation client addresses. Its generated
//! type is what variable externality is computed against: a variable whose
//! declaring owner's generated type differs from the context document's is
//! an external member and its spawner key gains an owning-type prefix.

use super::graph::ScriptGraph;
use super::port::PinType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A variable declared on a script document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDecl {
    pub name: String,
    pub declared_type: PinType,
}

impl VariableDecl {
    pub fn new(name: impl Into<String>, declared_type: PinType) -> Self {
        Self {
            name: name.into(),
            declared_type,
        }
    }
}

/// The visual-scripting program: one graph, its identity, and its variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDocument {
    pub id: Uuid,
    pub name: String,
    /// Name of the type this document compiles to
    pub generated_type: String,
    /// Class the generated type derives from
    pub parent_class: String,
    pub variables: Vec<VariableDecl>,
    pub graph: ScriptGraph,
}

impl ScriptDocument {
    /// Creates a new empty document deriving from the given class
    pub fn new(name: impl Into<String>, parent_class: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Uuid::new_v4(),
            generated_type: format!("{}_C", name),
            name,
            parent_class: parent_class.into(),
            variables: vec![],
            graph: ScriptGraph::new(),
        }
    }

    /// Declares a variable on this document
    pub fn add_variable(&mut self, decl: VariableDecl) -> &mut Self {
        self.variables.push(decl);
        self
    }

    pub fn variable(&self, name: &str) -> Option<&VariableDecl> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// True when the given generated type is this document's own
    pub fn owns_generated_type(&self, generated_type: &str) -> bool {
        self.generated_type == generated_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_type_follows_name() {
        let doc = ScriptDocument::new("BP_Door", "Actor");
        assert_eq!(doc.generated_type, "BP_Door_C");
        assert_eq!(doc.parent_class, "Actor");
        assert!(doc.owns_generated_type("BP_Door_C"));
        assert!(!doc.owns_generated_type("BP_Window_C"));
    }

    #[test]
    fn test_variable_lookup() {
        let mut doc = ScriptDocument::new("BP_Door", "Actor");
        doc.add_variable(VariableDecl::new("IsOpen", PinType::new("bool")));
        assert!(doc.variable("IsOpen").is_some());
        assert!(doc.variable("isopen").is_none()); // names are exact
    }
}
