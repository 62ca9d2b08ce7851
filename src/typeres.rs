//! Type-descriptor resolution
//!
//! Clients hand type names over in whatever form they have: a bare class
//! name, a path-qualified name, the quoted reference syntax an editor
//! copies to the clipboard, or a generated-class variant. The registry
//! normalizes all of them to one registered class.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One registered class: short name, asset path, parent link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub path: String,
    pub parent: Option<String>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, path: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            parent: parent.map(|p| p.to_string()),
        }
    }
}

/// Registry of known classes with hierarchy queries
#[derive(Debug, Default)]
pub struct TypeRegistry {
    classes: BTreeMap<String, ClassInfo>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the standard class hierarchy the builtin
    /// catalog's members reference
    pub fn with_standard_classes() -> Self {
        let mut registry = Self::new();
        for (name, parent) in [
            ("Object", None),
            ("Actor", Some("Object")),
            ("Pawn", Some("Actor")),
            ("Character", Some("Pawn")),
            ("Controller", Some("Actor")),
            ("MovementComponent", Some("Object")),
            ("SystemLibrary", Some("Object")),
            ("MathLibrary", Some("Object")),
            ("GameplayLibrary", Some("Object")),
        ] {
            registry.register(ClassInfo::new(name, format!("/Script/Engine.{}", name), parent));
        }
        registry
    }

    pub fn register(&mut self, class: ClassInfo) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Registers a document's generated type under its parent class
    pub fn register_generated(&mut self, generated_type: &str, parent: &str, path: &str) {
        self.register(ClassInfo::new(generated_type, path, Some(parent)));
    }

    /// Resolves a free-form type string to a registered class
    ///
    /// Accepted forms: bare name (`Pawn`), path-qualified
    /// (`/Script/Engine.Pawn`), quoted reference (`Class'/Script/Engine.Pawn'`),
    /// and generated-class variants (`BP_Door` for `BP_Door_C`, or the
    /// reverse).
    pub fn resolve(&self, raw: &str) -> Option<&ClassInfo> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Quoted reference: Prefix'/Path/To.Name'
        let unquoted = match (trimmed.find('\''), trimmed.ends_with('\'')) {
            (Some(open), true) if open + 1 < trimmed.len() - 1 => {
                &trimmed[open + 1..trimmed.len() - 1]
            }
            _ => trimmed,
        };

        // Path-qualified: keep the last segment after '.' or '/'
        let short = unquoted
            .rsplit(|c| c == '.' || c == '/')
            .next()
            .unwrap_or(unquoted);

        if let Some(class) = self.classes.get(short) {
            return Some(class);
        }
        // Generated-class suffix variants
        if let Some(stripped) = short.strip_suffix("_C") {
            if let Some(class) = self.classes.get(stripped) {
                return Some(class);
            }
        }
        self.classes.get(&format!("{}_C", short))
    }

    /// True when `child` is `ancestor` or derives from it
    pub fn is_a(&self, child: &str, ancestor: &str) -> bool {
        let mut current = Some(child.to_string());
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self
                .classes
                .get(&name)
                .and_then(|class| class.parent.clone());
        }
        false
    }
}
