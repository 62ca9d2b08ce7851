//! Error taxonomy for the catalog and configuration engine
//!
//! Every failure that crosses the command boundary carries enough context
//! for a non-interactive client to self-correct: the identifier that was
//! tried plus a suggestion naming the call that would unblock it.

use thiserror::Error;

/// Engine-level errors returned by resolution, instantiation, and wiring.
///
/// Classification gaps are deliberately absent from this enum: an entry
/// that cannot be classified degrades to `NodeKind::Generic` instead of
/// erroring, so discovery is never blocked by one odd catalog entry.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// A named thing (document, node, port, catalog entry, owning type)
    /// could not be found. Carries the attempted identifier.
    #[error("{what} not found: '{ident}'")]
    NotFound {
        what: &'static str,
        ident: String,
        suggestion: String,
    },

    /// The target exists but is in a state that rejects the operation
    /// (port already connected, port is an output, and so on).
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    /// A value had a shape with no coercion rule (unrecognized struct
    /// layout, unsupported JSON type).
    #[error("unsupported shape: {detail}")]
    UnsupportedShape { detail: String },
}

impl EngineError {
    /// Not-found error with a canned "run discovery first" suggestion.
    pub fn spawner_not_found(key: impl Into<String>, tier_reached: &str) -> Self {
        let ident = key.into();
        EngineError::NotFound {
            what: "catalog entry",
            ident: ident.clone(),
            suggestion: format!(
                "no spawner matched '{}' (last tier tried: {}); run discover_nodes and \
                 retry with an exact spawner_key from the results",
                ident, tier_reached
            ),
        }
    }

    pub fn document_not_found(name: impl Into<String>) -> Self {
        EngineError::NotFound {
            what: "document",
            ident: name.into(),
            suggestion: "open or register the script document before editing it".to_string(),
        }
    }

    pub fn node_not_found(ident: impl Into<String>) -> Self {
        EngineError::NotFound {
            what: "node",
            ident: ident.into(),
            suggestion: "node ids are per-document; use the id returned by create_node".to_string(),
        }
    }

    pub fn port_not_found(ident: impl Into<String>) -> Self {
        EngineError::NotFound {
            what: "port",
            ident: ident.into(),
            suggestion: "port names are listed in the descriptor returned by discover_nodes"
                .to_string(),
        }
    }

    pub fn type_not_found(ident: impl Into<String>) -> Self {
        EngineError::NotFound {
            what: "owning type",
            ident: ident.into(),
            suggestion: "pass a bare class name, a path-qualified name, or a quoted \
                         type reference"
                .to_string(),
        }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        EngineError::InvalidState {
            reason: reason.into(),
        }
    }

    /// The suggestion text for this error, if it carries one.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            EngineError::NotFound { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawner_not_found_mentions_key_and_discovery() {
        let err = EngineError::spawner_not_found("Foo::Bar", "context-filtered scan");
        assert!(err.to_string().contains("Foo::Bar"));
        let suggestion = err.suggestion().unwrap();
        assert!(suggestion.contains("discover_nodes"));
        assert!(suggestion.contains("context-filtered scan"));
    }

    #[test]
    fn test_invalid_state_has_no_suggestion() {
        let err = EngineError::invalid_state("port is an output");
        assert!(err.suggestion().is_none());
    }
}
