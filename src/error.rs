use thiserror::Error;

use crate::tree::NodeId;

/// Result type for tree compilation and layout
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors raised while building a topic tree or laying it out.
///
/// Layout never produces partial output: any of these aborts the whole pass.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("malformed tree at node {node:?}: {reason}")]
    MalformedTree { node: NodeId, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("tree has no root")]
    EmptyTree,

    #[error("duplicate node name: {0}")]
    DuplicateName(String),

    #[error("unknown node referenced: {0}")]
    UnknownNode(String),

    #[error("document does not name a root node")]
    MissingRoot,

    #[error("invalid document: {0}")]
    Document(#[from] serde_json::Error),

    /// A finished layout could not be serialized.
    #[error("failed to serialize layout: {0}")]
    Serialization(String),
}

impl LayoutError {
    /// Stable machine-readable name, used in JSON error output.
    pub fn kind(&self) -> &'static str {
        match self {
            LayoutError::MalformedTree { .. } => "malformed_tree",
            LayoutError::InvalidConfiguration(_) => "invalid_configuration",
            LayoutError::EmptyTree => "empty_tree",
            LayoutError::DuplicateName(_) => "duplicate_name",
            LayoutError::UnknownNode(_) => "unknown_node",
            LayoutError::MissingRoot => "missing_root",
            LayoutError::Document(_) => "document",
            LayoutError::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_kind_is_distinct_from_document() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(LayoutError::from(parse).kind(), "document");

        let err = LayoutError::Serialization("float key".to_string());
        assert_eq!(err.kind(), "serialization");
        assert_eq!(err.to_string(), "failed to serialize layout: float key");
    }
}
