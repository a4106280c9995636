use thiserror::Error;

use crate::graph::Node;
use crate::partners::PartnerId;

/// Errors raised while building a [`WeightedGraph`](crate::graph::WeightedGraph).
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("invalid weight {weight} on edge {from} -> {to}: weights must be finite and non-negative")]
    InvalidWeight { from: Node, to: Node, weight: f64 },
}

/// Errors raised by the dispatch engine for malformed input.
///
/// Expected runtime conditions (empty queue, no free partner, unknown order id
/// on completion) are reported through `Option`/`bool` return values instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("unknown node: {0}")]
    UnknownNode(Node),
    #[error("invalid order value {0}: must be finite and non-negative")]
    InvalidOrderValue(f64),
    #[error("duplicate partner id: {0}")]
    DuplicatePartner(PartnerId),
    #[error("unknown partner id: {0}")]
    UnknownPartner(PartnerId),
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dispatch engine lock poisoned")]
    Poisoned,
    #[error("auto-processing task failed: {0}")]
    AutoProcessor(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    pub fn unknown_node(node: impl Into<Node>) -> Self {
        Self::UnknownNode(node.into())
    }

    /// Errors caused by caller input, as opposed to engine/runtime failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DispatchError::Graph(_)
                | DispatchError::UnknownNode(_)
                | DispatchError::InvalidOrderValue(_)
                | DispatchError::DuplicatePartner(_)
                | DispatchError::UnknownPartner(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert!(DispatchError::unknown_node("Z").is_validation());
        assert!(DispatchError::InvalidOrderValue(-1.0).is_validation());
        assert!(!DispatchError::Poisoned.is_validation());
    }

    #[test]
    fn messages_name_the_offending_input() {
        let err = DispatchError::unknown_node("Z");
        assert_eq!(err.to_string(), "unknown node: Z");

        let err = GraphError::InvalidWeight {
            from: Node::from("A"),
            to: Node::from("B"),
            weight: -2.0,
        };
        assert!(err.to_string().contains("A -> B"));
    }
}
