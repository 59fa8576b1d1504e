use crate::value::SemanticType;
use thiserror::Error;

/// Errors raised by the value type system while classifying or converting values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("Feature value '{0}' does not classify into any known type")]
    FeatureTypeUnknown(String),

    #[error("Cannot convert value '{value}' to {target}")]
    TypeConvert { value: String, target: &'static str },
}

/// Reasons a single operator application can fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompareError {
    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: SemanticType,
        found: SemanticType,
    },

    #[error("operator '{operator}' is not defined for {kind}")]
    Unsupported {
        operator: &'static str,
        kind: SemanticType,
    },

    #[error("invalid threshold: {0}")]
    InvalidThreshold(String),
}

/// Structural violations of a decision graph, found either while building it
/// or while walking it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParseError(String),

    #[error("Node '{node_id}' has an unregistered or invalid kind: '{kind}'")]
    InvalidNodeType { node_id: String, kind: String },

    #[error("Node id '{0}' is defined more than once")]
    DuplicateNode(String),

    #[error("Node '{missing_node_id}' not found, which is required by the edge {edge}")]
    NodeNotFound {
        missing_node_id: String,
        edge: String,
    },

    #[error("Graph has no start node")]
    MissingStart,

    #[error("Graph has more than one start node: {0:?}")]
    MultipleStart(Vec<String>),

    #[error("Edges of node '{node_id}' are invalid: {message}")]
    InvalidEdges { node_id: String, message: String },

    #[error("Configuration of node '{node_id}' is invalid: {message}")]
    InvalidConfig { node_id: String, message: String },

    #[error("Graph contains a cycle through nodes {0:?}")]
    Cycle(Vec<String>),

    #[error("Node '{0}' was entered twice during one traversal")]
    NodeRevisited(String),

    #[error("Traversal stopped at node '{0}' without reaching a terminal node")]
    NoTerminal(String),
}

/// Errors surfaced by a traversal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Node '{node_id}': feature type unknown for value '{value}'")]
    FeatureTypeUnknown { node_id: String, value: String },

    #[error("Node '{node_id}': {source}")]
    TypeConvert {
        node_id: String,
        #[source]
        source: ValueError,
    },

    #[error(
        "Node '{node_id}': type mismatch on '{feature}', cannot compare {found} with {expected}"
    )]
    TypeMismatch {
        node_id: String,
        feature: String,
        expected: SemanticType,
        found: SemanticType,
    },

    #[error("Graph malformed: {0}")]
    GraphMalformed(#[from] GraphError),

    #[error("Node '{node_id}' failed: {message}")]
    Execution { node_id: String, message: String },

    #[error("Traversal cancelled before node '{node_id}'")]
    Cancelled { node_id: String },
}

impl EngineError {
    /// Attaches the failing node to an error coming out of the value type system.
    pub fn from_value(node_id: &str, err: ValueError) -> Self {
        match err {
            ValueError::FeatureTypeUnknown(value) => EngineError::FeatureTypeUnknown {
                node_id: node_id.to_string(),
                value,
            },
            other => EngineError::TypeConvert {
                node_id: node_id.to_string(),
                source: other,
            },
        }
    }

    /// Attaches the failing node and feature to an operator failure.
    pub fn from_compare(node_id: &str, feature: &str, err: CompareError) -> Self {
        match err {
            CompareError::Value(inner) => Self::from_value(node_id, inner),
            CompareError::TypeMismatch { expected, found } => EngineError::TypeMismatch {
                node_id: node_id.to_string(),
                feature: feature.to_string(),
                expected,
                found,
            },
            other => Self::execution(node_id, format!("feature '{}': {}", feature, other)),
        }
    }

    pub fn execution(node_id: &str, message: impl Into<String>) -> Self {
        EngineError::Execution {
            node_id: node_id.to_string(),
            message: message.into(),
        }
    }
}
