use crate::error::GraphError;
use serde::{Deserialize, Serialize};

/// The complete, canonical definition of a decision graph, ready to be built.
/// This is the target structure for any custom format conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDefinition {
    pub nodes: Vec<NodeDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
}

impl GraphDefinition {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::JsonParseError(e.to_string()))
    }
}

/// Defines a single node and its kind-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub label: String,
    /// Condition, ruleset and scorecard nodes read their settings from here.
    #[serde(default)]
    pub config: serde_json::Value,
}

/// Defines a directed edge. Edges leaving a condition node carry the branch outcome
/// that selects them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<bool>,
}
