use serde::Serialize;
use std::fmt;

/// The closed set of node kinds a graph may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Start,
    End,
    Condition,
    Ruleset,
    Scorecard,
}

impl NodeType {
    /// Resolves a kind string, ignoring case. `conditional` is accepted for `condition`.
    pub fn resolve(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "start" => Some(NodeType::Start),
            "end" => Some(NodeType::End),
            "condition" | "conditional" => Some(NodeType::Condition),
            "ruleset" => Some(NodeType::Ruleset),
            "scorecard" => Some(NodeType::Scorecard),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Condition => "condition",
            NodeType::Ruleset => "ruleset",
            NodeType::Scorecard => "scorecard",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
