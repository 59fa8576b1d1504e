//! Common test utilities for building graph definitions and feature bags.
use shinsa::prelude::*;
use std::sync::Arc;

#[allow(dead_code)]
pub fn node(id: &str, kind: &str) -> NodeDefinition {
    NodeDefinition {
        id: id.to_string(),
        name: String::new(),
        kind: kind.to_string(),
        tag: String::new(),
        label: String::new(),
        config: serde_json::Value::Null,
    }
}

#[allow(dead_code)]
pub fn end(id: &str, tag: &str, label: &str) -> NodeDefinition {
    NodeDefinition {
        tag: tag.to_string(),
        label: label.to_string(),
        ..node(id, "end")
    }
}

#[allow(dead_code)]
pub fn condition(id: &str, feature: &str, operator: &str, threshold: serde_json::Value) -> NodeDefinition {
    NodeDefinition {
        config: serde_json::json!({
            "feature": feature,
            "operator": operator,
            "threshold": threshold,
        }),
        ..node(id, "condition")
    }
}

#[allow(dead_code)]
pub fn edge(source: &str, target: &str) -> EdgeDefinition {
    EdgeDefinition {
        source: source.to_string(),
        target: target.to_string(),
        branch: None,
    }
}

#[allow(dead_code)]
pub fn branch(source: &str, target: &str, outcome: bool) -> EdgeDefinition {
    EdgeDefinition {
        branch: Some(outcome),
        ..edge(source, target)
    }
}

/// Start -> Condition -> (true: End "A", false: End "B").
#[allow(dead_code)]
pub fn create_branch_graph(feature: &str, operator: &str, threshold: serde_json::Value) -> GraphDefinition {
    GraphDefinition {
        nodes: vec![
            node("start", "start"),
            condition("check", feature, operator, threshold),
            end("A", "reject", "matched"),
            end("B", "accept", "not matched"),
        ],
        edges: vec![
            edge("start", "check"),
            branch("check", "A", true),
            branch("check", "B", false),
        ],
    }
}

/// Start -> Scorecard -> Ruleset -> Condition on the score -> review / accept.
///
/// Ruleset "blacklist" blocks with `reject` when `device` is in the deny list.
#[allow(dead_code)]
pub fn create_risk_graph() -> GraphDefinition {
    let scorecard = NodeDefinition {
        config: serde_json::json!({
            "output": "risk_score",
            "base": 10,
            "items": [
                {"feature": "age", "operator": "<", "threshold": 25, "score": 30},
                {"feature": "city", "operator": "IN", "threshold": ["X", "Y"], "score": 25},
                {"feature": "income", "operator": ">=", "threshold": 10000, "score": -20}
            ]
        }),
        ..node("score", "scorecard")
    };
    let ruleset = NodeDefinition {
        config: serde_json::json!({
            "rules": [
                {
                    "name": "blacklist",
                    "conditions": [{"feature": "device", "operator": "IN", "threshold": ["d-1", "d-2"]}],
                    "decision": {"tag": "reject", "label": "device blacklisted", "block": true}
                },
                {
                    "name": "night_owl",
                    "logic": "or",
                    "conditions": [
                        {"feature": "hour", "operator": "<", "threshold": 5},
                        {"feature": "hour", "operator": ">", "threshold": 22}
                    ],
                    "decision": {"tag": "review", "label": "odd hours"}
                }
            ]
        }),
        ..node("rules", "ruleset")
    };

    GraphDefinition {
        nodes: vec![
            node("start", "start"),
            scorecard,
            ruleset,
            condition("threshold", "risk_score", ">", serde_json::json!(50)),
            end("review", "review", "high score"),
            end("accept", "accept", ""),
        ],
        edges: vec![
            edge("start", "score"),
            edge("score", "rules"),
            edge("rules", "threshold"),
            branch("threshold", "review", true),
            branch("threshold", "accept", false),
        ],
    }
}

#[allow(dead_code)]
pub fn build(definition: GraphDefinition) -> Executor {
    let graph = Graph::builder(definition)
        .build()
        .expect("test graph should build");
    Executor::new(Arc::new(graph))
}

#[allow(dead_code)]
pub fn features(pairs: &[(&str, Value)]) -> FeatureBag {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}
