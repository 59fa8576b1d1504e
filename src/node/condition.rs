use super::{Node, NodeInfo, NodeResult, NodeType};
use crate::context::PipelineContext;
use crate::error::{CompareError, EngineError, GraphError};
use crate::trace::TraversalStep;
use crate::value::{Operator, Value, compile_like};
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

/// A comparison of one feature against a configured threshold.
#[derive(Debug, Clone, Deserialize)]
pub struct Predicate {
    pub feature: String,
    pub operator: Operator,
    pub threshold: Value,
    /// The `LIKE` threshold, compiled when the owning node is built.
    #[serde(skip)]
    like: Option<Regex>,
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.feature == other.feature
            && self.operator == other.operator
            && self.threshold == other.threshold
    }
}

impl Predicate {
    pub fn new(feature: impl Into<String>, operator: Operator, threshold: impl Into<Value>) -> Self {
        Self {
            feature: feature.into(),
            operator,
            threshold: threshold.into(),
            like: None,
        }
    }

    /// Checks the configuration and compiles anything reusable across traversals.
    pub(crate) fn prepare(&mut self, node_id: &str) -> Result<(), GraphError> {
        let invalid = |message: String| GraphError::InvalidConfig {
            node_id: node_id.to_string(),
            message,
        };
        if self.feature.trim().is_empty() {
            return Err(invalid("condition has an empty feature key".to_string()));
        }
        self.operator.validate_threshold(&self.threshold).map_err(invalid)?;
        if self.operator == Operator::Like {
            let pattern = compile_like(&self.threshold).map_err(|e| invalid(e.to_string()))?;
            self.like = Some(pattern);
        }
        Ok(())
    }

    /// Returns true once the `LIKE` pattern has been compiled.
    pub fn is_prepared(&self) -> bool {
        self.operator != Operator::Like || self.like.is_some()
    }

    pub fn evaluate(&self, value: &Value) -> Result<bool, CompareError> {
        self.operator
            .apply_prepared(value, &self.threshold, self.like.as_ref())
    }
}

/// Branches on a single predicate: the `true` edge when it holds, the `false` edge otherwise.
#[derive(Debug)]
pub struct ConditionNode {
    info: NodeInfo,
    predicate: Predicate,
}

impl ConditionNode {
    pub fn new(info: NodeInfo, mut predicate: Predicate) -> Result<Self, GraphError> {
        predicate.prepare(&info.id)?;
        Ok(Self { info, predicate })
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

impl Node for ConditionNode {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn node_type(&self) -> NodeType {
        NodeType::Condition
    }

    fn before_parse(&self, ctx: &PipelineContext) -> Result<(), EngineError> {
        if ctx.get(&self.predicate.feature).is_none() {
            return Err(EngineError::execution(
                &self.info.id,
                format!("required feature '{}' is missing", self.predicate.feature),
            ));
        }
        Ok(())
    }

    fn parse(&self, ctx: &mut PipelineContext) -> Result<NodeResult, EngineError> {
        let feature = &self.predicate.feature;
        let value = ctx.get(feature).cloned().ok_or_else(|| {
            EngineError::execution(&self.info.id, format!("required feature '{}' is missing", feature))
        })?;

        let outcome = self
            .predicate
            .evaluate(&value)
            .map_err(|e| EngineError::from_compare(&self.info.id, feature, e))?;

        debug!(
            node_id = %self.info.id,
            feature = %feature,
            value = %value,
            operator = %self.predicate.operator,
            outcome,
            "Condition evaluated"
        );

        ctx.record(TraversalStep::Condition {
            node_id: self.info.id.clone(),
            feature: feature.clone(),
            operator: self.predicate.operator,
            threshold: self.predicate.threshold.clone(),
            value,
            outcome,
        });

        Ok(NodeResult {
            branch: Some(outcome),
            ..NodeResult::pass(&self.info, NodeType::Condition)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str) -> NodeInfo {
        NodeInfo {
            id: id.to_string(),
            name: id.to_string(),
            kind: "condition".to_string(),
            ..NodeInfo::default()
        }
    }

    #[test]
    fn test_like_pattern_compiled_at_build() {
        let predicate = Predicate::new("email", Operator::Like, "%@example.com");
        assert!(!predicate.is_prepared());

        let node = ConditionNode::new(info("mail"), predicate).unwrap();
        assert!(node.predicate().is_prepared());
        assert!(node.predicate().evaluate(&Value::from("a@example.com")).unwrap());
        assert!(!node.predicate().evaluate(&Value::from("a@example.org")).unwrap());
    }

    #[test]
    fn test_like_needs_text_threshold() {
        let predicate = Predicate::new("email", Operator::Like, vec!["a", "b"]);
        let err = ConditionNode::new(info("mail"), predicate).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfig { ref node_id, .. } if node_id == "mail"));
    }
}
