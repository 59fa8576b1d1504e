use super::{Node, NodeInfo, NodeResult, NodeType, Predicate};
use crate::context::PipelineContext;
use crate::error::{EngineError, GraphError};
use crate::trace::TraversalStep;
use crate::value::{Value, is_integral_float};
use serde::Deserialize;
use tracing::debug;

/// One scored condition. The predicate fields sit next to `score` in the config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScoreItem {
    #[serde(flatten)]
    pub predicate: Predicate,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScorecardConfig {
    /// The feature key the total is published under.
    pub output: String,
    #[serde(default)]
    pub base: f64,
    pub items: Vec<ScoreItem>,
}

/// Sums the scores of matching items and publishes the total as a derived feature.
#[derive(Debug)]
pub struct ScorecardNode {
    info: NodeInfo,
    config: ScorecardConfig,
}

impl ScorecardNode {
    pub fn new(info: NodeInfo, mut config: ScorecardConfig) -> Result<Self, GraphError> {
        if config.output.trim().is_empty() {
            return Err(GraphError::InvalidConfig {
                node_id: info.id.clone(),
                message: "scorecard has an empty output key".to_string(),
            });
        }
        for item in &mut config.items {
            item.predicate.prepare(&info.id)?;
        }
        Ok(Self { info, config })
    }
}

impl Node for ScorecardNode {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn node_type(&self) -> NodeType {
        NodeType::Scorecard
    }

    fn parse(&self, ctx: &mut PipelineContext) -> Result<NodeResult, EngineError> {
        let mut total = self.config.base;
        for item in &self.config.items {
            // Items whose feature is absent contribute nothing.
            let Some(value) = ctx.get(&item.predicate.feature) else {
                continue;
            };
            let matched = item
                .predicate
                .evaluate(value)
                .map_err(|e| EngineError::from_compare(&self.info.id, &item.predicate.feature, e))?;
            if matched {
                total += item.score;
            }
        }

        let score = if is_integral_float(total) {
            Value::Int(total as i64)
        } else {
            Value::Float(total)
        };
        debug!(node_id = %self.info.id, output = %self.config.output, score = %score, "Score computed");

        ctx.record(TraversalStep::Score {
            node_id: self.info.id.clone(),
            output: self.config.output.clone(),
            score: score.clone(),
        });
        ctx.set_feature(self.config.output.clone(), score);

        Ok(NodeResult::pass(&self.info, NodeType::Scorecard))
    }
}
