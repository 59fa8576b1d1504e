use super::{Node, NodeInfo, NodeResult, NodeType, Predicate};
use crate::context::PipelineContext;
use crate::error::{EngineError, GraphError};
use crate::trace::TraversalStep;
use serde::Deserialize;
use tracing::debug;

/// How a rule combines its conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Logic {
    #[default]
    And,
    Or,
}

/// What a hit rule contributes to the decision.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RuleDecision {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub label: String,
    /// A hit blocking rule ends the traversal with this decision.
    #[serde(default)]
    pub block: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Rule {
    pub name: String,
    #[serde(default)]
    pub logic: Logic,
    pub conditions: Vec<Predicate>,
    #[serde(default)]
    pub decision: RuleDecision,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RulesetConfig {
    pub rules: Vec<Rule>,
    /// Fail on missing features instead of treating the rule as not hit.
    #[serde(default)]
    pub strict: bool,
}

/// Evaluates every rule in order and records which ones hit.
#[derive(Debug)]
pub struct RulesetNode {
    info: NodeInfo,
    config: RulesetConfig,
}

impl RulesetNode {
    pub fn new(info: NodeInfo, mut config: RulesetConfig) -> Result<Self, GraphError> {
        if config.rules.is_empty() {
            return Err(GraphError::InvalidConfig {
                node_id: info.id.clone(),
                message: "ruleset has no rules".to_string(),
            });
        }
        for rule in &mut config.rules {
            if rule.conditions.is_empty() {
                return Err(GraphError::InvalidConfig {
                    node_id: info.id.clone(),
                    message: format!("rule '{}' has no conditions", rule.name),
                });
            }
            for predicate in &mut rule.conditions {
                predicate.prepare(&info.id)?;
            }
        }
        Ok(Self { info, config })
    }

    /// A rule with any of its features missing does not hit, whatever its logic.
    fn rule_hits(&self, rule: &Rule, ctx: &PipelineContext) -> Result<bool, EngineError> {
        let Some(values) = rule
            .conditions
            .iter()
            .map(|predicate| ctx.get(&predicate.feature))
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(false);
        };

        let outcomes = rule
            .conditions
            .iter()
            .zip(values)
            .map(|(predicate, value)| {
                predicate
                    .evaluate(value)
                    .map_err(|e| EngineError::from_compare(&self.info.id, &predicate.feature, e))
            })
            .collect::<Result<Vec<bool>, _>>()?;

        Ok(match rule.logic {
            Logic::And => outcomes.iter().all(|hit| *hit),
            Logic::Or => outcomes.iter().any(|hit| *hit),
        })
    }
}

impl Node for RulesetNode {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn node_type(&self) -> NodeType {
        NodeType::Ruleset
    }

    fn before_parse(&self, ctx: &PipelineContext) -> Result<(), EngineError> {
        if !self.config.strict {
            return Ok(());
        }
        let missing = self
            .config
            .rules
            .iter()
            .flat_map(|rule| &rule.conditions)
            .find(|predicate| ctx.get(&predicate.feature).is_none());
        match missing {
            Some(predicate) => Err(EngineError::execution(
                &self.info.id,
                format!("required feature '{}' is missing", predicate.feature),
            )),
            None => Ok(()),
        }
    }

    fn parse(&self, ctx: &mut PipelineContext) -> Result<NodeResult, EngineError> {
        let mut hits = Vec::new();
        let mut blocking: Option<&Rule> = None;

        for rule in &self.config.rules {
            if ctx.is_cancelled() {
                return Err(EngineError::Cancelled {
                    node_id: self.info.id.clone(),
                });
            }
            if self.rule_hits(rule, ctx)? {
                debug!(node_id = %self.info.id, rule = %rule.name, "Rule hit");
                hits.push(rule.name.clone());
                if rule.decision.block && blocking.is_none() {
                    blocking = Some(rule);
                }
            }
        }

        ctx.record(TraversalStep::Ruleset {
            node_id: self.info.id.clone(),
            hits: hits.clone(),
            blocked_by: blocking.map(|rule| rule.name.clone()),
        });

        let mut result = match blocking {
            Some(rule) => NodeResult {
                tag: rule.decision.tag.clone(),
                label: rule.decision.label.clone(),
                ..NodeResult::block(&self.info, NodeType::Ruleset)
            },
            None => NodeResult::pass(&self.info, NodeType::Ruleset),
        };
        result.hits = hits;
        Ok(result)
    }

    fn after_parse(&self, ctx: &mut PipelineContext, result: &NodeResult) -> Result<(), EngineError> {
        ctx.add_hits(result.hits.iter().cloned());
        Ok(())
    }
}
