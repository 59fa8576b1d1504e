//! The node model: identity, the three-phase lifecycle, and the node kinds.

use crate::context::PipelineContext;
use crate::error::EngineError;
use serde::Serialize;
use std::fmt;

mod condition;
mod end;
mod kind;
mod ruleset;
mod scorecard;
mod start;

pub use condition::{ConditionNode, Predicate};
pub use end::EndNode;
pub use kind::NodeType;
pub use ruleset::{Logic, Rule, RuleDecision, RulesetConfig, RulesetNode};
pub use scorecard::{ScoreItem, ScorecardConfig, ScorecardNode};
pub use start::StartNode;

/// Identity and decision annotations of a node. Immutable once the graph is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub tag: String,
    pub label: String,
}

/// The outcome of one node's `parse` step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeResult {
    pub id: String,
    pub name: String,
    pub kind: NodeType,
    pub tag: String,
    pub label: String,
    /// Terminal results stop the traversal and become the decision.
    pub is_block: bool,
    /// The outcome of a branching node, selecting its outgoing edge.
    pub branch: Option<bool>,
    pub hits: Vec<String>,
}

impl NodeResult {
    /// A non-blocking result carrying the node's own annotations.
    pub fn pass(info: &NodeInfo, kind: NodeType) -> Self {
        Self {
            id: info.id.clone(),
            name: info.name.clone(),
            kind,
            tag: info.tag.clone(),
            label: info.label.clone(),
            is_block: false,
            branch: None,
            hits: Vec::new(),
        }
    }

    pub fn block(info: &NodeInfo, kind: NodeType) -> Self {
        Self {
            is_block: true,
            ..Self::pass(info, kind)
        }
    }
}

/// The lifecycle every node kind implements.
///
/// Nodes are built once with the graph and shared read-only between concurrent
/// traversals, so all per-request state goes through the [`PipelineContext`].
pub trait Node: Send + Sync + fmt::Debug {
    fn info(&self) -> &NodeInfo;

    fn node_type(&self) -> NodeType;

    fn name(&self) -> &str {
        &self.info().name
    }

    /// Validation run before `parse`. An error aborts the traversal.
    fn before_parse(&self, _ctx: &PipelineContext) -> Result<(), EngineError> {
        Ok(())
    }

    fn parse(&self, ctx: &mut PipelineContext) -> Result<NodeResult, EngineError>;

    /// Post-processing. Errors are reported but never change the result.
    fn after_parse(
        &self,
        _ctx: &mut PipelineContext,
        _result: &NodeResult,
    ) -> Result<(), EngineError> {
        Ok(())
    }
}
