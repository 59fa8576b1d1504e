//! Walks a graph from its start node to a terminal decision.

use crate::context::PipelineContext;
use crate::error::{EngineError, GraphError};
use crate::graph::{Graph, Successors};
use crate::node::{NodeResult, NodeType};
use crate::trace::TraceFormatter;
use crate::value::FeatureBag;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The terminal result of one traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub id: String,
    pub name: String,
    pub kind: NodeType,
    pub tag: String,
    pub label: String,
    /// Every rule hit along the path, in evaluation order.
    pub hits: Vec<String>,
    /// Node ids in the order they were visited.
    pub trail: Vec<String>,
    /// A human-readable explanation of the path that led to the decision.
    pub reason: String,
}

impl Decision {
    fn from_result(result: &NodeResult, ctx: &PipelineContext) -> Self {
        Self {
            id: result.id.clone(),
            name: result.name.clone(),
            kind: result.kind,
            tag: result.tag.clone(),
            label: result.label.clone(),
            hits: ctx.hits().to_vec(),
            trail: ctx.trail().to_vec(),
            reason: TraceFormatter::format_trace(ctx.trace()),
        }
    }
}

/// Runs traversals of one shared graph.
///
/// An `Executor` is cheap to clone and can be used from many threads at once; each
/// call gets its own [`PipelineContext`].
#[derive(Debug, Clone)]
pub struct Executor {
    graph: Arc<Graph>,
}

impl Executor {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn execute(&self, features: FeatureBag) -> Result<Decision, EngineError> {
        execute(&self.graph, features)
    }

    /// Like [`Executor::execute`], aborting with [`EngineError::Cancelled`] once `cancel` fires.
    pub fn execute_with_cancel(
        &self,
        features: FeatureBag,
        cancel: &CancellationToken,
    ) -> Result<Decision, EngineError> {
        let mut ctx = PipelineContext::with_cancellation(features, cancel.clone());
        traverse(&self.graph, &mut ctx)
    }

    /// Walks the graph with a caller-provided context.
    pub fn run(&self, ctx: &mut PipelineContext) -> Result<Decision, EngineError> {
        traverse(&self.graph, ctx)
    }

    /// Evaluates independent requests in parallel. Results keep the input order.
    pub fn execute_batch(&self, bags: Vec<FeatureBag>) -> Vec<Result<Decision, EngineError>> {
        bags.into_par_iter()
            .map(|features| self.execute(features))
            .collect()
    }
}

/// Evaluates `graph` against one feature bag.
pub fn execute(graph: &Graph, features: FeatureBag) -> Result<Decision, EngineError> {
    let mut ctx = PipelineContext::new(features);
    traverse(graph, &mut ctx)
}

fn traverse(graph: &Graph, ctx: &mut PipelineContext) -> Result<Decision, EngineError> {
    let mut current = graph.start();

    loop {
        let node = graph.node(current);
        let node_id = node.info().id.as_str();

        if ctx.is_cancelled() {
            warn!(node_id = %node_id, "Traversal cancelled");
            return Err(EngineError::Cancelled {
                node_id: node_id.to_string(),
            });
        }
        if ctx.mark_visited(node_id) {
            return Err(GraphError::NodeRevisited(node_id.to_string()).into());
        }

        debug!(node_id = %node_id, kind = %node.node_type(), "Entering node");

        node.before_parse(ctx)?;
        let result = node.parse(ctx)?;
        if ctx.is_cancelled() {
            warn!(node_id = %node_id, "Traversal cancelled during node");
            return Err(EngineError::Cancelled {
                node_id: node_id.to_string(),
            });
        }
        if let Err(e) = node.after_parse(ctx, &result) {
            warn!(node_id = %node_id, error = %e, "after_parse failed, keeping result");
        }
        ctx.set_result(node_id, result.clone());

        if result.is_block {
            info!(
                node_id = %node_id,
                tag = %result.tag,
                label = %result.label,
                elapsed_us = ctx.elapsed().as_micros() as u64,
                "Terminal reached"
            );
            return Ok(Decision::from_result(&result, ctx));
        }

        current = match graph.successors(current) {
            Successors::Next(next) => next,
            Successors::Branch { on_true, on_false } => match result.branch {
                Some(branch) => {
                    debug!(node_id = %node_id, branch, "Branch chosen");
                    if branch { on_true } else { on_false }
                }
                None => {
                    return Err(EngineError::execution(
                        node_id,
                        "branching node produced no branch outcome",
                    ));
                }
            },
            Successors::Terminal => return Err(GraphError::NoTerminal(node_id.to_string()).into()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeInfo, StartNode};
    use crate::value::Value;
    use ahash::AHashMap;

    /// Ends the traversal and then fails its post-processing.
    #[derive(Debug)]
    struct FailingEnd {
        info: NodeInfo,
    }

    impl Node for FailingEnd {
        fn info(&self) -> &NodeInfo {
            &self.info
        }

        fn node_type(&self) -> NodeType {
            NodeType::End
        }

        fn parse(&self, _ctx: &mut PipelineContext) -> Result<NodeResult, EngineError> {
            Ok(NodeResult::block(&self.info, NodeType::End))
        }

        fn after_parse(
            &self,
            _ctx: &mut PipelineContext,
            _result: &NodeResult,
        ) -> Result<(), EngineError> {
            Err(EngineError::execution(&self.info.id, "post-processing failed"))
        }
    }

    fn info(id: &str, tag: &str, label: &str) -> NodeInfo {
        NodeInfo {
            id: id.to_string(),
            name: id.to_string(),
            kind: "end".to_string(),
            tag: tag.to_string(),
            label: label.to_string(),
        }
    }

    fn failing_graph() -> Graph {
        let nodes: Vec<Box<dyn crate::node::Node>> = vec![
            Box::new(StartNode::new(info("start", "", ""))),
            Box::new(FailingEnd {
                info: info("done", "review", "manual check"),
            }),
        ];
        let index: AHashMap<String, usize> =
            [("start".to_string(), 0), ("done".to_string(), 1)].into_iter().collect();
        Graph {
            nodes,
            index,
            successors: vec![Successors::Next(1), Successors::Terminal],
            start: 0,
        }
    }

    #[test]
    fn test_after_parse_failure_keeps_decision() {
        let graph = failing_graph();
        let mut features = FeatureBag::new();
        features.insert("amount".to_string(), Value::from(10));
        let mut ctx = PipelineContext::new(features);

        let decision = traverse(&graph, &mut ctx).unwrap();

        assert_eq!(decision.id, "done");
        assert_eq!(decision.tag, "review");
        assert_eq!(decision.label, "manual check");
        assert_eq!(decision.trail, vec!["start", "done"]);
        assert!(ctx.result("done").unwrap().is_block);
    }
}
