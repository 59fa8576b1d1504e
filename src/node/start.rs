use super::{Node, NodeInfo, NodeResult, NodeType};
use crate::context::PipelineContext;
use crate::error::EngineError;
use crate::trace::TraversalStep;
use tracing::debug;

#[derive(Debug)]
pub struct StartNode {
    info: NodeInfo,
}

impl StartNode {
    pub fn new(info: NodeInfo) -> Self {
        Self { info }
    }
}

impl Node for StartNode {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn node_type(&self) -> NodeType {
        NodeType::Start
    }

    fn before_parse(&self, ctx: &PipelineContext) -> Result<(), EngineError> {
        if ctx.features().is_empty() {
            return Err(EngineError::execution(&self.info.id, "feature bag is empty"));
        }
        Ok(())
    }

    fn parse(&self, ctx: &mut PipelineContext) -> Result<NodeResult, EngineError> {
        let features = ctx.features().len();
        debug!(node_id = %self.info.id, features, "Traversal started");
        ctx.record(TraversalStep::Start {
            node_id: self.info.id.clone(),
            features,
        });
        Ok(NodeResult::pass(&self.info, NodeType::Start))
    }
}
