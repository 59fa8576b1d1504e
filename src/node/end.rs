use super::{Node, NodeInfo, NodeResult, NodeType};
use crate::context::PipelineContext;
use crate::error::EngineError;
use crate::trace::TraversalStep;

/// A terminal node. Whatever branch reaches it gets its tag and label as the decision.
#[derive(Debug)]
pub struct EndNode {
    info: NodeInfo,
}

impl EndNode {
    pub fn new(info: NodeInfo) -> Self {
        Self { info }
    }
}

impl Node for EndNode {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn node_type(&self) -> NodeType {
        NodeType::End
    }

    fn parse(&self, ctx: &mut PipelineContext) -> Result<NodeResult, EngineError> {
        ctx.record(TraversalStep::Terminal {
            node_id: self.info.id.clone(),
            tag: self.info.tag.clone(),
            label: self.info.label.clone(),
        });
        Ok(NodeResult::block(&self.info, NodeType::End))
    }
}
