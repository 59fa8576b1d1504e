use crate::value::{Operator, Value};

mod formatter;

pub use formatter::TraceFormatter;

/// A record of what one node did during a traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum TraversalStep {
    Start {
        node_id: String,
        features: usize,
    },
    Condition {
        node_id: String,
        feature: String,
        operator: Operator,
        threshold: Value,
        value: Value,
        outcome: bool,
    },
    Ruleset {
        node_id: String,
        hits: Vec<String>,
        blocked_by: Option<String>,
    },
    Score {
        node_id: String,
        output: String,
        score: Value,
    },
    Terminal {
        node_id: String,
        tag: String,
        label: String,
    },
}

impl TraversalStep {
    pub fn node_id(&self) -> &str {
        match self {
            TraversalStep::Start { node_id, .. }
            | TraversalStep::Condition { node_id, .. }
            | TraversalStep::Ruleset { node_id, .. }
            | TraversalStep::Score { node_id, .. }
            | TraversalStep::Terminal { node_id, .. } => node_id,
        }
    }
}

/// The ordered steps of one traversal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraversalTrace {
    steps: Vec<TraversalStep>,
}

impl TraversalTrace {
    pub fn push(&mut self, step: TraversalStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[TraversalStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
