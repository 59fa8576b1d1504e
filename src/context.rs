//! Per-traversal mutable state.

use crate::node::NodeResult;
use crate::trace::{TraversalStep, TraversalTrace};
use crate::value::{FeatureBag, Value};
use ahash::{AHashMap, AHashSet};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// The state one traversal reads and writes.
///
/// A context is created for a single request, owned exclusively by the traversal
/// walking it, and dropped once the decision is produced. Nothing in here is
/// shared between concurrent traversals.
#[derive(Debug)]
pub struct PipelineContext {
    features: FeatureBag,
    results: AHashMap<String, NodeResult>,
    trail: Vec<String>,
    visited: AHashSet<String>,
    current: Option<String>,
    hits: Vec<String>,
    trace: TraversalTrace,
    cancel: CancellationToken,
    started_at: Instant,
}

impl PipelineContext {
    pub fn new(features: FeatureBag) -> Self {
        Self::with_cancellation(features, CancellationToken::new())
    }

    pub fn with_cancellation(features: FeatureBag, cancel: CancellationToken) -> Self {
        Self {
            features,
            results: AHashMap::new(),
            trail: Vec::new(),
            visited: AHashSet::new(),
            current: None,
            hits: Vec::new(),
            trace: TraversalTrace::default(),
            cancel,
            started_at: Instant::now(),
        }
    }

    /// Looks up a feature, including values derived by earlier nodes.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.features.get(key)
    }

    pub fn features(&self) -> &FeatureBag {
        &self.features
    }

    /// Publishes a derived feature (e.g. a score) for downstream nodes.
    pub fn set_feature(&mut self, key: impl Into<String>, value: Value) {
        self.features.insert(key.into(), value);
    }

    pub fn set_result(&mut self, node_id: impl Into<String>, result: NodeResult) {
        self.results.insert(node_id.into(), result);
    }

    pub fn result(&self, node_id: &str) -> Option<&NodeResult> {
        self.results.get(node_id)
    }

    /// Records entry into a node. Returns `true` if the node was already visited.
    pub fn mark_visited(&mut self, node_id: &str) -> bool {
        if !self.visited.insert(node_id.to_string()) {
            return true;
        }
        self.trail.push(node_id.to_string());
        self.current = Some(node_id.to_string());
        false
    }

    /// Visited node ids in the order they were entered.
    pub fn trail(&self) -> &[String] {
        &self.trail
    }

    pub fn current_node(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn add_hits<I: IntoIterator<Item = String>>(&mut self, hits: I) {
        self.hits.extend(hits);
    }

    pub fn hits(&self) -> &[String] {
        &self.hits
    }

    pub fn record(&mut self, step: TraversalStep) {
        self.trace.push(step);
    }

    pub fn trace(&self) -> &TraversalTrace {
        &self.trace
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}
