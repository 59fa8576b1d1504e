//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the shinsa crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use shinsa::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<()> {
//! let graph_json = std::fs::read_to_string("path/to/graph.json")?;
//! let executor = Executor::new(Arc::new(Graph::from_json(&graph_json)?));
//!
//! let features: FeatureBag = serde_json::from_str(r#"{"age": "35"}"#)?;
//! let decision = executor.execute(features)?;
//! println!("Decision: {:?}", decision);
//! # Ok(())
//! # }
//! ```

// Graph construction and execution
pub use crate::executor::{Decision, Executor, execute};
pub use crate::graph::{
    EdgeDefinition, Graph, GraphBuilder, GraphDefinition, IntoGraph, NodeDefinition,
};

// Nodes and traversal state
pub use crate::context::PipelineContext;
pub use crate::node::{Node, NodeInfo, NodeResult, NodeType, Predicate};

// Values
pub use crate::value::{FeatureBag, Operator, SemanticType, Value, classify, types_match};

// Error types
pub use crate::error::{EngineError, GraphError, ValueError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
