//! # Shinsa - Risk Decision Engine
//!
//! **Shinsa** evaluates a configured graph of typed nodes against the feature data of
//! a single request and produces a terminal decision: a tag such as `accept`,
//! `reject` or `review`, with a label and the path that led there.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the graph**: Load your rule format into a [`graph::GraphDefinition`],
//!     either straight from JSON or by implementing [`graph::IntoGraph`] for your own structs.
//! 2.  **Build**: [`graph::Graph::builder`] resolves node kinds, parses node configuration,
//!     and rejects malformed graphs (missing or duplicate start, dangling edges, cycles).
//! 3.  **Execute**: Wrap the graph in an [`executor::Executor`] and run it against feature
//!     bags. Feature values are loosely typed; `"35"` compares with `30` as two integers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shinsa::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<()> {
//!     let graph = Graph::from_json(
//!         r#"{
//!             "nodes": [
//!                 {"id": "start", "kind": "start"},
//!                 {"id": "adult", "kind": "condition",
//!                  "config": {"feature": "age", "operator": ">", "threshold": 30}},
//!                 {"id": "pass", "kind": "end", "tag": "accept"},
//!                 {"id": "deny", "kind": "end", "tag": "reject", "label": "too young"}
//!             ],
//!             "edges": [
//!                 {"source": "start", "target": "adult"},
//!                 {"source": "adult", "target": "pass", "branch": true},
//!                 {"source": "adult", "target": "deny", "branch": false}
//!             ]
//!         }"#,
//!     )?;
//!     let executor = Executor::new(Arc::new(graph));
//!
//!     let mut features = FeatureBag::new();
//!     features.insert("age".to_string(), Value::from("35"));
//!
//!     let decision = executor.execute(features)?;
//!     println!("-> {} ({})", decision.tag, decision.reason);
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod error;
pub mod executor;
pub mod graph;
pub mod node;
pub mod prelude;
pub mod trace;
pub mod value;
