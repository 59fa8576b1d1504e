//! Decision graphs: definitions, construction and the immutable node arena.

use crate::node::Node;
use ahash::AHashMap;

mod builder;
mod conversion;
mod definition;

pub use builder::GraphBuilder;
pub use conversion::IntoGraph;
pub use definition::{EdgeDefinition, GraphDefinition, NodeDefinition};

use crate::error::GraphError;

/// Where a traversal may go after a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Successors {
    Terminal,
    Next(usize),
    Branch { on_true: usize, on_false: usize },
}

impl Successors {
    pub fn targets(&self) -> impl Iterator<Item = usize> {
        let (a, b) = match *self {
            Successors::Terminal => (None, None),
            Successors::Next(next) => (Some(next), None),
            Successors::Branch { on_true, on_false } => (Some(on_true), Some(on_false)),
        };
        a.into_iter().chain(b)
    }
}

/// A validated, acyclic decision graph.
///
/// Nodes live in an arena addressed by index; edges are stored as indices into it.
/// A graph never changes after it is built and can be shared between threads.
#[derive(Debug)]
pub struct Graph {
    pub(crate) nodes: Vec<Box<dyn Node>>,
    pub(crate) index: AHashMap<String, usize>,
    pub(crate) successors: Vec<Successors>,
    pub(crate) start: usize,
}

impl Graph {
    pub fn builder(definition: GraphDefinition) -> GraphBuilder {
        GraphBuilder::new(definition)
    }

    /// Builds a graph from any format convertible into a [`GraphDefinition`].
    pub fn from_definition<T: IntoGraph>(source: T) -> Result<Self, GraphError> {
        GraphBuilder::new(source.into_graph()?).build()
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Self::from_definition(GraphDefinition::from_json(json)?)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn node(&self, index: usize) -> &dyn Node {
        self.nodes[index].as_ref()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&dyn Node> {
        self.index.get(id).map(|&i| self.node(i))
    }

    pub fn successors(&self, index: usize) -> Successors {
        self.successors[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
