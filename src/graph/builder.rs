use super::definition::{EdgeDefinition, GraphDefinition, NodeDefinition};
use super::{Graph, Successors};
use crate::error::GraphError;
use crate::node::{
    ConditionNode, EndNode, Node, NodeInfo, NodeType, RulesetNode, ScorecardNode, StartNode,
};
use ahash::AHashMap;
use itertools::Itertools;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use tracing::debug;

/// Validates a [`GraphDefinition`] and turns it into an executable [`Graph`].
pub struct GraphBuilder {
    definition: GraphDefinition,
    aliases: AHashMap<String, NodeType>,
}

impl GraphBuilder {
    pub fn new(definition: GraphDefinition) -> Self {
        Self {
            definition,
            aliases: AHashMap::new(),
        }
    }

    /// Maps a kind name used by an external format onto a built-in kind.
    /// Unknown built-in names are ignored, so the alias later fails as an invalid kind.
    pub fn with_kind_alias(mut self, user_kind: &str, builtin_kind: &str) -> Self {
        if let Some(kind) = NodeType::resolve(builtin_kind) {
            self.aliases.insert(user_kind.to_ascii_lowercase(), kind);
        }
        self
    }

    fn resolve_kind(&self, node: &NodeDefinition) -> Result<NodeType, GraphError> {
        self.aliases
            .get(&node.kind.trim().to_ascii_lowercase())
            .copied()
            .or_else(|| NodeType::resolve(&node.kind))
            .ok_or_else(|| GraphError::InvalidNodeType {
                node_id: node.id.clone(),
                kind: node.kind.clone(),
            })
    }

    pub fn build(self) -> Result<Graph, GraphError> {
        let GraphDefinition { nodes, edges } = &self.definition;

        if let Some(duplicate) = nodes.iter().map(|n| n.id.as_str()).duplicates().next() {
            return Err(GraphError::DuplicateNode(duplicate.to_string()));
        }

        let kinds: Vec<NodeType> = nodes
            .iter()
            .map(|node| self.resolve_kind(node))
            .collect::<Result<_, _>>()?;

        let starts: Vec<usize> = kinds
            .iter()
            .positions(|kind| *kind == NodeType::Start)
            .collect();
        let start = match starts.as_slice() {
            [] => return Err(GraphError::MissingStart),
            [single] => *single,
            many => {
                return Err(GraphError::MultipleStart(
                    many.iter().map(|&i| nodes[i].id.clone()).collect(),
                ));
            }
        };

        let index: AHashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();

        let mut outgoing: Vec<Vec<(usize, Option<bool>)>> = vec![Vec::new(); nodes.len()];
        for edge in edges {
            let source = lookup(&index, &edge.source, edge)?;
            let target = lookup(&index, &edge.target, edge)?;
            if target == start {
                return Err(GraphError::InvalidEdges {
                    node_id: edge.target.clone(),
                    message: format!("start node cannot be entered from '{}'", edge.source),
                });
            }
            outgoing[source].push((target, edge.branch));
        }

        let successors = outgoing
            .iter()
            .zip(&kinds)
            .zip(nodes)
            .map(|((out, kind), node)| successors_for(node, *kind, out))
            .collect::<Result<Vec<_>, _>>()?;

        check_acyclic(nodes, &successors)?;

        let built = nodes
            .iter()
            .zip(&kinds)
            .map(|(node, kind)| create_node(node, *kind))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(nodes = built.len(), edges = edges.len(), "Graph built");

        Ok(Graph {
            nodes: built,
            index,
            successors,
            start,
        })
    }
}

fn lookup(
    index: &AHashMap<String, usize>,
    id: &str,
    edge: &EdgeDefinition,
) -> Result<usize, GraphError> {
    index
        .get(id)
        .copied()
        .ok_or_else(|| GraphError::NodeNotFound {
            missing_node_id: id.to_string(),
            edge: format!("{} -> {}", edge.source, edge.target),
        })
}

/// Checks a node's outgoing edges against what its kind allows.
fn successors_for(
    node: &NodeDefinition,
    kind: NodeType,
    out: &[(usize, Option<bool>)],
) -> Result<Successors, GraphError> {
    let invalid = |message: String| GraphError::InvalidEdges {
        node_id: node.id.clone(),
        message,
    };

    match kind {
        NodeType::End => match out {
            [] => Ok(Successors::Terminal),
            _ => Err(invalid("end node cannot have outgoing edges".to_string())),
        },
        NodeType::Condition => {
            let on_true = out.iter().filter(|(_, b)| *b == Some(true)).collect_vec();
            let on_false = out.iter().filter(|(_, b)| *b == Some(false)).collect_vec();
            match (on_true.as_slice(), on_false.as_slice()) {
                ([(t, _)], [(f, _)]) if out.len() == 2 => Ok(Successors::Branch {
                    on_true: *t,
                    on_false: *f,
                }),
                _ => Err(invalid(format!(
                    "condition needs exactly one true and one false edge, found {}",
                    out.len()
                ))),
            }
        }
        _ => match out {
            [(next, None)] => Ok(Successors::Next(*next)),
            [(_, Some(_))] => Err(invalid(format!("{} edges cannot carry a branch", kind))),
            _ => Err(invalid(format!(
                "{} node needs exactly one outgoing edge, found {}",
                kind,
                out.len()
            ))),
        },
    }
}

/// Kahn's topological sort; nodes left with incoming edges sit on a cycle.
fn check_acyclic(nodes: &[NodeDefinition], successors: &[Successors]) -> Result<(), GraphError> {
    let mut in_degree = vec![0usize; nodes.len()];
    for succ in successors {
        for target in succ.targets() {
            in_degree[target] += 1;
        }
    }

    let mut queue: VecDeque<usize> = in_degree.iter().positions(|d| *d == 0).collect();
    let mut sorted = 0;
    while let Some(current) = queue.pop_front() {
        sorted += 1;
        for target in successors[current].targets() {
            in_degree[target] -= 1;
            if in_degree[target] == 0 {
                queue.push_back(target);
            }
        }
    }

    if sorted == nodes.len() {
        return Ok(());
    }

    // Leftovers also include nodes merely downstream of a cycle; peel those off
    // until only nodes with a successor inside the set remain.
    let mut remaining: Vec<bool> = in_degree.iter().map(|d| *d > 0).collect();
    loop {
        let dead_ends = (0..nodes.len())
            .filter(|&i| remaining[i] && !successors[i].targets().any(|t| remaining[t]))
            .collect_vec();
        if dead_ends.is_empty() {
            break;
        }
        for i in dead_ends {
            remaining[i] = false;
        }
    }

    let cyclic = remaining
        .iter()
        .positions(|on_cycle| *on_cycle)
        .map(|i| nodes[i].id.clone())
        .sorted()
        .collect();
    Err(GraphError::Cycle(cyclic))
}

fn parse_config<T: DeserializeOwned>(node: &NodeDefinition) -> Result<T, GraphError> {
    serde_json::from_value(node.config.clone()).map_err(|e| GraphError::InvalidConfig {
        node_id: node.id.clone(),
        message: e.to_string(),
    })
}

fn create_node(node: &NodeDefinition, kind: NodeType) -> Result<Box<dyn Node>, GraphError> {
    let info = NodeInfo {
        id: node.id.clone(),
        name: if node.name.is_empty() {
            node.id.clone()
        } else {
            node.name.clone()
        },
        kind: node.kind.clone(),
        tag: node.tag.clone(),
        label: node.label.clone(),
    };

    let built: Box<dyn Node> = match kind {
        NodeType::Start => Box::new(StartNode::new(info)),
        NodeType::End => Box::new(EndNode::new(info)),
        NodeType::Condition => Box::new(ConditionNode::new(info, parse_config(node)?)?),
        NodeType::Ruleset => Box::new(RulesetNode::new(info, parse_config(node)?)?),
        NodeType::Scorecard => Box::new(ScorecardNode::new(info, parse_config(node)?)?),
    };
    Ok(built)
}
