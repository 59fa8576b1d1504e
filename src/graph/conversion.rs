use super::definition::GraphDefinition;
use crate::error::GraphError;

/// A trait for custom rule formats that can be converted into a `GraphDefinition`.
///
/// Storage and authoring of rule graphs live outside the engine. Implementing this
/// trait on your own configuration structs is the translation layer between such a
/// format and the graph builder.
///
/// # Example
///
/// ```rust,no_run
/// use shinsa::prelude::*;
///
/// struct Step { id: String, kind: String }
/// struct Flow { steps: Vec<Step>, links: Vec<(String, String)> }
///
/// impl IntoGraph for Flow {
///     fn into_graph(self) -> std::result::Result<GraphDefinition, GraphError> {
///         let nodes = self
///             .steps
///             .into_iter()
///             .map(|step| NodeDefinition {
///                 name: step.id.clone(),
///                 id: step.id,
///                 kind: step.kind,
///                 tag: String::new(),
///                 label: String::new(),
///                 config: serde_json::Value::Null,
///             })
///             .collect();
///         let edges = self
///             .links
///             .into_iter()
///             .map(|(source, target)| EdgeDefinition { source, target, branch: None })
///             .collect();
///         Ok(GraphDefinition { nodes, edges })
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into an engine graph definition.
    fn into_graph(self) -> Result<GraphDefinition, GraphError>;
}

impl IntoGraph for GraphDefinition {
    fn into_graph(self) -> Result<GraphDefinition, GraphError> {
        Ok(self)
    }
}
