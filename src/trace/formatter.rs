use super::{TraversalStep, TraversalTrace};
use crate::value::Value;
use itertools::Itertools;

/// Formats traversal traces into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a traversal trace into a one-line explanation of the path taken.
    pub fn format_trace(trace: &TraversalTrace) -> String {
        if trace.is_empty() {
            return "No node evaluated".to_string();
        }
        trace.steps().iter().map(Self::format_step).join(" -> ")
    }

    fn format_step(step: &TraversalStep) -> String {
        match step {
            TraversalStep::Start { features, .. } => format!("start ({} features)", features),
            TraversalStep::Condition {
                feature,
                operator,
                threshold,
                value,
                outcome,
                ..
            } => format!(
                "${} (was {}) {} {} [{}]",
                feature,
                Self::format_value(value),
                operator,
                Self::format_value(threshold),
                outcome
            ),
            TraversalStep::Ruleset {
                node_id,
                hits,
                blocked_by,
            } => {
                let mut result = if hits.is_empty() {
                    format!("{}: no rule hit", node_id)
                } else {
                    format!("{}: hit {}", node_id, hits.join(", "))
                };
                if let Some(rule) = blocked_by {
                    result.push_str(&format!(" (blocked by {})", rule));
                }
                result
            }
            TraversalStep::Score { output, score, .. } => {
                format!("${} = {}", output, Self::format_value(score))
            }
            TraversalStep::Terminal {
                node_id, tag, label, ..
            } => {
                if label.is_empty() {
                    format!("end {} [{}]", node_id, tag)
                } else {
                    format!("end {} [{}: {}]", node_id, tag, label)
                }
            }
        }
    }

    /// Format a value for display, quoting text so `"35"` and `35` stay distinguishable.
    fn format_value(value: &Value) -> String {
        match value {
            Value::String(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}
