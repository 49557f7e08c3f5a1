//! Request tracing identifiers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlates the graph calls made on behalf of one API request.
///
/// The store derives a child context per operation so log lines from the
/// vertex write and the edge write of a single save share a `trace_id` but
/// can still be told apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl TraceContext {
    pub fn new_root() -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string(),
            span_id: Uuid::new_v4().to_string(),
            parent_id: None,
            operation: None,
        }
    }

    /// Child span labelled with the store operation it covers.
    pub fn child_for(&self, operation: &str) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: Uuid::new_v4().to_string(),
            parent_id: Some(self.span_id.clone()),
            operation: Some(operation.to_string()),
        }
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_for_keeps_trace_id() {
        let root = TraceContext::new_root();
        let child = root.child_for("save_search");

        assert_eq!(root.trace_id, child.trace_id);
        assert_ne!(root.span_id, child.span_id);
        assert_eq!(child.parent_id.as_deref(), Some(root.span_id.as_str()));
        assert_eq!(child.operation.as_deref(), Some("save_search"));
    }

    #[test]
    fn test_root_omits_operation_when_serialized() {
        let root = TraceContext::new_root();
        let json = serde_json::to_value(&root).unwrap();
        assert!(json.get("operation").is_none());
    }
}
