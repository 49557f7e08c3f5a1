//! Error types for the saved search store

use thiserror::Error;
use crate::data::TraceContext;

/// Errors surfaced by [`SavedSearchStore`](crate::services::SavedSearchStore) operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Authorization denied: visibility {visibility:?} is not granted")]
    AuthorizationDenied { visibility: String },

    #[error("Entity not found: type={entity_type} id={id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    #[error("Parameter encoding error: {0}")]
    EncodingError(#[from] serde_json::Error),

    #[error("Graph store error with context: {message}")]
    GraphStoreWithContext {
        message: String,
        trace_id: Option<String>,
        #[source]
        source: Option<GraphStoreError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// Wraps a graph store failure, keeping authorization failures distinguishable.
    pub fn store_error_with_context(
        message: impl Into<String>,
        trace_ctx: Option<&TraceContext>,
        source: GraphStoreError,
    ) -> Self {
        if let GraphStoreError::AuthorizationDenied { visibility } = source {
            return CoreError::AuthorizationDenied { visibility };
        }
        CoreError::GraphStoreWithContext {
            message: message.into(),
            trace_id: trace_ctx.map(|ctx| ctx.trace_id.clone()),
            source: Some(source),
        }
    }

    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn authorization_denied(visibility: impl Into<String>) -> Self {
        CoreError::AuthorizationDenied {
            visibility: visibility.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}

/// Errors reported by a [`GraphStore`](crate::traits::GraphStore) implementation.
#[derive(Error, Debug)]
pub enum GraphStoreError {
    #[error("Write denied at visibility {visibility:?}")]
    AuthorizationDenied { visibility: String },
    #[error("Edge {label} from {out_vertex_id} to {in_vertex_id} already exists")]
    DuplicateEdge {
        out_vertex_id: String,
        in_vertex_id: String,
        label: String,
    },
    #[error("Vertex not found: {0}")]
    VertexNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unknown graph store error: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_display() {
        let error = CoreError::not_found("SavedSearch", "SS1");
        assert_eq!(format!("{}", error), "Entity not found: type=SavedSearch id=SS1");
    }

    #[test]
    fn test_graph_store_error_display() {
        let error = GraphStoreError::DuplicateEdge {
            out_vertex_id: "USER123".into(),
            in_vertex_id: "SS1".into(),
            label: "hasSavedSearch".into(),
        };
        assert_eq!(
            format!("{}", error),
            "Edge hasSavedSearch from USER123 to SS1 already exists"
        );
    }

    #[test]
    fn test_store_error_keeps_authorization_denied() {
        let trace_ctx = TraceContext::new_root();
        let error = CoreError::store_error_with_context(
            "save failed",
            Some(&trace_ctx),
            GraphStoreError::AuthorizationDenied { visibility: "search".into() },
        );

        match error {
            CoreError::AuthorizationDenied { visibility } => assert_eq!(visibility, "search"),
            other => panic!("Expected AuthorizationDenied, got {:?}", other),
        }
    }

    #[test]
    fn test_store_error_with_context_records_trace() {
        let trace_ctx = TraceContext::new_root();
        let error = CoreError::store_error_with_context(
            "flush failed",
            Some(&trace_ctx),
            GraphStoreError::Unknown("disk full".into()),
        );

        match error {
            CoreError::GraphStoreWithContext { message, trace_id, source } => {
                assert_eq!(message, "flush failed");
                assert_eq!(trace_id, Some(trace_ctx.trace_id.clone()));
                assert!(matches!(source, Some(GraphStoreError::Unknown(_))));
            },
            other => panic!("Expected GraphStoreWithContext, got {:?}", other),
        }
    }
}
