//! Saved search storage over a visibility-scoped property graph

// Core modules
pub mod config;
pub mod data;
pub mod services;
pub mod traits;

// Testing utilities
pub mod test_utils;

// Re-export key types for convenient usage
pub use config::SearchStoreConfig;
pub use data::errors::{CoreError, GraphStoreError};
pub use data::identifiers::{EdgeId, SavedSearchId, UserId, VertexId};
pub use data::trace_context::TraceContext;
pub use data::visibility::{Authorizations, Visibility};
pub use data::graph::{Edge, EdgeMutation, Property, PropertyValue, Vertex, VertexMutation};
pub use data::entities::{schema, SaveSearchRequest, SavedSearch, SavedSearchList, SearchParameters, User};

// Re-export core traits
pub use traits::{GraphStore, UserDirectory};

// Re-export core services
pub use services::SavedSearchStore;

/// Initialize tracing, honouring `RUST_LOG` and falling back to `default_level`
pub fn init_tracing(default_level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second initialization (e.g. from tests) is not an error
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}
