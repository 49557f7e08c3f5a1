//! Core data structures for the saved search store

pub mod entities;
pub mod errors;
pub mod graph;
pub mod identifiers;
pub mod trace_context;
pub mod visibility;

// Re-export all common types
pub use entities::{schema, SaveSearchRequest, SavedSearch, SavedSearchList, SearchParameters, User};
pub use errors::{CoreError, GraphStoreError};
pub use graph::{Edge, EdgeMutation, Property, PropertyValue, Vertex, VertexMutation};
pub use identifiers::{EdgeId, SavedSearchId, UserId, VertexId};
pub use trace_context::TraceContext;
pub use visibility::{Authorizations, Visibility};
