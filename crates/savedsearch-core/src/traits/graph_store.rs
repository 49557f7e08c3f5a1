//! GraphStore trait definition for property graph interaction

use async_trait::async_trait;

use crate::data::{
    errors::GraphStoreError,
    graph::{Edge, EdgeMutation, Vertex, VertexMutation},
    identifiers::{EdgeId, VertexId},
    visibility::Authorizations,
};

/// Durable property graph shared by every tenant.
///
/// Writes are staged and become visible to reads only after [`flush`](GraphStore::flush).
/// Reads never fail because of visibility: anything the authorizations do
/// not grant is simply absent from the result.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Creates the vertex if absent, otherwise replaces the named properties in place.
    ///
    /// Fails with `AuthorizationDenied` if any visibility written is not granted.
    async fn save_vertex(
        &self,
        vertex: VertexMutation,
        authorizations: &Authorizations,
    ) -> Result<(), GraphStoreError>;

    async fn get_vertex(
        &self,
        id: &VertexId,
        authorizations: &Authorizations,
    ) -> Result<Option<Vertex>, GraphStoreError>;

    /// Removes the vertex and every edge incident to it. Absent ids are a no-op.
    async fn delete_vertex(
        &self,
        id: &VertexId,
        authorizations: &Authorizations,
    ) -> Result<(), GraphStoreError>;

    /// Adds a directed edge.
    ///
    /// Implementations either ignore an edge identical in `(out, in, label)` to
    /// an existing one or report it as `DuplicateEdge`.
    async fn add_edge(
        &self,
        edge: EdgeMutation,
        authorizations: &Authorizations,
    ) -> Result<EdgeId, GraphStoreError>;

    /// Outgoing edges of `vertex_id` carrying `label`, in a stable order.
    async fn get_out_edges(
        &self,
        vertex_id: &VertexId,
        label: &str,
        authorizations: &Authorizations,
    ) -> Result<Vec<Edge>, GraphStoreError>;

    /// Makes every staged write durable and visible.
    async fn flush(&self) -> Result<(), GraphStoreError>;
}
