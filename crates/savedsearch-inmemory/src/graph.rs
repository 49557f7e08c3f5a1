//! In-memory property graph with visibility filtering and flush staging

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::mem;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use savedsearch_core::{
    Authorizations, Edge, EdgeId, EdgeMutation, GraphStore, GraphStoreError, Property, Vertex,
    VertexId, VertexMutation, Visibility,
};

/// What `add_edge` does when an identical `(out, in, label)` edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateEdgePolicy {
    /// The second edge is silently dropped.
    #[default]
    Ignore,
    /// `add_edge` fails with `GraphStoreError::DuplicateEdge`.
    Reject,
}

#[derive(Debug, Clone)]
enum PendingWrite {
    SaveVertex(VertexMutation),
    DeleteVertex {
        id: VertexId,
        authorizations: Authorizations,
    },
    AddEdge(Edge),
}

#[derive(Debug, Default)]
struct GraphState {
    vertices: HashMap<VertexId, Vertex>,
    // Insertion order is the order `get_out_edges` reports
    edges: Vec<Edge>,
}

impl GraphState {
    fn has_edge(&self, out_vertex_id: &VertexId, in_vertex_id: &VertexId, label: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|edge| edge.connects(out_vertex_id, in_vertex_id, label))
    }

    fn apply(&mut self, write: PendingWrite) {
        match write {
            PendingWrite::SaveVertex(mutation) => {
                let vertex = self
                    .vertices
                    .entry(mutation.id.clone())
                    .or_insert_with(|| Vertex {
                        id: mutation.id.clone(),
                        visibility: mutation.visibility.clone(),
                        properties: Vec::new(),
                    });
                for property in mutation.properties {
                    vertex.properties.retain(|existing| existing.name != property.name);
                    vertex.properties.push(property);
                }
            },
            PendingWrite::DeleteVertex { id, authorizations } => {
                let visible = self
                    .vertices
                    .get(&id)
                    .map(|vertex| authorizations.can_access(&vertex.visibility))
                    .unwrap_or(false);
                if !visible {
                    debug!(vertex_id = %id, "Delete of absent or invisible vertex ignored");
                    return;
                }
                self.vertices.remove(&id);
                self.edges
                    .retain(|edge| edge.out_vertex_id != id && edge.in_vertex_id != id);
            },
            PendingWrite::AddEdge(edge) => {
                if self.has_edge(&edge.out_vertex_id, &edge.in_vertex_id, &edge.label).is_some() {
                    debug!(out_vertex = %edge.out_vertex_id, in_vertex = %edge.in_vertex_id, label = %edge.label, "Duplicate edge dropped");
                    return;
                }
                if !self.vertices.contains_key(&edge.out_vertex_id) || !self.vertices.contains_key(&edge.in_vertex_id) {
                    warn!(edge_id = %edge.id, "Edge endpoint vanished before flush, edge dropped");
                    return;
                }
                self.edges.push(edge);
            },
        }
    }
}

/// A [`GraphStore`] kept entirely in memory.
///
/// Writes queue up in a pending list and are applied, in order, by
/// [`flush`](GraphStore::flush). Reads only see flushed state.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    state: RwLock<GraphState>,
    pending: Mutex<Vec<PendingWrite>>,
    duplicate_edges: DuplicateEdgePolicy,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_edge_policy(policy: DuplicateEdgePolicy) -> Self {
        Self {
            duplicate_edges: policy,
            ..Self::default()
        }
    }

    /// Number of writes waiting for a flush.
    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Flushed vertices, ignoring visibility.
    pub async fn vertex_count(&self) -> usize {
        self.state.read().await.vertices.len()
    }

    /// Flushed edges, ignoring visibility.
    pub async fn edge_count(&self) -> usize {
        self.state.read().await.edges.len()
    }

    fn ensure_writable(visibility: &Visibility, authorizations: &Authorizations) -> Result<(), GraphStoreError> {
        if authorizations.can_access(visibility) {
            Ok(())
        } else {
            Err(GraphStoreError::AuthorizationDenied {
                visibility: visibility.to_string(),
            })
        }
    }

    /// Whether `id` will exist and be visible once pending writes are applied.
    async fn vertex_will_exist(&self, id: &VertexId, authorizations: &Authorizations) -> bool {
        let mut exists = self
            .state
            .read()
            .await
            .vertices
            .get(id)
            .map(|vertex| authorizations.can_access(&vertex.visibility))
            .unwrap_or(false);

        for write in self.pending.lock().iter() {
            match write {
                PendingWrite::SaveVertex(mutation) if &mutation.id == id => exists = true,
                PendingWrite::DeleteVertex { id: deleted, .. } if deleted == id => exists = false,
                _ => {},
            }
        }
        exists
    }

    fn filter_vertex(vertex: &Vertex, authorizations: &Authorizations) -> Option<Vertex> {
        if !authorizations.can_access(&vertex.visibility) {
            return None;
        }
        let properties: Vec<Property> = vertex
            .properties
            .iter()
            .filter(|property| authorizations.can_access(&property.visibility))
            .cloned()
            .collect();
        Some(Vertex {
            id: vertex.id.clone(),
            visibility: vertex.visibility.clone(),
            properties,
        })
    }
}

#[async_trait]
impl GraphStore for InMemoryGraph {
    async fn save_vertex(
        &self,
        vertex: VertexMutation,
        authorizations: &Authorizations,
    ) -> Result<(), GraphStoreError> {
        if vertex.id.as_str().trim().is_empty() {
            return Err(GraphStoreError::InvalidInput("Vertex id must not be empty".to_string()));
        }
        for visibility in vertex.visibilities() {
            Self::ensure_writable(visibility, authorizations)?;
        }

        debug!(vertex_id = %vertex.id, properties = vertex.properties.len(), "Staging vertex write");
        self.pending.lock().push(PendingWrite::SaveVertex(vertex));
        Ok(())
    }

    async fn get_vertex(
        &self,
        id: &VertexId,
        authorizations: &Authorizations,
    ) -> Result<Option<Vertex>, GraphStoreError> {
        let state = self.state.read().await;
        Ok(state
            .vertices
            .get(id)
            .and_then(|vertex| Self::filter_vertex(vertex, authorizations)))
    }

    async fn delete_vertex(
        &self,
        id: &VertexId,
        authorizations: &Authorizations,
    ) -> Result<(), GraphStoreError> {
        debug!(vertex_id = %id, "Staging vertex delete");
        self.pending.lock().push(PendingWrite::DeleteVertex {
            id: id.clone(),
            authorizations: authorizations.clone(),
        });
        Ok(())
    }

    async fn add_edge(
        &self,
        edge: EdgeMutation,
        authorizations: &Authorizations,
    ) -> Result<EdgeId, GraphStoreError> {
        Self::ensure_writable(&edge.visibility, authorizations)?;

        for endpoint in [&edge.out_vertex_id, &edge.in_vertex_id] {
            if !self.vertex_will_exist(endpoint, authorizations).await {
                return Err(GraphStoreError::VertexNotFound(endpoint.to_string()));
            }
        }

        if let Some(existing) = self
            .state
            .read()
            .await
            .has_edge(&edge.out_vertex_id, &edge.in_vertex_id, &edge.label)
        {
            match self.duplicate_edges {
                DuplicateEdgePolicy::Ignore => return Ok(existing.id.clone()),
                DuplicateEdgePolicy::Reject => {
                    return Err(GraphStoreError::DuplicateEdge {
                        out_vertex_id: edge.out_vertex_id.to_string(),
                        in_vertex_id: edge.in_vertex_id.to_string(),
                        label: edge.label,
                    })
                },
            }
        }

        let id = EdgeId::new_v4();
        debug!(edge_id = %id, label = %edge.label, "Staging edge write");
        self.pending.lock().push(PendingWrite::AddEdge(Edge {
            id: id.clone(),
            out_vertex_id: edge.out_vertex_id,
            in_vertex_id: edge.in_vertex_id,
            label: edge.label,
            visibility: edge.visibility,
        }));
        Ok(id)
    }

    async fn get_out_edges(
        &self,
        vertex_id: &VertexId,
        label: &str,
        authorizations: &Authorizations,
    ) -> Result<Vec<Edge>, GraphStoreError> {
        let state = self.state.read().await;
        let visible_source = state
            .vertices
            .get(vertex_id)
            .map(|vertex| authorizations.can_access(&vertex.visibility))
            .unwrap_or(false);
        if !visible_source {
            return Ok(Vec::new());
        }

        Ok(state
            .edges
            .iter()
            .filter(|edge| {
                &edge.out_vertex_id == vertex_id
                    && edge.label == label
                    && authorizations.can_access(&edge.visibility)
            })
            .cloned()
            .collect())
    }

    async fn flush(&self) -> Result<(), GraphStoreError> {
        let writes = mem::take(&mut *self.pending.lock());
        if writes.is_empty() {
            return Ok(());
        }

        let mut state = self.state.write().await;
        debug!(writes = writes.len(), "Flushing staged writes");
        for write in writes {
            state.apply(write);
        }
        Ok(())
    }
}
