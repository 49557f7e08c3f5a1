use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::SearchStoreConfig,
    data::{
        entities::{encode_parameters, schema},
        Authorizations, CoreError, EdgeMutation, GraphStoreError, SaveSearchRequest, SavedSearch,
        SavedSearchId, TraceContext, User, VertexId, VertexMutation, Visibility,
    },
    traits::{GraphStore, UserDirectory},
};

/// Persists saved searches as vertices owned by user vertices.
///
/// Every property and ownership edge is written at one fixed visibility
/// taken from [`SearchStoreConfig::visibility`]. The store keeps no state of
/// its own; isolation between concurrent callers is whatever the
/// [`GraphStore`] provides.
///
/// `save_search` is two writes (vertex, then ownership edge) each followed by
/// a flush. A failure between them can leave a vertex with no owner edge;
/// retrying the whole call is safe because both steps are idempotent.
pub struct SavedSearchStore {
    graph: Arc<dyn GraphStore>,
    users: Arc<dyn UserDirectory>,
    visibility: Visibility,
    user_visibility: Visibility,
}

impl SavedSearchStore {
    pub fn new(
        graph: Arc<dyn GraphStore>,
        users: Arc<dyn UserDirectory>,
        config: &SearchStoreConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self {
            graph,
            users,
            visibility: config.search_visibility()?,
            user_visibility: Visibility::parse(&config.user_visibility)?,
        })
    }

    /// The visibility saved searches are written at.
    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Asks the user directory for an authorization set covering saved
    /// searches and user vertices.
    #[instrument(skip(self), fields(user_id = %user.user_id))]
    pub async fn user_authorizations(&self, user: &User) -> Result<Authorizations, CoreError> {
        let labels: Vec<String> = self
            .visibility
            .required_labels()
            .chain(self.user_visibility.required_labels())
            .map(str::to_string)
            .collect();
        self.users.authorizations(user, &labels).await
    }

    /// Creates or updates a saved search owned by `user` and returns its id.
    ///
    /// A missing or blank `request.id` gets a freshly generated id.
    #[instrument(
        skip(self, authorizations, trace_ctx, request),
        fields(user_id = %user.user_id, trace_id = %trace_ctx.trace_id, search_id = tracing::field::Empty)
    )]
    pub async fn save_search(
        &self,
        user: &User,
        authorizations: &Authorizations,
        trace_ctx: &TraceContext,
        request: SaveSearchRequest,
    ) -> Result<SavedSearchId, CoreError> {
        let trace_ctx = trace_ctx.child_for("save_search");
        self.ensure_writable(authorizations)?;

        let user_vertex_id = self
            .resolve_user_vertex(user, authorizations, &trace_ctx)
            .await?
            .ok_or_else(|| CoreError::not_found("User", user.user_id.to_string()))?;

        let id = SavedSearchId::from_optional(request.id.as_deref())
            .unwrap_or_else(SavedSearchId::new_v4);
        tracing::Span::current().record("search_id", tracing::field::display(&id));

        let existing = self
            .graph
            .get_vertex(&VertexId::from(&id), authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to load saved search vertex", Some(&trace_ctx), e))?;
        if let Some(vertex) = existing {
            if !SavedSearch::is_saved_search(&vertex) {
                warn!(vertex_id = %vertex.id, "Refusing to overwrite a vertex that is not a saved search");
                return Err(CoreError::ValidationError(format!(
                    "Vertex {} exists and is not a saved search",
                    id
                )));
            }
        }

        let parameters = encode_parameters(&request.parameters)?;
        let vertex = VertexMutation::new(VertexId::from(&id), self.visibility.clone())
            .set_property(schema::CONCEPT_TYPE, schema::CONCEPT_TYPE_SAVED_SEARCH, self.visibility.clone())
            .set_property(schema::NAME, request.name, self.visibility.clone())
            .set_property(schema::URL, request.url, self.visibility.clone())
            .set_property(schema::PARAMETERS, parameters, self.visibility.clone());

        self.graph
            .save_vertex(vertex, authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to write saved search vertex", Some(&trace_ctx), e))?;
        self.flush(&trace_ctx).await?;

        self.ensure_ownership_edge(&user_vertex_id, &id, authorizations, &trace_ctx)
            .await?;
        self.flush(&trace_ctx).await?;

        info!(search_id = %id, "Saved search stored");
        Ok(id)
    }

    /// Every saved search reachable from `user`'s vertex under `authorizations`,
    /// in the graph's edge order.
    ///
    /// An unknown user yields an empty list.
    #[instrument(skip(self, authorizations, trace_ctx), fields(user_id = %user.user_id, trace_id = %trace_ctx.trace_id))]
    pub async fn get_saved_searches(
        &self,
        user: &User,
        authorizations: &Authorizations,
        trace_ctx: &TraceContext,
    ) -> Result<Vec<SavedSearch>, CoreError> {
        let trace_ctx = trace_ctx.child_for("get_saved_searches");

        let Some(user_vertex_id) = self.resolve_user_vertex(user, authorizations, &trace_ctx).await? else {
            debug!("User vertex not visible, returning no saved searches");
            return Ok(Vec::new());
        };

        let edges = self
            .graph
            .get_out_edges(&user_vertex_id, schema::HAS_SAVED_SEARCH, authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to load ownership edges", Some(&trace_ctx), e))?;

        let mut searches = Vec::with_capacity(edges.len());
        for edge in &edges {
            let search_vertex_id = edge.other_vertex_id(&user_vertex_id);
            let vertex = self
                .graph
                .get_vertex(search_vertex_id, authorizations)
                .await
                .map_err(|e| CoreError::store_error_with_context("Failed to load saved search vertex", Some(&trace_ctx), e))?;

            let Some(vertex) = vertex else {
                continue;
            };

            match SavedSearch::from_vertex(&vertex)? {
                Some(search) => searches.push(search),
                None => warn!(vertex_id = %vertex.id, "Ownership edge points at a vertex that is not a saved search"),
            }
        }

        debug!(count = searches.len(), "Loaded saved searches");
        Ok(searches)
    }

    /// Fetches a saved search by id.
    ///
    /// Ownership is not checked here: any caller whose authorizations can
    /// read the vertex gets it back, so the id acts as the capability.
    #[instrument(skip(self, authorizations, trace_ctx), fields(user_id = %user.user_id, search_id = %id, trace_id = %trace_ctx.trace_id))]
    pub async fn get_saved_search(
        &self,
        id: &SavedSearchId,
        user: &User,
        authorizations: &Authorizations,
        trace_ctx: &TraceContext,
    ) -> Result<Option<SavedSearch>, CoreError> {
        let trace_ctx = trace_ctx.child_for("get_saved_search");

        let vertex = self
            .graph
            .get_vertex(&VertexId::from(id), authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to load saved search vertex", Some(&trace_ctx), e))?;

        match vertex {
            Some(vertex) => SavedSearch::from_vertex(&vertex),
            None => Ok(None),
        }
    }

    /// Deletes a saved search together with its ownership edge.
    ///
    /// Deleting an id that does not exist succeeds, as does deleting an id
    /// that names some other kind of vertex, which is left untouched.
    #[instrument(skip(self, authorizations, trace_ctx), fields(user_id = %user.user_id, search_id = %id, trace_id = %trace_ctx.trace_id))]
    pub async fn delete_search(
        &self,
        id: &SavedSearchId,
        user: &User,
        authorizations: &Authorizations,
        trace_ctx: &TraceContext,
    ) -> Result<(), CoreError> {
        let trace_ctx = trace_ctx.child_for("delete_search");
        self.ensure_writable(authorizations)?;

        let vertex_id = VertexId::from(id);
        let existing = self
            .graph
            .get_vertex(&vertex_id, authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to load saved search vertex", Some(&trace_ctx), e))?;
        match existing {
            Some(vertex) if SavedSearch::is_saved_search(&vertex) => {},
            Some(_) => {
                debug!("Vertex is not a saved search, nothing to delete");
                return Ok(());
            },
            None => {
                debug!("Saved search absent, nothing to delete");
                return Ok(());
            },
        }

        self.graph
            .delete_vertex(&vertex_id, authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to delete saved search vertex", Some(&trace_ctx), e))?;
        self.flush(&trace_ctx).await?;

        info!(search_id = %id, "Saved search deleted");
        Ok(())
    }

    fn ensure_writable(&self, authorizations: &Authorizations) -> Result<(), CoreError> {
        if authorizations.can_access(&self.visibility) {
            Ok(())
        } else {
            warn!(visibility = %self.visibility, "Authorizations do not cover saved search visibility");
            Err(CoreError::authorization_denied(self.visibility.as_str()))
        }
    }

    /// The user's vertex id, provided the vertex is visible under `authorizations`.
    async fn resolve_user_vertex(
        &self,
        user: &User,
        authorizations: &Authorizations,
        trace_ctx: &TraceContext,
    ) -> Result<Option<VertexId>, CoreError> {
        let Some(vertex_id) = self.users.user_vertex_id(user).await? else {
            return Ok(None);
        };

        let vertex = self
            .graph
            .get_vertex(&vertex_id, authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to load user vertex", Some(trace_ctx), e))?;

        Ok(vertex.map(|vertex| vertex.id))
    }

    /// Adds the ownership edge unless one already links the pair. A store that
    /// reports the edge as a duplicate (a concurrent save won the race) counts
    /// as success.
    async fn ensure_ownership_edge(
        &self,
        user_vertex_id: &VertexId,
        search_id: &SavedSearchId,
        authorizations: &Authorizations,
        trace_ctx: &TraceContext,
    ) -> Result<(), CoreError> {
        let search_vertex_id = VertexId::from(search_id);
        let existing = self
            .graph
            .get_out_edges(user_vertex_id, schema::HAS_SAVED_SEARCH, authorizations)
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to load ownership edges", Some(trace_ctx), e))?;

        if existing.iter().any(|edge| edge.in_vertex_id == search_vertex_id) {
            debug!("Ownership edge already present");
            return Ok(());
        }

        let edge = EdgeMutation {
            out_vertex_id: user_vertex_id.clone(),
            in_vertex_id: search_vertex_id,
            label: schema::HAS_SAVED_SEARCH.to_string(),
            visibility: self.visibility.clone(),
        };

        match self.graph.add_edge(edge, authorizations).await {
            Ok(edge_id) => {
                debug!(edge_id = %edge_id, "Ownership edge created");
                Ok(())
            },
            Err(GraphStoreError::DuplicateEdge { .. }) => {
                debug!("Ownership edge created concurrently");
                Ok(())
            },
            Err(e) => Err(CoreError::store_error_with_context("Failed to add ownership edge", Some(trace_ctx), e)),
        }
    }

    async fn flush(&self, trace_ctx: &TraceContext) -> Result<(), CoreError> {
        self.graph
            .flush()
            .await
            .map_err(|e| CoreError::store_error_with_context("Failed to flush graph", Some(trace_ctx), e))
    }
}
