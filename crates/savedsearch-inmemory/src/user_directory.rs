//! In-memory user directory

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

use savedsearch_core::{
    Authorizations, CoreError, GraphStore, GraphStoreError, User, UserDirectory, UserId, VertexId,
    VertexMutation, Visibility,
};

/// Property holding a user's display name on its vertex.
pub const DISPLAY_NAME: &str = "user#displayName";

#[derive(Debug, Clone)]
struct UserRecord {
    vertex_id: VertexId,
    labels: Authorizations,
}

/// Maps principals to their user vertex and granted labels.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user whose vertex already exists in the graph.
    pub fn register<I, S>(&self, user_id: UserId, vertex_id: VertexId, labels: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        debug!(user_id = %user_id, vertex_id = %vertex_id, "Registering user");
        self.users.write().insert(
            user_id,
            UserRecord {
                vertex_id,
                labels: Authorizations::new(labels),
            },
        );
    }

    /// Creates the user's vertex at `visibility`, flushes it and registers the user.
    ///
    /// The vertex id is the user id.
    pub async fn create_user<I, S>(
        &self,
        graph: &dyn GraphStore,
        user: &User,
        visibility: &Visibility,
        labels: I,
    ) -> Result<VertexId, GraphStoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vertex_id = VertexId(user.user_id.0.clone());
        let granted = Authorizations::new(labels);
        let writer = granted.merged(&Authorizations::new(visibility.required_labels()));

        let mut vertex = VertexMutation::new(vertex_id.clone(), visibility.clone());
        if let Some(display_name) = &user.display_name {
            vertex = vertex.set_property(DISPLAY_NAME, display_name.as_str(), visibility.clone());
        }
        graph.save_vertex(vertex, &writer).await?;
        graph.flush().await?;

        self.users.write().insert(
            user.user_id.clone(),
            UserRecord {
                vertex_id: vertex_id.clone(),
                labels: granted,
            },
        );
        info!(user_id = %user.user_id, "User created");
        Ok(vertex_id)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn user_vertex_id(&self, user: &User) -> Result<Option<VertexId>, CoreError> {
        Ok(self
            .users
            .read()
            .get(&user.user_id)
            .map(|record| record.vertex_id.clone()))
    }

    async fn authorizations(
        &self,
        user: &User,
        additional_labels: &[String],
    ) -> Result<Authorizations, CoreError> {
        let granted = self
            .users
            .read()
            .get(&user.user_id)
            .map(|record| record.labels.clone())
            .unwrap_or_else(Authorizations::empty);
        Ok(granted.merged(&Authorizations::new(additional_labels.iter().cloned())))
    }
}
