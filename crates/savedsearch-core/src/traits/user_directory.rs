//! UserDirectory trait definition

use async_trait::async_trait;

use crate::data::{
    entities::User,
    errors::CoreError,
    identifiers::VertexId,
    visibility::Authorizations,
};

/// External directory that owns user vertices and the labels users are granted.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolves a principal to the id of its user vertex, if it has one.
    async fn user_vertex_id(&self, user: &User) -> Result<Option<VertexId>, CoreError>;

    /// Authorization set of `user`, extended with `additional_labels`.
    async fn authorizations(
        &self,
        user: &User,
        additional_labels: &[String],
    ) -> Result<Authorizations, CoreError>;
}
