//! In-memory collaborators for the saved search store
//!
//! This crate provides in-memory implementations of the `GraphStore` and
//! `UserDirectory` traits defined in savedsearch-core. They are useful for
//! development, tests and demos where a real graph database is not available.

use std::sync::Arc;

use savedsearch_core::{CoreError, SavedSearchStore, SearchStoreConfig};

pub mod graph;
pub use graph::{DuplicateEdgePolicy, InMemoryGraph};

pub mod user_directory;
pub use user_directory::InMemoryUserDirectory;

/// A saved search store wired to fresh in-memory collaborators.
///
/// The graph and directory handles are returned so callers can seed users
/// and inspect state.
pub fn in_memory_store(
    config: &SearchStoreConfig,
    policy: DuplicateEdgePolicy,
) -> Result<(SavedSearchStore, Arc<InMemoryGraph>, Arc<InMemoryUserDirectory>), CoreError> {
    let graph = Arc::new(InMemoryGraph::with_duplicate_edge_policy(policy));
    let users = Arc::new(InMemoryUserDirectory::new());
    let store = SavedSearchStore::new(graph.clone(), users.clone(), config)?;
    Ok((store, graph, users))
}
