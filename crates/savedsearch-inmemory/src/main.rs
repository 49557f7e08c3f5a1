use anyhow::Context;
use serde_json::json;

use savedsearch_core::{
    init_tracing, SaveSearchRequest, SavedSearchId, SavedSearchList, SearchParameters,
    SearchStoreConfig, TraceContext, User, UserId, Visibility,
};
use savedsearch_inmemory::{in_memory_store, DuplicateEdgePolicy};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SearchStoreConfig::load().context("loading configuration")?;
    init_tracing(&config.log_level);

    let (store, graph, users) = in_memory_store(&config, DuplicateEdgePolicy::Ignore)?;
    tracing::info!(visibility = %store.visibility(), "Saved search store started with in-memory graph");

    let user = User {
        user_id: UserId::from("USER123"),
        display_name: Some("Demo User".to_string()),
    };
    let user_visibility = Visibility::parse(&config.user_visibility)?;
    users
        .create_user(graph.as_ref(), &user, &user_visibility, Vec::<String>::new())
        .await
        .context("seeding demo user")?;

    let authorizations = store.user_authorizations(&user).await?;
    let trace_ctx = TraceContext::new_root();

    let mut parameters = SearchParameters::new();
    parameters.insert("key1".to_string(), json!("value1"));
    let request = SaveSearchRequest::new("search1", "/vertex/search", parameters).with_id("123");

    let id = store
        .save_search(&user, &authorizations, &trace_ctx, request)
        .await
        .context("saving search")?;
    tracing::info!(search_id = %id, "Saved");

    let list = SavedSearchList::from(store.get_saved_searches(&user, &authorizations, &trace_ctx).await?);
    tracing::info!(listing = %serde_json::to_string(&list)?, "Listed saved searches");

    let fetched = store.get_saved_search(&id, &user, &authorizations, &trace_ctx).await?;
    tracing::info!(found = fetched.is_some(), "Fetched saved search");

    store.delete_search(&id, &user, &authorizations, &trace_ctx).await?;
    let after_delete = store
        .get_saved_search(&SavedSearchId::from("123"), &user, &authorizations, &trace_ctx)
        .await?;
    tracing::info!(found = after_delete.is_some(), "Fetched saved search after delete");

    Ok(())
}
