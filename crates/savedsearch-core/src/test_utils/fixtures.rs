//! Ready-made values for exercising the saved search store

use serde_json::json;

use crate::data::{Authorizations, SaveSearchRequest, SearchParameters, TraceContext, User};

pub const TEST_USER_ID: &str = "USER123";

pub fn test_user() -> User {
    User {
        user_id: TEST_USER_ID.into(),
        display_name: Some("Test User".to_string()),
    }
}

/// Labels granted to a regular user: saved searches plus user vertices.
pub fn search_authorizations() -> Authorizations {
    Authorizations::new(["search", "user"])
}

pub fn sample_parameters() -> SearchParameters {
    let mut parameters = SearchParameters::new();
    parameters.insert("key1".to_string(), json!("value1"));
    parameters
}

pub fn sample_request(id: &str, name: &str) -> SaveSearchRequest {
    SaveSearchRequest::new(name, "/vertex/search", sample_parameters()).with_id(id)
}

pub fn trace() -> TraceContext {
    TraceContext::new_root()
}
