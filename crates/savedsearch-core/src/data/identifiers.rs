//! Identifier types for the saved search graph

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Stable identifier of a user, as issued by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        UserId(value.to_string())
    }
}

/// Identifier of a saved search. Doubles as the id of the vertex that stores it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SavedSearchId(pub String);

impl fmt::Display for SavedSearchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl SavedSearchId {
    pub fn new_v4() -> Self {
        SavedSearchId(Uuid::new_v4().to_string())
    }

    /// Treats an empty or whitespace-only id as "not supplied".
    pub fn from_optional(id: Option<&str>) -> Option<Self> {
        id.map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| SavedSearchId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SavedSearchId {
    fn from(value: &str) -> Self {
        SavedSearchId(value.to_string())
    }
}

/// Identifier of a vertex in the property graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub String);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl VertexId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VertexId {
    fn from(value: &str) -> Self {
        VertexId(value.to_string())
    }
}

impl From<&SavedSearchId> for VertexId {
    fn from(value: &SavedSearchId) -> Self {
        VertexId(value.0.clone())
    }
}

/// Identifier of an edge in the property graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub String);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl EdgeId {
    pub fn new_v4() -> Self {
        EdgeId(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_search_id_new_v4() {
        let id1 = SavedSearchId::new_v4();
        let id2 = SavedSearchId::new_v4();
        assert_ne!(id1, id2, "Generated ids should be unique");
    }

    #[test]
    fn test_saved_search_id_from_optional() {
        assert_eq!(SavedSearchId::from_optional(None), None);
        assert_eq!(SavedSearchId::from_optional(Some("")), None);
        assert_eq!(SavedSearchId::from_optional(Some("   ")), None);
        assert_eq!(
            SavedSearchId::from_optional(Some(" SS1 ")),
            Some(SavedSearchId("SS1".to_string()))
        );
    }

    #[test]
    fn test_saved_search_id_serializes_as_plain_string() {
        let id = SavedSearchId::from("123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"123\"");
    }

    #[test]
    fn test_vertex_id_from_saved_search_id() {
        let id = SavedSearchId::from("SS123");
        assert_eq!(VertexId::from(&id).as_str(), "SS123");
    }
}
