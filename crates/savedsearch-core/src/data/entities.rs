//! Saved search entity, its graph schema, and the principal that owns it

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::errors::CoreError;
use crate::data::graph::Vertex;
use crate::data::identifiers::{SavedSearchId, UserId};

/// Property names and edge labels used to persist saved searches.
pub mod schema {
    /// Property marking which kind of entity a vertex represents.
    pub const CONCEPT_TYPE: &str = "conceptType";
    pub const CONCEPT_TYPE_SAVED_SEARCH: &str = "savedSearch";

    pub const NAME: &str = "search#name";
    pub const URL: &str = "search#url";
    /// JSON text of the parameter bag.
    pub const PARAMETERS: &str = "search#parameters";

    /// Edge label from a user vertex to each of its saved searches.
    pub const HAS_SAVED_SEARCH: &str = "search#hasSavedSearch";
}

/// Arbitrary key/value parameters of a saved search.
pub type SearchParameters = Map<String, Value>;

/// The principal on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl User {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            display_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: SavedSearchId,
    pub name: String,
    pub url: String,
    pub parameters: SearchParameters,
}

impl SavedSearch {
    /// Whether `vertex` carries the saved search concept marker.
    pub fn is_saved_search(vertex: &Vertex) -> bool {
        vertex.property_str(schema::CONCEPT_TYPE) == Some(schema::CONCEPT_TYPE_SAVED_SEARCH)
    }

    /// Decodes a vertex that carries the saved search concept marker.
    /// Returns `Ok(None)` for any other kind of vertex.
    pub fn from_vertex(vertex: &Vertex) -> Result<Option<Self>, CoreError> {
        if !Self::is_saved_search(vertex) {
            return Ok(None);
        }

        let parameters = match vertex.property_str(schema::PARAMETERS) {
            Some(text) => decode_parameters(text)?,
            None => SearchParameters::new(),
        };

        Ok(Some(SavedSearch {
            id: SavedSearchId(vertex.id.0.clone()),
            name: vertex.property_str(schema::NAME).unwrap_or_default().to_string(),
            url: vertex.property_str(schema::URL).unwrap_or_default().to_string(),
            parameters,
        }))
    }
}

/// Input of [`SavedSearchStore::save_search`](crate::services::SavedSearchStore::save_search).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSearchRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub parameters: SearchParameters,
}

impl SaveSearchRequest {
    pub fn new(name: impl Into<String>, url: impl Into<String>, parameters: SearchParameters) -> Self {
        Self {
            id: None,
            name: name.into(),
            url: url.into(),
            parameters,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Response envelope handed to the API layer for a listing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SavedSearchList {
    pub searches: Vec<SavedSearch>,
}

impl From<Vec<SavedSearch>> for SavedSearchList {
    fn from(searches: Vec<SavedSearch>) -> Self {
        Self { searches }
    }
}

/// Canonical text form of the parameter bag (keys sorted).
pub fn encode_parameters(parameters: &SearchParameters) -> Result<String, CoreError> {
    Ok(serde_json::to_string(parameters)?)
}

pub fn decode_parameters(text: &str) -> Result<SearchParameters, CoreError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::EncodingError(serde_json::Error::custom(format!(
            "saved search parameters must be a JSON object, found {}",
            json_kind(&other)
        )))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::graph::{Property, PropertyValue};
    use crate::data::identifiers::VertexId;
    use crate::data::visibility::Visibility;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn property(name: &str, value: &str) -> Property {
        Property {
            name: name.to_string(),
            value: PropertyValue::from(value),
            visibility: Visibility::public(),
        }
    }

    fn saved_search_vertex(extra: Vec<Property>) -> Vertex {
        let mut properties = vec![property(schema::CONCEPT_TYPE, schema::CONCEPT_TYPE_SAVED_SEARCH)];
        properties.extend(extra);
        Vertex {
            id: VertexId::from("SS123"),
            visibility: Visibility::public(),
            properties,
        }
    }

    #[test]
    fn test_encode_parameters_is_canonical() {
        let mut parameters = SearchParameters::new();
        parameters.insert("zeta".into(), json!(1));
        parameters.insert("alpha".into(), json!({"nested": [true, null]}));

        assert_eq!(
            encode_parameters(&parameters).unwrap(),
            r#"{"alpha":{"nested":[true,null]},"zeta":1}"#
        );
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(decode_parameters("[1,2]"), Err(CoreError::EncodingError(_))));
        assert!(matches!(decode_parameters("{not json"), Err(CoreError::EncodingError(_))));
    }

    #[test]
    fn test_from_vertex_decodes_all_properties() {
        let vertex = saved_search_vertex(vec![
            property(schema::NAME, "saved search 123"),
            property(schema::URL, "/vertex/search"),
            property(schema::PARAMETERS, r#"{"key1":"value1"}"#),
        ]);

        let search = SavedSearch::from_vertex(&vertex).unwrap().unwrap();
        assert_eq!(search.id, SavedSearchId::from("SS123"));
        assert_eq!(search.name, "saved search 123");
        assert_eq!(search.url, "/vertex/search");
        assert_eq!(search.parameters.get("key1"), Some(&json!("value1")));
    }

    #[test]
    fn test_from_vertex_defaults_missing_properties() {
        let search = SavedSearch::from_vertex(&saved_search_vertex(vec![])).unwrap().unwrap();
        assert_eq!(search.name, "");
        assert_eq!(search.url, "");
        assert!(search.parameters.is_empty());
    }

    #[test]
    fn test_from_vertex_ignores_other_concepts() {
        let vertex = Vertex {
            id: VertexId::from("USER123"),
            visibility: Visibility::public(),
            properties: vec![property(schema::CONCEPT_TYPE, "user")],
        };
        assert_eq!(SavedSearch::from_vertex(&vertex).unwrap(), None);
    }

    #[test]
    fn test_list_serializes_with_searches_key() {
        let list = SavedSearchList::from(vec![SavedSearch {
            id: SavedSearchId::from("123"),
            name: "search1".into(),
            url: "/vertex/search".into(),
            parameters: SearchParameters::new(),
        }]);

        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            json!({"searches": [{"id": "123", "name": "search1", "url": "/vertex/search", "parameters": {}}]})
        );
    }
}
