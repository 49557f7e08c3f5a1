//! Graph primitives exchanged with a [`GraphStore`](crate::traits::GraphStore)

use serde::{Deserialize, Serialize};

use crate::data::identifiers::{EdgeId, VertexId};
use crate::data::visibility::{Authorizations, Visibility};

/// Typed value of a single vertex property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Integer(i64),
    String(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
    pub visibility: Visibility,
}

/// A vertex as seen through one authorization set: properties the reader
/// cannot see have already been removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub visibility: Visibility,
    pub properties: Vec<Property>,
}

impl Vertex {
    pub fn property_value(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }

    pub fn property_str(&self, name: &str) -> Option<&str> {
        self.property_value(name).and_then(PropertyValue::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub out_vertex_id: VertexId,
    pub in_vertex_id: VertexId,
    pub label: String,
    pub visibility: Visibility,
}

impl Edge {
    /// The endpoint opposite `vertex_id`.
    pub fn other_vertex_id(&self, vertex_id: &VertexId) -> &VertexId {
        if &self.out_vertex_id == vertex_id {
            &self.in_vertex_id
        } else {
            &self.out_vertex_id
        }
    }

    pub fn connects(&self, out_vertex_id: &VertexId, in_vertex_id: &VertexId, label: &str) -> bool {
        &self.out_vertex_id == out_vertex_id && &self.in_vertex_id == in_vertex_id && self.label == label
    }
}

/// Create-or-update request for one vertex. Properties named here replace
/// any existing property of the same name; others are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexMutation {
    pub id: VertexId,
    pub visibility: Visibility,
    pub properties: Vec<Property>,
}

impl VertexMutation {
    pub fn new(id: VertexId, visibility: Visibility) -> Self {
        Self {
            id,
            visibility,
            properties: Vec::new(),
        }
    }

    pub fn set_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
        visibility: Visibility,
    ) -> Self {
        let name = name.into();
        self.properties.retain(|property| property.name != name);
        self.properties.push(Property {
            name,
            value: value.into(),
            visibility,
        });
        self
    }

    /// Every visibility this mutation writes at.
    pub fn visibilities(&self) -> impl Iterator<Item = &Visibility> {
        std::iter::once(&self.visibility).chain(self.properties.iter().map(|p| &p.visibility))
    }

    pub fn writable_with(&self, authorizations: &Authorizations) -> bool {
        self.visibilities().all(|v| authorizations.can_access(v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMutation {
    pub out_vertex_id: VertexId,
    pub in_vertex_id: VertexId,
    pub label: String,
    pub visibility: Visibility,
}
