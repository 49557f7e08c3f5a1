//! Visibility labels and the authorization sets that unlock them

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::data::errors::CoreError;

const LABEL_SEPARATOR: char = '&';

/// Label expression attached to a vertex, property or edge.
///
/// An empty expression is visible to everyone. Otherwise every `&`-joined
/// label must be granted by the reader's [`Authorizations`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Visibility(String);

impl TryFrom<String> for Visibility {
    type Error = CoreError;

    fn try_from(expression: String) -> Result<Self, Self::Error> {
        Visibility::parse(&expression)
    }
}

impl From<Visibility> for String {
    fn from(visibility: Visibility) -> Self {
        visibility.0
    }
}

impl Visibility {
    /// Parses a label expression, rejecting empty segments such as `a&&b`.
    pub fn parse(expression: &str) -> Result<Self, CoreError> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Ok(Self::public());
        }
        if expression.split(LABEL_SEPARATOR).any(|label| label.trim().is_empty()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid visibility expression: {:?}",
                expression
            )));
        }
        let normalized = expression
            .split(LABEL_SEPARATOR)
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("&");
        Ok(Self(normalized))
    }

    pub fn public() -> Self {
        Self(String::new())
    }

    pub fn is_public(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Labels a reader must hold.
    pub fn required_labels(&self) -> impl Iterator<Item = &str> {
        self.0.split(LABEL_SEPARATOR).filter(|label| !label.is_empty())
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of labels a caller has been granted for one request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Authorizations {
    labels: BTreeSet<String>,
}

impl Authorizations {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(Into::into)
                .filter(|label: &String| !label.is_empty())
                .collect(),
        }
    }

    /// An authorization set that only sees unlabelled data.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn can_access(&self, visibility: &Visibility) -> bool {
        visibility
            .required_labels()
            .all(|label| self.labels.contains(label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Union of both sets.
    pub fn merged(&self, other: &Authorizations) -> Self {
        Self {
            labels: self.labels.union(&other.labels).cloned().collect(),
        }
    }
}
