// Shared fixtures for tests in this crate and its dependents
pub mod fixtures;

pub use fixtures::*;

#[cfg(any(test, feature = "mocks"))]
pub use crate::traits::{MockGraphStore, MockUserDirectory};
