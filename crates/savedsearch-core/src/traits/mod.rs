//! Interfaces of the external collaborators the store depends on

pub mod graph_store;
pub mod user_directory;

pub use graph_store::GraphStore;
pub use user_directory::UserDirectory;

#[cfg(any(test, feature = "mocks"))]
pub use graph_store::MockGraphStore;
#[cfg(any(test, feature = "mocks"))]
pub use user_directory::MockUserDirectory;
