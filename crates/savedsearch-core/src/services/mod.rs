//! Services built on top of the graph and user directory traits

pub mod saved_search;

pub use saved_search::SavedSearchStore;
