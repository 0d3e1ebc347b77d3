//! LanceDB-backed vector storage for the campaign knowledge base.

pub mod knowledge;
pub mod lance;
pub mod schema;

pub use knowledge::LanceKnowledgeStore;
pub use lance::LanceStore;
