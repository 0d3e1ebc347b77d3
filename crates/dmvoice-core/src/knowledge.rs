//! Campaign knowledge base: store trait and the service gluing embedding
//! to storage.
//!
//! The store is a thin pass-through to an external vector database; the
//! service's only logic is presence validation and query embedding.

use std::sync::Arc;

use tracing::debug;

use dmvoice_types::error::{EngineError, KnowledgeError};
use dmvoice_types::knowledge::{KnowledgeEntry, KnowledgeHit};

use crate::embed::Embedder;

/// Trait for vector-indexed knowledge storage with semantic search.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations (LanceDB) live in dmvoice-infra.
pub trait KnowledgeStore: Send + Sync {
    /// Insert or replace an entry with its document embedding.
    fn upsert(
        &self,
        entry: &KnowledgeEntry,
        embedding: &[f32],
    ) -> impl std::future::Future<Output = Result<(), KnowledgeError>> + Send;

    /// Search for entries nearest to the query embedding.
    fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<KnowledgeHit>, KnowledgeError>> + Send;

    /// Total number of stored entries.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, KnowledgeError>> + Send;
}

/// Service combining the embedding engine with the vector store.
pub struct KnowledgeService<E: Embedder, K: KnowledgeStore> {
    embedder: Arc<E>,
    store: Arc<K>,
}

impl<E: Embedder, K: KnowledgeStore> KnowledgeService<E, K> {
    pub fn new(embedder: Arc<E>, store: Arc<K>) -> Self {
        Self { embedder, store }
    }

    /// Validate and upsert one entry.
    ///
    /// Invariant: id and content must be non-empty before upsert.
    pub async fn add(&self, entry: &KnowledgeEntry) -> Result<(), KnowledgeError> {
        if entry.id.trim().is_empty() || entry.content.trim().is_empty() {
            return Err(KnowledgeError::InvalidEntry(
                "id and content required".to_string(),
            ));
        }

        let document = entry.document();
        let embedding = self
            .embedder
            .embed(std::slice::from_ref(&document))
            .await
            .map_err(engine_to_store)?;
        let embedding = embedding
            .first()
            .ok_or_else(|| KnowledgeError::Store("embedder returned no vectors".to_string()))?;

        debug!(id = %entry.id, category = %entry.category, "upserting knowledge entry");
        self.store.upsert(entry, embedding).await
    }

    /// Semantic search. An empty query returns no results without touching
    /// the models.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<KnowledgeHit>, KnowledgeError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let embedding = self
            .embedder
            .embed(std::slice::from_ref(&query.to_string()))
            .await
            .map_err(engine_to_store)?;
        let embedding = embedding
            .first()
            .ok_or_else(|| KnowledgeError::Store("embedder returned no vectors".to_string()))?;

        self.store.search(embedding, limit).await
    }

    /// Entry count for `/status`.
    pub async fn count(&self) -> Result<u64, KnowledgeError> {
        self.store.count().await
    }
}

fn engine_to_store(e: EngineError) -> KnowledgeError {
    KnowledgeError::Store(e.to_string())
}
