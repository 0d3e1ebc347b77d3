//! LanceDB-backed campaign knowledge store.
//!
//! Implements `KnowledgeStore` from `dmvoice-core` over a single
//! `campaign_knowledge` table with 384-dimensional BGESmallENV15
//! embeddings and cosine-distance search. Upserting an existing id
//! deletes the old row and inserts the new one.

use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field};
use futures_util::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};

use dmvoice_core::knowledge::KnowledgeStore;
use dmvoice_types::error::KnowledgeError;
use dmvoice_types::knowledge::{KnowledgeEntry, KnowledgeHit};

use super::lance::{KNOWLEDGE_TABLE, LanceStore};
use super::schema::{EMBEDDING_DIMENSION, knowledge_schema};

pub struct LanceKnowledgeStore {
    store: LanceStore,
}

impl LanceKnowledgeStore {
    pub fn new(store: LanceStore) -> Self {
        Self { store }
    }

    async fn ensure_table(&self) -> Result<lancedb::Table, KnowledgeError> {
        let schema = Arc::new(knowledge_schema());
        self.store
            .ensure_table(KNOWLEDGE_TABLE, schema)
            .await
            .map_err(|e| KnowledgeError::Store(format!("Failed to ensure knowledge table: {e}")))
    }

    /// Build an Arrow RecordBatch for one entry and its embedding.
    fn build_record_batch(
        entry: &KnowledgeEntry,
        embedding: &[f32],
    ) -> Result<RecordBatch, KnowledgeError> {
        if embedding.len() != EMBEDDING_DIMENSION as usize {
            return Err(KnowledgeError::Store(format!(
                "embedding has {} dimensions, expected {EMBEDDING_DIMENSION}",
                embedding.len()
            )));
        }

        let schema = Arc::new(knowledge_schema());

        let id_array = StringArray::from(vec![entry.id.clone()]);
        let document_array = StringArray::from(vec![entry.document()]);
        let category_array = StringArray::from(vec![entry.category.clone()]);
        let title_array = StringArray::from(vec![entry.title.clone()]);
        let tags_array = StringArray::from(vec![entry.tags_joined()]);

        let values = Float32Array::from(embedding.to_vec());
        let field = Arc::new(Field::new("item", DataType::Float32, true));
        let vector_array = FixedSizeListArray::new(field, EMBEDDING_DIMENSION, Arc::new(values), None);

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(id_array),
                Arc::new(document_array),
                Arc::new(category_array),
                Arc::new(title_array),
                Arc::new(tags_array),
                Arc::new(vector_array),
            ],
        )
        .map_err(|e| KnowledgeError::Store(format!("Failed to build record batch: {e}")))
    }

    /// Parse search result rows into hits, reading similarity from the
    /// `_distance` column LanceDB appends.
    fn record_batch_to_hits(batch: &RecordBatch) -> Result<Vec<KnowledgeHit>, KnowledgeError> {
        let num_rows = batch.num_rows();
        if num_rows == 0 {
            return Ok(vec![]);
        }

        let id_col = string_column(batch, "id")?;
        let document_col = string_column(batch, "document")?;
        let category_col = string_column(batch, "category")?;
        let title_col = string_column(batch, "title")?;
        let tags_col = string_column(batch, "tags")?;

        let distance_col = batch
            .column_by_name("_distance")
            .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

        let mut hits = Vec::with_capacity(num_rows);
        for i in 0..num_rows {
            let distance = distance_col.map_or(0.0, |d| d.value(i));
            let tags_value = tags_col.value(i);
            let tags = if tags_value.is_empty() {
                Vec::new()
            } else {
                tags_value.split(',').map(|t| t.trim().to_string()).collect()
            };

            hits.push(KnowledgeHit {
                id: id_col.value(i).to_string(),
                content: document_col.value(i).to_string(),
                title: title_col.value(i).to_string(),
                category: category_col.value(i).to_string(),
                tags,
                similarity: 1.0 - distance,
            });
        }

        Ok(hits)
    }
}

fn string_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, KnowledgeError> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| KnowledgeError::Store(format!("column {name} missing or not a string")))
}

/// Escape a value for a LanceDB SQL filter literal.
fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

impl KnowledgeStore for LanceKnowledgeStore {
    async fn upsert(&self, entry: &KnowledgeEntry, embedding: &[f32]) -> Result<(), KnowledgeError> {
        let table = self.ensure_table().await?;

        // Delete-then-add; LanceDB has no native upsert on plain tables
        table
            .delete(&format!("id = '{}'", escape_literal(&entry.id)))
            .await
            .map_err(|e| KnowledgeError::Store(format!("Failed to delete existing entry: {e}")))?;

        let batch = Self::build_record_batch(entry, embedding)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);

        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| KnowledgeError::Store(format!("Failed to add entry: {e}")))?;

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<KnowledgeHit>, KnowledgeError> {
        if !self.store.table_exists(KNOWLEDGE_TABLE).await {
            return Ok(vec![]);
        }

        let table = self.ensure_table().await?;

        let results = table
            .vector_search(query_embedding)
            .map_err(|e| KnowledgeError::Store(format!("Vector search setup failed: {e}")))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| KnowledgeError::Store(format!("Vector search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| KnowledgeError::Store(format!("Failed to collect results: {e}")))?;

        let mut hits = Vec::new();
        for batch in &batches {
            hits.extend(Self::record_batch_to_hits(batch)?);
        }

        // Batches arrive ordered, but merge across batch boundaries anyway
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);

        Ok(hits)
    }

    async fn count(&self) -> Result<u64, KnowledgeError> {
        if !self.store.table_exists(KNOWLEDGE_TABLE).await {
            return Ok(0);
        }

        let table = self.ensure_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| KnowledgeError::Store(format!("Failed to count rows: {e}")))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_entry(id: &str, title: &str, content: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            id: id.to_string(),
            category: "location".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            tags: vec!["town".to_string(), "starting-area".to_string()],
        }
    }

    /// Deterministic unit-length embedding distinguished by seed.
    fn make_embedding(seed: f32) -> Vec<f32> {
        let mut vec = vec![0.0_f32; EMBEDDING_DIMENSION as usize];
        for (i, val) in vec.iter_mut().enumerate() {
            *val = ((i as f32 + seed) * 0.01).sin();
        }
        let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in vec.iter_mut() {
                *val /= norm;
            }
        }
        vec
    }

    async fn setup_store() -> (LanceKnowledgeStore, tempfile::TempDir) {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let lance = LanceStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create LanceStore");
        (LanceKnowledgeStore::new(lance), temp_dir)
    }

    #[tokio::test]
    async fn upsert_and_count() {
        let (store, _tmp) = setup_store().await;
        assert_eq!(store.count().await.unwrap(), 0);

        store
            .upsert(&make_entry("loc-1", "Bramblewick", "A sleepy village."), &make_embedding(1.0))
            .await
            .unwrap();
        store
            .upsert(&make_entry("loc-2", "Duskmoor", "A haunted bog."), &make_embedding(2.0))
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn upsert_same_id_replaces() {
        let (store, _tmp) = setup_store().await;

        store
            .upsert(&make_entry("loc-1", "Bramblewick", "First draft."), &make_embedding(1.0))
            .await
            .unwrap();
        store
            .upsert(&make_entry("loc-1", "Bramblewick", "Revised lore."), &make_embedding(1.0))
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 1);

        let hits = store.search(&make_embedding(1.0), 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].content.contains("Revised lore."));
    }

    #[tokio::test]
    async fn search_returns_nearest_first() {
        let (store, _tmp) = setup_store().await;

        for i in 0..5 {
            let entry = make_entry(&format!("loc-{i}"), &format!("Place {i}"), "Lore text.");
            store.upsert(&entry, &make_embedding(i as f32)).await.unwrap();
        }

        let hits = store.search(&make_embedding(0.0), 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, "loc-0");
        assert!((hits[0].similarity - 1.0).abs() < 1e-3);
        for window in hits.windows(2) {
            assert!(window[0].similarity >= window[1].similarity - f32::EPSILON);
        }
    }

    #[tokio::test]
    async fn search_empty_store() {
        let (store, _tmp) = setup_store().await;
        let hits = store.search(&make_embedding(0.0), 5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn hits_carry_metadata_and_tags() {
        let (store, _tmp) = setup_store().await;

        store
            .upsert(&make_entry("loc-1", "Bramblewick", "A sleepy village."), &make_embedding(1.0))
            .await
            .unwrap();

        let hits = store.search(&make_embedding(1.0), 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Bramblewick");
        assert_eq!(hits[0].category, "location");
        assert_eq!(hits[0].tags, vec!["town", "starting-area"]);
        assert_eq!(hits[0].content, "Bramblewick\n\nA sleepy village.");
    }

    #[tokio::test]
    async fn rejects_wrong_dimension_embedding() {
        let (store, _tmp) = setup_store().await;
        let result = store
            .upsert(&make_entry("loc-1", "Bramblewick", "Lore."), &[1.0, 0.0])
            .await;
        assert!(matches!(result, Err(KnowledgeError::Store(_))));
    }

    #[test]
    fn escape_literal_doubles_quotes() {
        assert_eq!(escape_literal("o'brien"), "o''brien");
    }
}
