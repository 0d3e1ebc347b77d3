//! LanceDB connection and table lifecycle.
//!
//! Wraps a `lancedb::Connection` rooted at a filesystem path with helpers
//! to open-or-create tables from an Arrow schema.

use std::path::PathBuf;
use std::sync::Arc;

use arrow_schema::Schema;

/// Name of the single knowledge table.
pub const KNOWLEDGE_TABLE: &str = "campaign_knowledge";

pub struct LanceStore {
    db: lancedb::Connection,
    base_path: PathBuf,
}

impl LanceStore {
    /// Open or create a LanceDB store at the given path, creating the
    /// directory if needed.
    pub async fn new(base_path: PathBuf) -> Result<Self, lancedb::Error> {
        std::fs::create_dir_all(&base_path).map_err(|e| lancedb::Error::CreateDir {
            path: base_path.display().to_string(),
            source: e,
        })?;

        let uri = base_path
            .to_str()
            .ok_or_else(|| lancedb::Error::InvalidInput {
                message: format!("Path contains invalid UTF-8: {}", base_path.display()),
            })?;

        let db = lancedb::connect(uri).execute().await?;

        Ok(Self { db, base_path })
    }

    /// Open the table if it exists, otherwise create it empty with the
    /// provided schema.
    pub async fn ensure_table(
        &self,
        table_name: &str,
        schema: Arc<Schema>,
    ) -> Result<lancedb::Table, lancedb::Error> {
        match self.db.open_table(table_name).execute().await {
            Ok(table) => Ok(table),
            Err(lancedb::Error::TableNotFound { .. }) => {
                self.db
                    .create_empty_table(table_name, schema)
                    .execute()
                    .await
            }
            Err(e) => Err(e),
        }
    }

    pub async fn table_exists(&self, table_name: &str) -> bool {
        self.db.open_table(table_name).execute().await.is_ok()
    }

    /// Drop a table. Ok(()) even if it does not exist.
    pub async fn drop_table(&self, table_name: &str) -> Result<(), lancedb::Error> {
        match self.db.drop_table(table_name, &[]).await {
            Ok(()) => Ok(()),
            Err(lancedb::Error::TableNotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn table_names(&self) -> Result<Vec<String>, lancedb::Error> {
        self.db.table_names().execute().await
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::schema::knowledge_schema;

    #[tokio::test]
    async fn connection_opens_successfully() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LanceStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create store");

        let tables = store.table_names().await.expect("Failed to list tables");
        assert!(tables.is_empty());
    }

    #[tokio::test]
    async fn ensure_table_creates_and_reopens() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LanceStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create store");

        let schema = Arc::new(knowledge_schema());

        let table = store
            .ensure_table(KNOWLEDGE_TABLE, schema.clone())
            .await
            .expect("Failed to create table");
        let count = table.count_rows(None).await.expect("Failed to count rows");
        assert_eq!(count, 0);

        let _reopened = store
            .ensure_table(KNOWLEDGE_TABLE, schema)
            .await
            .expect("Failed to reopen table");
        assert!(store.table_exists(KNOWLEDGE_TABLE).await);
    }

    #[tokio::test]
    async fn drop_table_idempotent() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = LanceStore::new(temp_dir.path().to_path_buf())
            .await
            .expect("Failed to create store");

        let schema = Arc::new(knowledge_schema());
        store
            .ensure_table("to_drop", schema)
            .await
            .expect("Failed to create table");
        assert!(store.table_exists("to_drop").await);

        store.drop_table("to_drop").await.expect("Failed to drop table");
        assert!(!store.table_exists("to_drop").await);

        store
            .drop_table("to_drop")
            .await
            .expect("Second drop should be idempotent");
    }
}
