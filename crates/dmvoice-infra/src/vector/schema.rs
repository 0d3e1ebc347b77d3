//! Arrow schema for the campaign knowledge table.
//!
//! Arrow versions MUST match lancedb's transitive dependency (57.3 for
//! lancedb 0.26).

use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};

/// BGESmallENV15 embedding dimension.
pub const EMBEDDING_DIMENSION: i32 = 384;

/// Schema for the `campaign_knowledge` table.
///
/// `document` holds the embedded text (`{title}\n\n{content}`); `tags` is
/// comma-joined so the row stays flat.
pub fn knowledge_schema() -> Schema {
    Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("document", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("title", DataType::Utf8, false),
        Field::new("tags", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                EMBEDDING_DIMENSION,
            ),
            false,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_schema_shape() {
        let schema = knowledge_schema();
        assert_eq!(schema.fields().len(), 6);
        assert_eq!(schema.field(0).name(), "id");
        assert_eq!(schema.field(5).name(), "vector");
        match schema.field(5).data_type() {
            DataType::FixedSizeList(_, dim) => assert_eq!(*dim, EMBEDDING_DIMENSION),
            other => panic!("vector field should be FixedSizeList, got {other:?}"),
        }
    }
}
