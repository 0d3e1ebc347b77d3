//! Campaign knowledge base types.

use serde::{Deserialize, Serialize};

/// One entry to upsert into the campaign knowledge store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub category: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl KnowledgeEntry {
    /// The text that gets embedded and stored: title, blank line, content.
    pub fn document(&self) -> String {
        format!("{}\n\n{}", self.title, self.content)
    }

    /// Tags as stored in the vector table (comma-joined).
    pub fn tags_joined(&self) -> String {
        self.tags.join(",")
    }
}

/// One search hit from the knowledge store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeHit {
    pub id: String,
    /// The stored document text (title + content).
    pub content: String,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    /// 1.0 - cosine distance.
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_joins_title_and_content() {
        let entry = KnowledgeEntry {
            id: "npc-thorgrim".to_string(),
            category: "npc".to_string(),
            title: "Thorgrim the Blacksmith".to_string(),
            content: "A gruff dwarf who runs the forge.".to_string(),
            tags: vec!["ally".to_string(), "shop".to_string()],
        };
        assert_eq!(
            entry.document(),
            "Thorgrim the Blacksmith\n\nA gruff dwarf who runs the forge."
        );
        assert_eq!(entry.tags_joined(), "ally,shop");
    }

    #[test]
    fn empty_tags_join_to_empty_string() {
        let entry = KnowledgeEntry {
            id: "x".to_string(),
            category: "general".to_string(),
            title: String::new(),
            content: "c".to_string(),
            tags: Vec::new(),
        };
        assert_eq!(entry.tags_joined(), "");
    }
}
