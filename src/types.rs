use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Summary of a completed build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Number of non-blank documents indexed
    pub documents_indexed: usize,
    /// Embedding dimension of every indexed vector
    pub dimension: usize,
    /// Vectors that were all-zero before normalization
    pub zero_vectors: usize,
    /// Model used to produce the embeddings
    pub model_name: String,
    pub index_path: PathBuf,
    pub docs_path: PathBuf,
    /// Time taken in milliseconds
    pub duration_ms: u64,
}

/// A single search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Row of the vector in the index (0-based)
    pub position: usize,
    /// Inner product between the normalized query and the document vector
    pub score: f32,
    /// Source file basename
    pub source: String,
    /// Full document text
    pub text: String,
}

/// Response from a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    /// Time taken in milliseconds
    pub duration_ms: u64,
}

/// Description of a persisted artifact pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    pub index_path: PathBuf,
    pub docs_path: PathBuf,
    /// Rows in the vector index
    pub vectors: usize,
    pub dimension: usize,
    /// Entries in the texts/metadatas record
    pub documents: usize,
    /// Distinct source files referenced by the record
    pub sources: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_hit_serialization() {
        let hit = SearchHit {
            position: 1,
            score: 0.5,
            source: "b.txt".to_string(),
            text: "hello".to_string(),
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["position"], 1);
        assert_eq!(json["source"], "b.txt");
        assert_eq!(json["text"], "hello");
    }

    #[test]
    fn test_build_report_roundtrip_fields() {
        let report = BuildReport {
            documents_indexed: 3,
            dimension: 384,
            zero_vectors: 0,
            model_name: "all-MiniLM-L6-v2".to_string(),
            index_path: PathBuf::from("vector_index.index"),
            docs_path: PathBuf::from("vector_docs.json"),
            duration_ms: 12,
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: BuildReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.documents_indexed, 3);
        assert_eq!(back.dimension, 384);
        assert_eq!(back.index_path, PathBuf::from("vector_index.index"));
    }
}
