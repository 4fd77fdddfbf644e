use chrono::{DateTime, Utc};

/// Summary row for a stored repository.
#[derive(Debug, Clone)]
pub struct StoredRepository {
    pub id: i64,
    pub root: String,
    pub parsed_at: DateTime<Utc>,
    pub file_count: usize,
}

/// One chunk returned by text search, with its file provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkHit {
    pub file_path: String,
    pub language: String,
    pub content: String,
    pub start_line: usize,
    pub end_line: usize,
    pub position: usize,
}

/// A structural relationship between two symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolRelation {
    pub relation_type: String,
    pub source_name: String,
    pub target_name: String,
    pub file_path: String,
}
