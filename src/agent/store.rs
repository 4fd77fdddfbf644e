/// Database-backed collaborators for the developer agent.
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex as TokioMutex;

use super::{AgentError, ContextHit, ContextSearch, Relation, RelationStore};
use crate::db::models::ChunkHit;
use crate::db::Db;

/// Context search over the chunks stored in the database.
///
/// Each identifier-like word of the query is matched as a substring over
/// chunk contents; hits are merged across words up to the limit.
pub struct DbContextSearch {
    db: Arc<TokioMutex<Db>>,
}

impl DbContextSearch {
    #[must_use]
    pub fn new(db: Arc<TokioMutex<Db>>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContextSearch for DbContextSearch {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContextHit>, AgentError> {
        let mut merged: Vec<ChunkHit> = Vec::new();

        {
            let db = self.db.lock().await;
            'words: for word in identifier_words(query) {
                let found = db
                    .search_chunks(&word, limit)
                    .map_err(|e| AgentError::Search(e.to_string()))?;
                for hit in found {
                    let seen = merged
                        .iter()
                        .any(|h| h.file_path == hit.file_path && h.position == hit.position);
                    if !seen {
                        merged.push(hit);
                    }
                    if merged.len() >= limit {
                        break 'words;
                    }
                }
            }
        }

        // Rank-based relevance; the LIKE search itself has no score.
        Ok(merged
            .into_iter()
            .enumerate()
            .map(|(i, hit)| ContextHit {
                source: hit.file_path,
                content: hit.content,
                score: 1.0 / (i as f64 + 1.0),
            })
            .collect())
    }
}

/// Relationship lookup over the symbol relations stored in the database.
///
/// Candidate symbol names are taken from the query's identifier-like words;
/// each one is resolved against the relations table.
pub struct DbRelationStore {
    db: Arc<TokioMutex<Db>>,
}

impl DbRelationStore {
    #[must_use]
    pub fn new(db: Arc<TokioMutex<Db>>) -> Self {
        Self { db }
    }
}

const MAX_RELATIONS: usize = 20;

#[async_trait]
impl RelationStore for DbRelationStore {
    async fn relationships(
        &self,
        query: &str,
        _hits: &[ContextHit],
    ) -> Result<Vec<Relation>, AgentError> {
        let mut relations = Vec::new();

        let db = self.db.lock().await;
        for word in identifier_words(query) {
            let found = db
                .find_relations(&word)
                .map_err(|e| AgentError::Relations(e.to_string()))?;
            for rel in found {
                let rendered = format!(
                    "{} {} {}",
                    rel.source_name, rel.relation_type, rel.target_name
                );
                if !relations
                    .iter()
                    .any(|r: &Relation| r.relationship == rendered)
                {
                    relations.push(Relation {
                        relationship: rendered,
                        source: rel.file_path,
                    });
                }
                if relations.len() >= MAX_RELATIONS {
                    return Ok(relations);
                }
            }
        }

        Ok(relations)
    }
}

/// Identifier-like words of a query: alphanumeric/underscore runs longer
/// than two characters.
fn identifier_words(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| w.len() > 2)
        .map(str::to_string)
        .collect()
}
