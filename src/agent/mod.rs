//! Developer agent: answers natural-language queries about parsed
//! repositories by composing context search, relationship lookup, and an
//! LLM service behind trait seams.
//!
//! The agent itself is a thin pipeline; all substance lives in the
//! collaborators. See [`mock`] for deterministic test/stub implementations
//! and [`store`] for the database-backed ones.

pub mod mock;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while processing an agent query.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("context search failed: {0}")]
    Search(String),

    #[error("relation query failed: {0}")]
    Relations(String),

    #[error("llm generation failed: {0}")]
    Generation(String),
}

/// Trait for LLM text generation backends.
#[async_trait]
pub trait LlmService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError>;
}

/// Trait for retrieving relevant code context for a query.
#[async_trait]
pub trait ContextSearch: Send + Sync {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ContextHit>, AgentError>;
}

/// Trait for structural relationship lookups over indexed symbols.
#[async_trait]
pub trait RelationStore: Send + Sync {
    async fn relationships(
        &self,
        query: &str,
        hits: &[ContextHit],
    ) -> Result<Vec<Relation>, AgentError>;
}

/// One piece of retrieved code context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextHit {
    pub source: String,
    pub content: String,
    pub score: f64,
}

/// One structural relationship, rendered for prompt inclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub relationship: String,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Code,
    Relationship,
}

/// Provenance entry attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub kind: SourceKind,
    pub source: String,
    pub relevance: f64,
}

/// The agent's answer to one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query: String,
    pub response: String,
    pub sources: Vec<SourceRef>,
}

/// Composes the collaborators into the query pipeline:
/// search → relationships → prompt → generate.
pub struct DeveloperAgent {
    llm: Arc<dyn LlmService>,
    search: Arc<dyn ContextSearch>,
    relations: Arc<dyn RelationStore>,
    search_top_k: usize,
    context_limit: usize,
}

impl DeveloperAgent {
    pub fn new(
        llm: Arc<dyn LlmService>,
        search: Arc<dyn ContextSearch>,
        relations: Arc<dyn RelationStore>,
        search_top_k: usize,
        context_limit: usize,
    ) -> Self {
        Self {
            llm,
            search,
            relations,
            search_top_k,
            context_limit,
        }
    }

    /// Process a natural-language query about the indexed codebase.
    pub async fn process_query(&self, query: &str) -> Result<QueryResponse, AgentError> {
        let hits = self.search.search(query, self.search_top_k).await?;
        let relations = self.relations.relationships(query, &hits).await?;

        let prompt = self.construct_prompt(query, &hits, &relations);
        let response = self.llm.generate(&prompt).await?;

        Ok(QueryResponse {
            query: query.to_string(),
            response,
            sources: collect_sources(&hits, &relations),
        })
    }

    fn construct_prompt(&self, query: &str, hits: &[ContextHit], relations: &[Relation]) -> String {
        let mut prompt = format!("Query: {query}\n\nContext:\n");

        prompt.push_str("\nCode Context:\n");
        for (i, hit) in hits.iter().take(self.context_limit).enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, hit.content));
            prompt.push_str(&format!("   Source: {}\n\n", hit.source));
        }

        prompt.push_str("\nRelationships:\n");
        for (i, relation) in relations.iter().take(self.context_limit).enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, relation.relationship));
        }

        prompt.push_str("\nBased on the above context, please respond to the query.");
        prompt
    }
}

/// De-duplicated provenance: code hits first, then relationship sources.
fn collect_sources(hits: &[ContextHit], relations: &[Relation]) -> Vec<SourceRef> {
    let mut sources: Vec<SourceRef> = Vec::new();

    for hit in hits {
        if !sources.iter().any(|s| s.source == hit.source) {
            sources.push(SourceRef {
                kind: SourceKind::Code,
                source: hit.source.clone(),
                relevance: hit.score,
            });
        }
    }

    for relation in relations {
        if !sources.iter().any(|s| s.source == relation.source) {
            sources.push(SourceRef {
                kind: SourceKind::Relationship,
                source: relation.source.clone(),
                relevance: 0.0,
            });
        }
    }

    sources
}
