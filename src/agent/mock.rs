/// Deterministic collaborator implementations.
///
/// `MockLlm` also serves as the shipped stub backend until a real LLM
/// service is wired in; the static stores exist for tests.
use std::sync::Mutex;

use async_trait::async_trait;

use super::{AgentError, ContextHit, ContextSearch, LlmService, Relation, RelationStore};

/// An LLM stand-in that echoes the query line of the prompt and records
/// every prompt it was handed.
#[derive(Default)]
pub struct MockLlm {
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// The most recent prompt passed to `generate` (empty if none).
    pub fn last_prompt(&self) -> String {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .last()
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmService for MockLlm {
    async fn generate(&self, prompt: &str) -> Result<String, AgentError> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());
        let first_line = prompt.lines().next().unwrap_or_default();
        Ok(format!("[stub] {first_line}"))
    }
}

/// Context search over a fixed hit list.
pub struct StaticContextSearch {
    hits: Vec<ContextHit>,
}

impl StaticContextSearch {
    #[must_use]
    pub fn new(hits: Vec<ContextHit>) -> Self {
        Self { hits }
    }
}

#[async_trait]
impl ContextSearch for StaticContextSearch {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<ContextHit>, AgentError> {
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// Relation store over a fixed relation list.
pub struct StaticRelationStore {
    relations: Vec<Relation>,
}

impl StaticRelationStore {
    #[must_use]
    pub fn new(relations: Vec<Relation>) -> Self {
        Self { relations }
    }
}

#[async_trait]
impl RelationStore for StaticRelationStore {
    async fn relationships(
        &self,
        _query: &str,
        _hits: &[ContextHit],
    ) -> Result<Vec<Relation>, AgentError> {
        Ok(self.relations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_llm_is_deterministic() {
        let llm = MockLlm::default();
        let a = llm.generate("Query: hello\nrest").await.unwrap();
        let b = llm.generate("Query: hello\nother rest").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "[stub] Query: hello");
    }

    #[tokio::test]
    async fn test_mock_llm_records_prompts() {
        let llm = MockLlm::default();
        llm.generate("first").await.unwrap();
        llm.generate("second").await.unwrap();
        assert_eq!(llm.last_prompt(), "second");
    }

    #[tokio::test]
    async fn test_static_search_respects_limit() {
        let hits = vec![
            ContextHit {
                source: "a".to_string(),
                content: "a".to_string(),
                score: 1.0,
            },
            ContextHit {
                source: "b".to_string(),
                content: "b".to_string(),
                score: 0.5,
            },
        ];
        let search = StaticContextSearch::new(hits);
        let result = search.search("q", 1).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].source, "a");
    }
}
