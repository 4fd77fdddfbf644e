/// End-to-end integration tests for the repolens pipeline.
///
/// Tests the complete flow:
///   Parse → Serialize → Store → Search → Agent query
use std::fs;
use std::sync::Arc;

use tempfile::tempdir;
use tokio::sync::Mutex as TokioMutex;

use repolens::agent::mock::MockLlm;
use repolens::agent::store::{DbContextSearch, DbRelationStore};
use repolens::agent::{DeveloperAgent, SourceKind};
use repolens::config::Config;
use repolens::db::Db;
use repolens::parser::{Language, ParsedRepository, RepoParser};

fn write_fixture_repo(dir: &std::path::Path) {
    fs::write(
        dir.join("service.py"),
        concat!(
            "import os\n",
            "from pathlib import Path\n",
            "\n",
            "class Service(Base):\n",
            "    def run(self, task):\n",
            "        return dispatch(task)\n",
            "\n",
            "    def stop(self):\n",
            "        pass\n",
            "\n",
            "def dispatch(task):\n",
            "    return task\n",
        ),
    )
    .unwrap();

    fs::write(dir.join("broken.py"), "def f(:\n").unwrap();

    fs::write(
        dir.join("main.go"),
        "package main\n\nfunc main() {\n\tprintln(\"hi\")\n}\n",
    )
    .unwrap();

    fs::write(dir.join("README.md"), "# Not source code\n").unwrap();
}

/// Full pipeline: create repo → parse → verify structure → round-trip →
/// store → search → delete
#[test]
fn test_parse_and_store_pipeline() {
    // 1. Setup temp dir with a small mixed-language repository
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_fixture_repo(dir);

    // 2. Parse
    let parser = RepoParser::default();
    let repo = parser.parse_repository(dir).unwrap();

    // README.md is skipped; the rest arrive sorted by path
    assert_eq!(repo.files.len(), 3, "Should parse 3 recognized files");
    assert!(repo.files[0].path.ends_with("broken.py"));
    assert!(repo.files[1].path.ends_with("main.go"));
    assert!(repo.files[2].path.ends_with("service.py"));

    // 3. Per-file expectations
    let broken = &repo.files[0];
    assert!(broken.error.is_some(), "Malformed file should carry an error");
    assert!(!broken.chunks.is_empty(), "Chunks survive structural failure");
    assert!(broken.classes.is_empty());

    let go_file = &repo.files[1];
    assert_eq!(go_file.language, Language::Go);
    assert!(go_file.error.is_none());
    assert!(go_file.classes.is_empty() && go_file.functions.is_empty());
    assert!(!go_file.chunks.is_empty());

    let service = &repo.files[2];
    assert!(service.error.is_none());
    assert_eq!(service.classes.len(), 1);
    let class = &service.classes[0];
    assert_eq!(class.name, "Service");
    assert_eq!(class.bases, vec!["Base"]);
    assert_eq!(class.methods.len(), 2);
    assert_eq!(service.functions.len(), 1);
    assert_eq!(service.functions[0].name, "dispatch");
    assert_eq!(service.imports.len(), 2);

    // Chunk coverage: contiguous 0-based spans over the whole file
    let last_line = service.content.lines().count() - 1;
    assert_eq!(service.chunks[0].start_line, 0);
    assert_eq!(service.chunks.last().unwrap().end_line, last_line);
    for pair in service.chunks.windows(2) {
        assert_eq!(pair[1].start_line, pair[0].end_line + 1);
    }

    // 4. Serialization round-trip preserves everything
    let json = serde_json::to_string(&repo).unwrap();
    let restored: ParsedRepository = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, repo);

    // 5. Store and search
    let mut db = Db::open_in_memory().unwrap();
    db.insert_repository(&repo).unwrap();

    let repos = db.list_repositories().unwrap();
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].file_count, 3);

    let hits = db.search_chunks("dispatch", 10).unwrap();
    assert!(!hits.is_empty(), "Search should find the dispatch chunks");
    for hit in &hits {
        assert!(hit.content.contains("dispatch"));
    }

    let relations = db.find_relations("Service").unwrap();
    let types: Vec<&str> = relations.iter().map(|r| r.relation_type.as_str()).collect();
    assert!(types.contains(&"method_of"));
    assert!(types.contains(&"inherits"));

    // 6. Delete
    assert!(db.delete_repository(&repo.root).unwrap());
    assert!(db.list_repositories().unwrap().is_empty());
}

/// Agent pipeline over a database-backed index and the stub LLM.
#[tokio::test]
async fn test_agent_query_over_indexed_repository() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    write_fixture_repo(dir);

    let repo = RepoParser::default().parse_repository(dir).unwrap();
    let mut db = Db::open_in_memory().unwrap();
    db.insert_repository(&repo).unwrap();
    let db = Arc::new(TokioMutex::new(db));

    let agent = DeveloperAgent::new(
        Arc::new(MockLlm::default()),
        Arc::new(DbContextSearch::new(db.clone())),
        Arc::new(DbRelationStore::new(db)),
        5,
        5,
    );

    let response = agent
        .process_query("how does Service dispatch a task?")
        .await
        .unwrap();

    assert_eq!(response.query, "how does Service dispatch a task?");
    assert!(!response.response.is_empty());
    assert!(
        !response.sources.is_empty(),
        "Query touching indexed symbols should report sources"
    );
    assert!(response.sources.iter().any(|s| s.kind == SourceKind::Code));
}

/// Test config defaults and validation
#[test]
fn test_config_defaults_and_validation() {
    let config = Config::default();

    assert_eq!(config.chunk_size, 1000);
    assert_eq!(config.search_top_k, 5);
    assert_eq!(config.context_limit, 5);
    assert!(config.validate().is_ok());

    let mut bad_config = Config::default();
    bad_config.chunk_size = 0;
    assert!(bad_config.validate().is_err());
}

/// A repository that is just one file exercises the documented single-file
/// contract end to end.
#[test]
fn test_minimal_repository_scenario() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("a.py"), "def f(x):\n    return x\n").unwrap();

    let repo = RepoParser::default().parse_repository(dir).unwrap();

    assert_eq!(repo.files.len(), 1);
    let file = &repo.files[0];
    assert!(file.classes.is_empty());
    assert_eq!(file.functions.len(), 1);
    assert_eq!(file.functions[0].name, "f");
    assert_eq!(file.functions[0].parameters, vec!["x"]);
    assert_eq!(file.functions[0].start_line, 1);
    assert_eq!(file.functions[0].end_line, 2);

    assert_eq!(file.chunks.len(), 1);
    assert_eq!(file.chunks[0].start_line, 0);
    assert_eq!(file.chunks[0].end_line, 1);
}
