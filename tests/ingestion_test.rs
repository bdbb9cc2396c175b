//! Integration tests for persona knowledge ingestion.

use std::sync::Arc;

use socratic::adapters::InMemoryKnowledgeStore;
use socratic::domain::models::{KnowledgeConfig, PersonaConfig, PromptsConfig};
use socratic::domain::ports::KnowledgeBackend;
use socratic::services::{KnowledgeService, PersonaIngestor};

fn service(store: Arc<InMemoryKnowledgeStore>) -> KnowledgeService {
    KnowledgeService::new(
        store,
        KnowledgeConfig::default(),
        PromptsConfig::default().web_search_placeholder,
    )
}

#[test]
fn round_trip_drops_host_line_and_short_fragment() {
    let doc = "\
**HOST:** Welcome back to the program, it is a pleasure to have you with us again.

**EXPERT:** The first expert fragment, comfortably longer than twenty characters.

**EXPERT:** Too short.

**EXPERT:** The second expert fragment, also comfortably longer than twenty characters.";

    let ingestor = PersonaIngestor::new(PersonaConfig::default());
    let fragments = ingestor.parse_fragments(doc);

    assert_eq!(fragments.len(), 2);
    assert!(fragments[0]
        .text
        .starts_with("The first expert fragment"));
    assert!(fragments[1]
        .text
        .starts_with("The second expert fragment"));
    assert_eq!(fragments[0].id, "persona_doc_1");
    assert_eq!(fragments[1].id, "persona_doc_2");
}

#[tokio::test]
async fn ingest_loads_file_fragments_into_expert_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("persona.md");
    std::fs::write(
        &path,
        "A lasting conviction that institutions must answer to the people they claim to serve.\n\n\
Another conviction about the slow, unglamorous work behind every durable reform.",
    )
    .unwrap();

    let mut persona = PersonaConfig::default();
    persona.persona_file = path.display().to_string();

    let store = Arc::new(InMemoryKnowledgeStore::new());
    let knowledge = service(store.clone());
    knowledge.initialize().await.unwrap();

    let count = PersonaIngestor::new(persona)
        .ingest(&knowledge)
        .await
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(store.count("expert_knowledge").await, 2);

    let results = store
        .query("expert_knowledge", "durable reform work", 1, None)
        .await
        .unwrap();
    assert!(results[0].contains("unglamorous work"));
}

#[tokio::test]
async fn unreadable_source_falls_back_to_builtin_fragments() {
    let mut persona = PersonaConfig::default();
    persona.persona_file = "/nonexistent/persona.md".to_string();

    let store = Arc::new(InMemoryKnowledgeStore::new());
    let knowledge = service(store.clone());
    knowledge.initialize().await.unwrap();

    let count = PersonaIngestor::new(persona)
        .ingest(&knowledge)
        .await
        .unwrap();

    // The expert knowledge base is never left completely empty.
    assert_eq!(count, 2);
    assert_eq!(store.count("expert_knowledge").await, 2);
}

#[test]
fn repeated_parse_is_deterministic() {
    let doc = "A single fragment of persona knowledge that always survives filtering.";
    let ingestor = PersonaIngestor::new(PersonaConfig::default());
    assert_eq!(ingestor.parse_fragments(doc), ingestor.parse_fragments(doc));
}
