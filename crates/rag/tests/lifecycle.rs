mod common;

use common::{write_pdf, Fixture};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tp_providers::{StubChatModel, StubEmbeddings};
use tp_rag::{InitializeOutcome, KnowledgeBaseError, KnowledgeBaseStatus};
use tp_vector_store::VectorIndex;

#[tokio::test]
async fn ask_before_initialize_is_rejected() {
    let fixture = Fixture::new();
    fixture.write_guide();
    let kb = fixture.knowledge_base();

    assert_eq!(kb.status(), KnowledgeBaseStatus::Uninitialized);
    let err = kb.ask("What is a master file?").await.unwrap_err();
    assert!(matches!(err, KnowledgeBaseError::NotInitialized));
    assert_eq!(fixture.embeddings.batch_calls(), 0);
    assert!(fixture.chat.requests().is_empty());
}

#[tokio::test]
async fn builds_from_guide_and_answers_with_sources() {
    let fixture = Fixture::new();
    fixture.write_guide();
    let kb = fixture.knowledge_base();

    let report = kb.initialize(false).await.unwrap();
    let InitializeOutcome::Built(stats) = &report.outcome else {
        panic!("expected a build, got {:?}", report.outcome);
    };
    assert_eq!(stats.files, 1);
    assert_eq!(stats.pages, 3);
    assert_eq!(report.documents, 1);
    assert!(report.chunks > 5);
    assert_eq!(
        report.message,
        format!(
            "Successfully created knowledge base with {} text chunks from 1 documents",
            report.chunks
        )
    );
    assert_eq!(fixture.embeddings.embedded_texts(), report.chunks);
    assert_eq!(
        kb.status(),
        KnowledgeBaseStatus::Ready {
            chunks: report.chunks
        }
    );
    assert!(fixture.snapshot_path().exists());

    let result = kb.ask("What is the arm's length principle?").await.unwrap();
    assert!(!result.answer.is_empty());
    assert_eq!(result.sources.len(), 5);
    assert!(result
        .sources
        .iter()
        .all(|s| s.content.chars().count() <= 203));
    assert!(result.sources.iter().any(|s| s.content.ends_with("...")));
    assert!(result
        .sources
        .iter()
        .all(|s| s.metadata.source == "guide.pdf" && (1..=3).contains(&s.metadata.page)));

    let requests = fixture.chat.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, 0.0);
    assert!(requests[0].prompt.contains("Context:\n"));
    assert!(requests[0].prompt.contains("arm length principle"));
    assert!(requests[0]
        .prompt
        .contains("Question: What is the arm's length principle?"));
}

#[tokio::test]
async fn existing_snapshot_is_loaded_without_embedding() {
    let fixture = Fixture::new();
    fixture.write_guide();
    let built = fixture.knowledge_base().initialize(true).await.unwrap();

    let embeddings = Arc::new(StubEmbeddings::default());
    let kb = tp_rag::KnowledgeBase::new(
        fixture.config(),
        embeddings.clone(),
        Arc::new(StubChatModel::new()),
    )
    .unwrap();

    let report = kb.initialize(false).await.unwrap();
    assert_eq!(report.outcome, InitializeOutcome::Loaded);
    assert_eq!(report.message, "Successfully loaded existing knowledge base");
    assert_eq!(report.chunks, built.chunks);
    assert_eq!(report.documents, 1);
    assert_eq!(embeddings.batch_calls(), 0);

    kb.ask("What goes in a local file?").await.unwrap();
    assert_eq!(embeddings.batch_calls(), 1);
    assert_eq!(embeddings.embedded_texts(), 1);
}

#[tokio::test]
async fn force_refresh_always_rebuilds() {
    let fixture = Fixture::new();
    fixture.write_guide();
    let kb = fixture.knowledge_base();

    let first = kb.initialize(false).await.unwrap();
    let embedded_after_first = fixture.embeddings.embedded_texts();
    assert_eq!(embedded_after_first, first.chunks);

    let second = kb.initialize(true).await.unwrap();
    assert!(matches!(second.outcome, InitializeOutcome::Built(_)));
    assert_eq!(second.chunks, first.chunks);
    assert_eq!(
        fixture.embeddings.embedded_texts(),
        embedded_after_first + second.chunks
    );
}

#[tokio::test]
async fn refresh_picks_up_new_documents() {
    let fixture = Fixture::new();
    fixture.write_guide();
    let kb = fixture.knowledge_base();
    let first = kb.initialize(false).await.unwrap();

    write_pdf(
        &fixture.documents_dir().join("faq").join("questions.pdf"),
        &[vec!["Who files the disclosure form?"]],
    );

    let loaded = kb.initialize(false).await.unwrap();
    assert_eq!(loaded.outcome, InitializeOutcome::Loaded);
    assert_eq!(loaded.chunks, first.chunks);

    let rebuilt = kb.initialize(true).await.unwrap();
    assert_eq!(rebuilt.documents, 2);
    assert_eq!(rebuilt.chunks, first.chunks + 1);
    assert!(rebuilt.message.ends_with("from 2 documents"));
}

#[tokio::test]
async fn corrupt_snapshot_falls_back_to_rebuild() {
    let fixture = Fixture::new();
    fixture.write_guide();
    std::fs::create_dir_all(fixture.snapshot_path().parent().unwrap()).unwrap();
    std::fs::write(fixture.snapshot_path(), b"{\"version\": 1, \"entries\": [").unwrap();

    let kb = fixture.knowledge_base();
    let report = kb.initialize(false).await.unwrap();

    assert!(matches!(report.outcome, InitializeOutcome::Built(_)));
    assert!(kb.status().is_ready());
    let reloaded = VectorIndex::load(fixture.snapshot_path()).await.unwrap();
    assert_eq!(reloaded.len(), report.chunks);
}

#[tokio::test]
async fn snapshot_from_another_model_is_rebuilt() {
    let fixture = Fixture::new();
    fixture.write_guide();
    fixture.knowledge_base().initialize(true).await.unwrap();

    let embeddings = Arc::new(StubEmbeddings::default().with_model_id("stub-embedding-v2"));
    let kb = tp_rag::KnowledgeBase::new(
        fixture.config(),
        embeddings.clone(),
        Arc::new(StubChatModel::new()),
    )
    .unwrap();

    let report = kb.initialize(false).await.unwrap();
    assert!(matches!(report.outcome, InitializeOutcome::Built(_)));
    assert_eq!(embeddings.embedded_texts(), report.chunks);

    let reloaded = VectorIndex::load(fixture.snapshot_path()).await.unwrap();
    assert_eq!(reloaded.model_id(), "stub-embedding-v2");
}

#[tokio::test]
async fn empty_root_is_a_configuration_error() {
    let fixture = Fixture::new();
    std::fs::create_dir_all(fixture.documents_dir()).unwrap();
    let kb = fixture.knowledge_base();

    let err = kb.initialize(true).await.unwrap_err();
    match &err {
        KnowledgeBaseError::Configuration(message) => {
            assert!(message.starts_with("No PDF files found in"));
        }
        other => panic!("expected a configuration error, got {other:?}"),
    }

    assert!(!kb.status().is_ready());
    assert!(matches!(kb.status(), KnowledgeBaseStatus::Failed { .. }));
    assert!(matches!(
        kb.ask("anything").await.unwrap_err(),
        KnowledgeBaseError::NotInitialized
    ));
    assert!(!fixture.snapshot_path().exists());
}

#[tokio::test]
async fn failed_rebuild_drops_the_previous_pipeline() {
    let fixture = Fixture::new();
    fixture.write_guide();
    let kb = fixture.knowledge_base();
    kb.initialize(false).await.unwrap();

    std::fs::remove_file(fixture.documents_dir().join("guide.pdf")).unwrap();
    assert!(kb.initialize(true).await.is_err());
    assert_eq!(kb.status().as_str(), "failed");
    assert!(kb.ask("anything").await.is_err());
}

#[tokio::test]
async fn get_documents_lists_relative_paths() {
    let fixture = Fixture::new();
    let kb = fixture.knowledge_base();
    assert!(kb.get_documents().await.unwrap().is_empty());

    std::fs::create_dir_all(fixture.documents_dir()).unwrap();
    assert!(kb.get_documents().await.unwrap().is_empty());

    fixture.write_guide();
    write_pdf(
        &fixture.documents_dir().join("annex").join("forms.pdf"),
        &[vec!["Form TP-1"]],
    );
    assert_eq!(
        kb.get_documents().await.unwrap(),
        vec!["annex/forms.pdf", "guide.pdf"]
    );
}

#[tokio::test]
async fn concurrent_initialize_calls_are_serialized() {
    let fixture = Fixture::new();
    fixture.write_guide();
    let kb = Arc::new(fixture.knowledge_base());

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let kb = Arc::clone(&kb);
            tokio::spawn(async move { kb.initialize(true).await })
        })
        .collect();

    let mut chunks = Vec::new();
    for handle in handles {
        chunks.push(handle.await.unwrap().unwrap().chunks);
    }
    assert!(chunks.windows(2).all(|w| w[0] == w[1]));
    assert!(kb.status().is_ready());

    let asks: Vec<_> = (0..4)
        .map(|i| {
            let kb = Arc::clone(&kb);
            tokio::spawn(async move { kb.ask(&format!("question {i}")).await })
        })
        .collect();
    for ask in asks {
        assert_eq!(ask.await.unwrap().unwrap().sources.len(), 5);
    }
}
