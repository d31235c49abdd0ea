#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tp_chunker::ChunkerConfig;
use tp_providers::{StubChatModel, StubEmbeddings};
use tp_rag::{KnowledgeBase, KnowledgeBaseConfig};

#[path = "../../../indexer/tests/common/mod.rs"]
mod pdf;

pub use pdf::write_pdf;

/// Three pages of guide text, each long enough for two 300-character chunks
pub fn guide_pages() -> Vec<Vec<String>> {
    let topics = [
        "The arm length principle requires related party transactions to be priced",
        "Transfer pricing documentation includes a master file and a local file",
        "Disclosure forms must be filed together with the corporate tax return",
    ];
    topics
        .iter()
        .enumerate()
        .map(|(page, topic)| {
            (1..=6)
                .map(|line| format!("Section {}.{line} {topic} line {line}.", page + 1))
                .collect()
        })
        .collect()
}

pub struct Fixture {
    pub temp: TempDir,
    pub embeddings: Arc<StubEmbeddings>,
    pub chat: Arc<StubChatModel>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_providers(StubEmbeddings::default(), StubChatModel::new())
    }

    pub fn with_providers(embeddings: StubEmbeddings, chat: StubChatModel) -> Self {
        Self {
            temp: TempDir::new().unwrap(),
            embeddings: Arc::new(embeddings),
            chat: Arc::new(chat),
        }
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.temp.path().join("data").join("documents")
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.temp.path().join("vector_db").join("index.json")
    }

    pub fn write_guide(&self) {
        let pages = guide_pages();
        let pages: Vec<Vec<&str>> = pages
            .iter()
            .map(|lines| lines.iter().map(String::as_str).collect())
            .collect();
        write_pdf(&self.documents_dir().join("guide.pdf"), &pages);
    }

    pub fn config(&self) -> KnowledgeBaseConfig {
        KnowledgeBaseConfig::new(self.documents_dir(), self.snapshot_path())
            .with_chunker(ChunkerConfig::new(300, 30))
            .with_provider_timeout(Duration::from_secs(5))
    }

    pub fn knowledge_base(&self) -> KnowledgeBase {
        self.knowledge_base_with(self.config())
    }

    pub fn knowledge_base_with(&self, config: KnowledgeBaseConfig) -> KnowledgeBase {
        KnowledgeBase::new(config, self.embeddings.clone(), self.chat.clone()).unwrap()
    }
}
