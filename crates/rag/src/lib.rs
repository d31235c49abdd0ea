//! # Transfer Pricing RAG
//!
//! Retrieval-augmented answering over the transfer pricing document corpus.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──initialize──> Ready ──initialize(force)──> Ready
//!       │                         │
//!       └──── build error ──> Failed <──── build error ─────┘
//! ```
//!
//! `initialize(false)` loads `vector_db/index.json` when it exists and was
//! written with the configured embedding model. Anything else falls back to a
//! full build: scan PDFs, split pages into chunks, embed, persist.
//!
//! ## Answering
//!
//! ```text
//! question ──> embed ──> top-5 chunks ──> prompt ──> chat model (temperature 0)
//!                              │                          │
//!                              └── sources (200 chars) ───┴──> QueryResult
//! ```

mod answering;
mod config;
mod error;
mod knowledge_base;
mod prompt;

pub use answering::{truncate_preview, AnsweringPipeline, QueryResult, SourceRecord};
pub use config::{
    KnowledgeBaseConfig, DEFAULT_DOCUMENTS_DIR, DEFAULT_PROVIDER_TIMEOUT, DEFAULT_SNAPSHOT_PATH,
    DEFAULT_SOURCE_PREVIEW_CHARS, DEFAULT_TOP_K,
};
pub use error::{KnowledgeBaseError, Result};
pub use knowledge_base::{
    InitializeOutcome, InitializeReport, KnowledgeBase, KnowledgeBaseStatus,
};
pub use prompt::{join_context, render_prompt};
