//! # ragx
//!
//! A small local retrieval-augmented question answering tool.
//!
//! ragx loads a pre-built TF-IDF index from disk, retrieves the passages
//! closest to a question and asks a local Ollama model to answer from them.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! ragx --db-path ./rag_db serve --http-port 8501
//! ```
//!
//! ### From the Command Line
//!
//! ```bash
//! ragx --db-path ./rag_db ask "What is Ohm's law?"
//! ragx --db-path ./rag_db search "Ohm's law" --top-k 5
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use ragx::prelude::*;
//!
//! let store = IndexStore::load("rag_db").unwrap();
//! let passages = store.search("What is Ohm's law?", DEFAULT_TOP_K).unwrap();
//! let prompt = build_prompt(&passages, "What is Ohm's law?");
//! ```
//!
//! ## Crate Structure
//!
//! - `ragx-core` - Vectorizer, flat index, documents, prompt assembly
//! - `ragx-storage` - Artifact loading and writing, manifests, store cache
//! - `ragx-api` - Ollama client, answer service, web front end

// Re-export core types
pub use ragx_core::{
    build_prompt, Distance, Document, Error, FlatIndex, LoadError, Neighbor, QueryError, Result,
    TfidfVectorizer, Vector, DEFAULT_TOP_K, MAX_CONTEXT_PASSAGES,
};

// Re-export storage
pub use ragx_storage::{global_cache, write_artifacts, IndexStore, Manifest, SearchHit, StoreCache};

// Re-export API
pub use ragx_api::{
    Answer, AnswerConfig, AnswerService, GenerationError, Generator, OllamaClient, RestApi,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_prompt, Answer, AnswerConfig, AnswerService, Distance, Document, Generator,
        IndexStore, LoadError, OllamaClient, QueryError, StoreCache, TfidfVectorizer,
        DEFAULT_TOP_K,
    };
}
