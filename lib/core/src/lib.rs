//! # ragx Core
//!
//! Core library for the ragx question answering tool.
//!
//! This crate provides the in-memory pieces of the retrieval path:
//!
//! - [`TfidfVectorizer`] - Frozen keyword-frequency text vectorizer
//! - [`FlatIndex`] - Exact nearest neighbour index over dense rows
//! - [`Document`] - A retrievable passage with free-form metadata
//! - [`prompt`] - Prompt assembly for the generation service
//!
//! ## Example
//!
//! ```rust
//! use ragx_core::{Distance, FlatIndex, TfidfVectorizer};
//!
//! let corpus = ["Ohm's law states V=IR", "Newton's second law is F=ma"];
//! let vectorizer = TfidfVectorizer::fit(corpus);
//! let index = FlatIndex::from_vectors(
//!     vectorizer.dim(),
//!     Distance::Euclidean,
//!     corpus.iter().map(|text| vectorizer.transform(text)),
//! )
//! .unwrap();
//!
//! let hits = index.search(&vectorizer.transform("What is Ohm's law?"), 1).unwrap();
//! assert_eq!(hits[0].position, 0);
//! ```

pub mod distance;
pub mod document;
pub mod error;
pub mod index;
pub mod prompt;
pub mod vector;
pub mod vectorizer;

pub use distance::Distance;
pub use document::{parse_documents, Document};
pub use error::{Error, LoadError, QueryError, Result};
pub use index::{FlatIndex, Neighbor};
pub use prompt::{build_prompt, MAX_CONTEXT_PASSAGES};
pub use vector::Vector;
pub use vectorizer::TfidfVectorizer;

/// Number of passages retrieved when the caller does not ask for a count
pub const DEFAULT_TOP_K: usize = 3;
