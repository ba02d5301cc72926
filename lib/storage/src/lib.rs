//! # ragx Storage
//!
//! Loads and writes index directories and keeps loaded stores shared.
//!
//! An index directory holds:
//!
//! - `vectorizer.bin` - fitted [`ragx_core::TfidfVectorizer`] (bincode)
//! - `index.bin` - [`ragx_core::FlatIndex`] (bincode)
//! - `docs.json` - document records, each with a `text` field
//! - `manifest.json` - optional checksums binding the three together

pub mod artifacts;
pub mod cache;
pub mod manifest;
pub mod store;
pub mod writer;

pub use artifacts::ArtifactPaths;
pub use cache::{global_cache, StoreCache};
pub use manifest::Manifest;
pub use store::{IndexStore, SearchHit};
pub use writer::write_artifacts;
