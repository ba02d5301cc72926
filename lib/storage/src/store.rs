use ragx_core::{
    parse_documents, Distance, Document, Error, FlatIndex, LoadError, QueryError, Result,
    TfidfVectorizer,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::artifacts::{read_artifact, read_optional_artifact, ArtifactPaths};
use crate::artifacts::{DOCUMENTS_FILE, INDEX_FILE, VECTORIZER_FILE};
use crate::manifest::Manifest;

/// A retrieved passage with its position and distance to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub position: usize,
    pub distance: f32,
    pub text: String,
}

/// Read-only retrieval over a pre-built corpus.
///
/// Holds the frozen vectorizer, the index and the position-aligned documents.
/// Nothing is mutated after construction, so a store can be shared across
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct IndexStore {
    root: Option<PathBuf>,
    vectorizer: TfidfVectorizer,
    index: FlatIndex,
    documents: Vec<Document>,
}

impl IndexStore {
    /// Load the artifacts of an index directory.
    ///
    /// All files are read before any is decoded, and a manifest, when
    /// present, must vouch for every one of them.
    pub fn load<P: AsRef<Path>>(dir: P) -> std::result::Result<Self, LoadError> {
        let started = Instant::now();
        let paths = ArtifactPaths::new(dir);

        let vectorizer_bytes = read_artifact(&paths.vectorizer)?;
        let index_bytes = read_artifact(&paths.index)?;
        let documents_bytes = read_artifact(&paths.documents)?;

        if let Some(manifest_bytes) = read_optional_artifact(&paths.manifest)? {
            let manifest = Manifest::parse(&manifest_bytes)?;
            manifest.verify(VECTORIZER_FILE, &vectorizer_bytes)?;
            manifest.verify(INDEX_FILE, &index_bytes)?;
            manifest.verify(DOCUMENTS_FILE, &documents_bytes)?;
            debug!("Manifest checksums verified for {:?}", paths.root);
        }

        let vectorizer: TfidfVectorizer =
            bincode::deserialize(&vectorizer_bytes).map_err(|e| LoadError::Corrupt {
                artifact: "vectorizer",
                reason: e.to_string(),
            })?;
        vectorizer
            .validate()
            .map_err(|reason| LoadError::Corrupt { artifact: "vectorizer", reason })?;

        let index: FlatIndex = bincode::deserialize(&index_bytes).map_err(|e| LoadError::Corrupt {
            artifact: "index",
            reason: e.to_string(),
        })?;
        index
            .validate()
            .map_err(|reason| LoadError::Corrupt { artifact: "index", reason })?;

        let records: Vec<serde_json::Value> =
            serde_json::from_slice(&documents_bytes).map_err(|e| LoadError::Corrupt {
                artifact: "documents",
                reason: e.to_string(),
            })?;
        let documents = parse_documents(records)?;

        let mut store = Self::from_parts(vectorizer, index, documents)?;
        info!(
            "Loaded index from {:?}: {} documents, {} dimensions, {:?} distance in {:?}",
            paths.root,
            store.len(),
            store.dim(),
            store.distance(),
            started.elapsed()
        );
        store.root = Some(paths.root);
        Ok(store)
    }

    /// Assemble a store from in-memory parts, enforcing position alignment
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        index: FlatIndex,
        documents: Vec<Document>,
    ) -> std::result::Result<Self, LoadError> {
        if vectorizer.dim() != index.dim() {
            return Err(LoadError::DimensionMismatch {
                vectorizer: vectorizer.dim(),
                index: index.dim(),
            });
        }
        if index.len() != documents.len() {
            return Err(LoadError::CountMismatch {
                vectors: index.len(),
                documents: documents.len(),
            });
        }
        Ok(Self {
            root: None,
            vectorizer,
            index,
            documents,
        })
    }

    /// Fit a vectorizer over `documents` and index them.
    ///
    /// Convenience for fixtures and benchmarks; production stores come from
    /// [`IndexStore::load`].
    pub fn from_documents(documents: Vec<Document>, distance: Distance) -> Result<Self> {
        let vectorizer = TfidfVectorizer::fit(documents.iter().map(|d| d.text.as_str()));
        let index = FlatIndex::from_vectors(
            vectorizer.dim(),
            distance,
            documents.iter().map(|d| vectorizer.transform(&d.text)),
        )?;
        Self::from_parts(vectorizer, index, documents).map_err(Error::from)
    }

    /// Texts of the `top_k` documents nearest to `query`, nearest first
    pub fn search(&self, query: &str, top_k: usize) -> std::result::Result<Vec<String>, QueryError> {
        Ok(self
            .search_scored(query, top_k)?
            .into_iter()
            .map(|hit| hit.text)
            .collect())
    }

    pub fn search_scored(
        &self,
        query: &str,
        top_k: usize,
    ) -> std::result::Result<Vec<SearchHit>, QueryError> {
        let query_vector = self.vectorizer.transform(query);
        let neighbors = self.index.search(&query_vector, top_k)?;

        let hits: Vec<SearchHit> = neighbors
            .into_iter()
            .filter_map(|n| {
                // Positions past the collection mean "no further neighbour"
                self.documents.get(n.position).map(|doc| SearchHit {
                    position: n.position,
                    distance: n.distance,
                    text: doc.text.clone(),
                })
            })
            .collect();

        debug!(
            "Query {:?} (top_k={}) matched {} documents",
            query,
            top_k,
            hits.len()
        );
        Ok(hits)
    }

    /// Directory the store was loaded from, if any
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    #[inline]
    pub fn distance(&self) -> Distance {
        self.index.distance()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }
}
