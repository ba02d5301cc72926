use atomicwrites::{AtomicFile, OverwriteBehavior};
use ragx_core::{Document, Error, FlatIndex, LoadError, Result, TfidfVectorizer};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::artifacts::{ArtifactPaths, DOCUMENTS_FILE, INDEX_FILE, VECTORIZER_FILE};
use crate::manifest::Manifest;

/// Write a complete index directory: the three artifacts plus a manifest.
///
/// Each file is replaced atomically. The manifest is written last, so a
/// reader never sees a manifest vouching for files that are not in place.
pub fn write_artifacts<P: AsRef<Path>>(
    dir: P,
    vectorizer: &TfidfVectorizer,
    index: &FlatIndex,
    documents: &[Document],
) -> Result<Manifest> {
    if vectorizer.dim() != index.dim() {
        return Err(LoadError::DimensionMismatch {
            vectorizer: vectorizer.dim(),
            index: index.dim(),
        }
        .into());
    }
    if index.len() != documents.len() {
        return Err(LoadError::CountMismatch {
            vectors: index.len(),
            documents: documents.len(),
        }
        .into());
    }

    let paths = ArtifactPaths::new(dir);
    std::fs::create_dir_all(&paths.root)?;

    let vectorizer_bytes =
        bincode::serialize(vectorizer).map_err(|e| Error::Serialization(e.to_string()))?;
    let index_bytes = bincode::serialize(index).map_err(|e| Error::Serialization(e.to_string()))?;
    let documents_bytes =
        serde_json::to_vec_pretty(documents).map_err(|e| Error::Serialization(e.to_string()))?;

    let mut manifest = Manifest::new(documents.len(), index.dim(), index.distance());
    manifest.record(VECTORIZER_FILE, &vectorizer_bytes);
    manifest.record(INDEX_FILE, &index_bytes);
    manifest.record(DOCUMENTS_FILE, &documents_bytes);
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).map_err(|e| Error::Serialization(e.to_string()))?;

    write_atomic(&paths.vectorizer, &vectorizer_bytes)?;
    write_atomic(&paths.index, &index_bytes)?;
    write_atomic(&paths.documents, &documents_bytes)?;
    write_atomic(&paths.manifest, &manifest_bytes)?;

    info!(
        "Wrote index to {:?}: {} documents, {} dimensions",
        paths.root,
        documents.len(),
        index.dim()
    );
    Ok(manifest)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(bytes))
        .map_err(std::io::Error::from)?;
    Ok(())
}
