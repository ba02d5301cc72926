use ragx_core::LoadError;
use std::path::{Path, PathBuf};

pub const VECTORIZER_FILE: &str = "vectorizer.bin";
pub const INDEX_FILE: &str = "index.bin";
pub const DOCUMENTS_FILE: &str = "docs.json";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Locations of the artifacts inside one index directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub root: PathBuf,
    pub vectorizer: PathBuf,
    pub index: PathBuf,
    pub documents: PathBuf,
    pub manifest: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let root = dir.as_ref().to_path_buf();
        Self {
            vectorizer: root.join(VECTORIZER_FILE),
            index: root.join(INDEX_FILE),
            documents: root.join(DOCUMENTS_FILE),
            manifest: root.join(MANIFEST_FILE),
            root,
        }
    }
}

/// Read a required artifact, distinguishing absence from other IO failures
pub(crate) fn read_artifact(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::MissingArtifact {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Read an artifact that may legitimately be absent
pub(crate) fn read_optional_artifact(path: &Path) -> Result<Option<Vec<u8>>, LoadError> {
    match read_artifact(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(LoadError::MissingArtifact { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_joined_onto_root() {
        let paths = ArtifactPaths::new("/srv/rag_db");
        assert_eq!(paths.vectorizer, PathBuf::from("/srv/rag_db/vectorizer.bin"));
        assert_eq!(paths.index, PathBuf::from("/srv/rag_db/index.bin"));
        assert_eq!(paths.documents, PathBuf::from("/srv/rag_db/docs.json"));
        assert_eq!(paths.manifest, PathBuf::from("/srv/rag_db/manifest.json"));
    }

    #[test]
    fn test_missing_artifact() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(INDEX_FILE);
        assert!(matches!(read_artifact(&path), Err(LoadError::MissingArtifact { .. })));
        assert!(read_optional_artifact(&path).unwrap().is_none());

        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(read_artifact(&path).unwrap(), b"abc");
    }
}
