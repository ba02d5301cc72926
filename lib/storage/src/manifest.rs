//! Checksummed manifest tying the three artifacts to one snapshot.
//!
//! The manifest is optional on load. When present, every artifact must hash
//! to the value recorded at write time, which rules out mixing files from
//! different builds of the corpus.

use ragx_core::{Distance, LoadError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub format_version: u32,
    pub document_count: usize,
    pub dimension: usize,
    pub distance: Distance,
    /// artifact file name -> hex sha256
    pub checksums: BTreeMap<String, String>,
}

/// Hex encoded SHA-256 of an artifact
pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

impl Manifest {
    pub fn new(document_count: usize, dimension: usize, distance: Distance) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            document_count,
            dimension,
            distance,
            checksums: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, artifact: &str, bytes: &[u8]) {
        self.checksums.insert(artifact.to_string(), checksum(bytes));
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, LoadError> {
        let manifest: Manifest = serde_json::from_slice(bytes).map_err(|e| LoadError::Corrupt {
            artifact: "manifest",
            reason: e.to_string(),
        })?;
        if manifest.format_version != FORMAT_VERSION {
            return Err(LoadError::Corrupt {
                artifact: "manifest",
                reason: format!(
                    "unsupported format version {} (expected {})",
                    manifest.format_version, FORMAT_VERSION
                ),
            });
        }
        Ok(manifest)
    }

    /// Check an artifact against its recorded checksum.
    /// Artifacts the manifest does not list are rejected.
    pub fn verify(&self, artifact: &str, bytes: &[u8]) -> Result<(), LoadError> {
        let expected = self.checksums.get(artifact).ok_or_else(|| LoadError::Corrupt {
            artifact: "manifest",
            reason: format!("no checksum recorded for {}", artifact),
        })?;
        let actual = checksum(bytes);
        if &actual != expected {
            return Err(LoadError::ChecksumMismatch {
                artifact: artifact.to_string(),
                expected: expected.clone(),
                actual,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_hex_sha256() {
        assert_eq!(
            checksum(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_verify() {
        let mut manifest = Manifest::new(2, 8, Distance::Euclidean);
        manifest.record("index.bin", b"index bytes");

        assert!(manifest.verify("index.bin", b"index bytes").is_ok());
        assert!(matches!(
            manifest.verify("index.bin", b"other bytes"),
            Err(LoadError::ChecksumMismatch { .. })
        ));
        assert!(matches!(
            manifest.verify("docs.json", b"[]"),
            Err(LoadError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        let mut manifest = Manifest::new(0, 0, Distance::Cosine);
        manifest.format_version = 99;
        let bytes = serde_json::to_vec(&manifest).unwrap();
        assert!(matches!(Manifest::parse(&bytes), Err(LoadError::Corrupt { .. })));

        manifest.format_version = FORMAT_VERSION;
        let bytes = serde_json::to_vec(&manifest).unwrap();
        assert_eq!(Manifest::parse(&bytes).unwrap(), manifest);
    }
}
