//! TF-IDF text vectorizer.
//!
//! The vectorizer is fitted once over the corpus that the index was built
//! from and then frozen; queries are only ever transformed, never refitted.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::Vector;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfVectorizer {
    // term -> output column
    vocabulary: AHashMap<String, usize>,
    // column -> inverse document frequency
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Tokenize text for vectorization.
    /// Lowercases and keeps runs of word characters at least two chars long.
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().count() > 1) // Filter single chars
            .map(str::to_string)
            .collect()
    }

    /// Fit vocabulary and idf weights over a corpus.
    ///
    /// Columns are assigned in lexicographic term order and idf is smoothed:
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<I, S>(corpus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // term -> document frequency
        let mut term_dfs: BTreeMap<String, u32> = BTreeMap::new();
        let mut total_docs: u64 = 0;

        for text in corpus {
            let unique: HashSet<String> = Self::tokenize(text.as_ref()).into_iter().collect();
            for term in unique {
                *term_dfs.entry(term).or_insert(0) += 1;
            }
            total_docs += 1;
        }

        let n = total_docs as f32;
        let mut vocabulary = AHashMap::with_capacity(term_dfs.len());
        let mut idf = Vec::with_capacity(term_dfs.len());
        for (column, (term, df)) in term_dfs.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        Self { vocabulary, idf }
    }

    /// Build from already fitted parts, checking they agree with each other.
    pub fn from_parts(vocabulary: AHashMap<String, usize>, idf: Vec<f32>) -> Result<Self, String> {
        let vectorizer = Self { vocabulary, idf };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Output dimensionality (vocabulary size)
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn vocabulary(&self) -> &AHashMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&column| self.idf[column])
    }

    /// Map text to an L2-normalised tf-idf vector.
    ///
    /// Unknown terms are ignored, so text without any vocabulary term yields
    /// the zero vector.
    pub fn transform(&self, text: &str) -> Vector {
        let mut term_freqs: AHashMap<usize, u32> = AHashMap::new();
        for token in Self::tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                *term_freqs.entry(column).or_insert(0) += 1;
            }
        }

        let mut data = vec![0.0f32; self.dim()];
        for (column, tf) in term_freqs {
            data[column] = tf as f32 * self.idf[column];
        }

        let mut vector = Vector::new(data);
        vector.normalize();
        vector
    }

    /// Check the vocabulary is a bijection onto `0..dim` and idf is finite.
    pub fn validate(&self) -> Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }

        let mut seen = vec![false; self.idf.len()];
        for (term, &column) in &self.vocabulary {
            match seen.get_mut(column) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(format!("column {} assigned twice (term {:?})", column, term)),
                None => return Err(format!("term {:?} maps to out of range column {}", term, column)),
            }
        }

        if let Some(column) = self.idf.iter().position(|w| !w.is_finite()) {
            return Err(format!("idf weight for column {} is not finite", column));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<&'static str> {
        vec![
            "Ohm's law states V=IR",
            "Newton's second law is F=ma",
            "The mitochondria is the powerhouse of the cell",
        ]
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        let tokens = TfidfVectorizer::tokenize("Ohm's law states V=IR");
        assert_eq!(tokens, vec!["ohm", "law", "states", "ir"]);
    }

    #[test]
    fn test_tokenize_keeps_underscores_and_unicode() {
        let tokens = TfidfVectorizer::tokenize("snake_case Übung, é");
        assert_eq!(tokens, vec!["snake_case", "übung"]);
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let vectorizer = TfidfVectorizer::fit(corpus());
        let vocab = vectorizer.vocabulary();
        assert_eq!(vocab["cell"], 0);
        assert_eq!(vectorizer.dim(), vocab.len());

        let mut terms: Vec<_> = vocab.iter().collect();
        terms.sort_by_key(|(_, column)| **column);
        let ordered: Vec<&String> = terms.into_iter().map(|(term, _)| term).collect();
        let mut sorted = ordered.clone();
        sorted.sort();
        assert_eq!(ordered, sorted);
    }

    #[test]
    fn test_smoothed_idf() {
        let vectorizer = TfidfVectorizer::fit(corpus());
        // "law" appears in 2 of 3 documents
        let expected = (4.0f32 / 3.0).ln() + 1.0;
        assert!((vectorizer.idf("law").unwrap() - expected).abs() < 1e-6);
        // "ohm" appears once
        let expected = (4.0f32 / 2.0).ln() + 1.0;
        assert!((vectorizer.idf("ohm").unwrap() - expected).abs() < 1e-6);
        assert!(vectorizer.idf("quantum").is_none());
    }

    #[test]
    fn test_transform_is_unit_length() {
        let vectorizer = TfidfVectorizer::fit(corpus());
        let v = vectorizer.transform("What is Ohm's law?");
        let magnitude: f32 = v.as_slice().iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_unknown_text_is_zero() {
        let vectorizer = TfidfVectorizer::fit(corpus());
        assert!(vectorizer.transform("").is_zero());
        assert!(vectorizer.transform("quantum chromodynamics").is_zero());
        assert_eq!(vectorizer.transform("").dim(), vectorizer.dim());
    }

    #[test]
    fn test_repeated_terms_weigh_more() {
        let vectorizer = TfidfVectorizer::fit(corpus());
        let v = vectorizer.transform("law law ohm");
        let law = v.as_slice()[vectorizer.vocabulary()["law"]];
        let ohm = v.as_slice()[vectorizer.vocabulary()["ohm"]];
        // 2 * idf(law) vs 1 * idf(ohm)
        let ratio = law / ohm;
        let expected = 2.0 * vectorizer.idf("law").unwrap() / vectorizer.idf("ohm").unwrap();
        assert!((ratio - expected).abs() < 1e-5);
    }

    #[test]
    fn test_validate_rejects_inconsistent_parts() {
        let mut vocabulary = AHashMap::new();
        vocabulary.insert("a1".to_string(), 0);
        vocabulary.insert("b2".to_string(), 0);
        assert!(TfidfVectorizer::from_parts(vocabulary.clone(), vec![1.0, 1.0]).is_err());

        vocabulary.insert("b2".to_string(), 5);
        assert!(TfidfVectorizer::from_parts(vocabulary.clone(), vec![1.0, 1.0]).is_err());

        vocabulary.insert("b2".to_string(), 1);
        assert!(TfidfVectorizer::from_parts(vocabulary.clone(), vec![1.0, f32::NAN]).is_err());
        assert!(TfidfVectorizer::from_parts(vocabulary, vec![1.0, 2.0]).is_ok());
    }

    #[test]
    fn test_bincode_preserves_fit() {
        let vectorizer = TfidfVectorizer::fit(corpus());
        let bytes = bincode::serialize(&vectorizer).unwrap();
        let restored: TfidfVectorizer = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.transform("ohm law"), vectorizer.transform("ohm law"));
    }
}
