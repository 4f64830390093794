//! Dictionary featurizer for review text.
//!
//! Text goes through an analyzer, is expanded into word n-grams and
//! per-word character n-grams, and each term seen during [`Featurizer::fit`]
//! gets a fixed vector index. Terms never seen during fitting are ignored,
//! so text made only of unknown words (or the empty string) maps to the
//! all-zero vector.

use std::collections::HashSet;
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, ReviewAnalyzer};
use crate::analysis::tokenizer::{CharNgramTokenizer, Tokenizer};
use crate::error::{Result, SentimentError};
use crate::ml::vector::FeatureVector;

const WORD_PREFIX: &str = "w:";
const CHAR_PREFIX: &str = "c:";

/// Text-to-vector transform.
pub trait Featurizer: Send + Sync {
    /// Build the vocabulary from training documents.
    fn fit(&mut self, documents: &[&str]) -> Result<()>;

    /// Transform a document into a vector of [`Featurizer::dimension`] entries.
    fn featurize(&self, text: &str) -> Result<FeatureVector>;

    /// Vector dimension (vocabulary size once fitted).
    fn dimension(&self) -> usize;

    /// Whether [`Featurizer::fit`] has run.
    fn is_fitted(&self) -> bool;
}

/// How term counts are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Raw term counts.
    Tf,
    /// Term counts scaled by `ln((N + 1) / (df + 1)) + 1`.
    TfIdf,
}

/// Featurizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturizerOptions {
    /// Longest word n-gram (1 = unigrams only).
    pub word_ngram_length: usize,
    /// Character n-gram length inside `<word>`; 0 disables char grams.
    pub char_ngram_length: usize,
    /// Term weighting.
    pub weighting: Weighting,
    /// Scale each vector to unit length.
    pub normalize: bool,
    /// Drop English stop words (negations are always kept).
    pub remove_stop_words: bool,
    /// Minimum number of training documents a term must occur in.
    pub min_document_frequency: usize,
}

impl Default for FeaturizerOptions {
    fn default() -> Self {
        Self {
            word_ngram_length: 2,
            char_ngram_length: 3,
            weighting: Weighting::Tf,
            normalize: true,
            remove_stop_words: false,
            min_document_frequency: 1,
        }
    }
}

impl FeaturizerOptions {
    pub fn validate(&self) -> Result<()> {
        if self.word_ngram_length == 0 {
            return Err(SentimentError::invalid_config(
                "word_ngram_length must be at least 1",
            ));
        }
        if self.min_document_frequency == 0 {
            return Err(SentimentError::invalid_config(
                "min_document_frequency must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Serializable state of a fitted [`TextFeaturizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturizerState {
    pub options: FeaturizerOptions,
    /// Terms in index order.
    pub terms: Vec<String>,
    pub idf: Vec<f64>,
    pub n_documents: usize,
}

/// Word + character n-gram featurizer with a fitted vocabulary.
pub struct TextFeaturizer {
    options: FeaturizerOptions,
    /// Term -> index.
    vocabulary: AHashMap<String, usize>,
    /// Terms in index order.
    terms: Vec<String>,
    idf: Vec<f64>,
    n_documents: usize,
    fitted: bool,
    analyzer: Arc<dyn Analyzer>,
    char_tokenizer: Option<CharNgramTokenizer>,
}

impl std::fmt::Debug for TextFeaturizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextFeaturizer")
            .field("vocabulary_size", &self.terms.len())
            .field("n_documents", &self.n_documents)
            .field("analyzer", &self.analyzer.name())
            .field("options", &self.options)
            .finish()
    }
}

impl TextFeaturizer {
    /// Create an unfitted featurizer using the default [`ReviewAnalyzer`].
    pub fn new(options: FeaturizerOptions) -> Result<Self> {
        let analyzer = Arc::new(ReviewAnalyzer::with_stop_words(options.remove_stop_words)?);
        Self::with_analyzer(options, analyzer)
    }

    /// Create an unfitted featurizer with a custom analyzer.
    pub fn with_analyzer(options: FeaturizerOptions, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        options.validate()?;
        let char_tokenizer = match options.char_ngram_length {
            0 => None,
            n => Some(CharNgramTokenizer::new(n)?),
        };

        Ok(Self {
            options,
            vocabulary: AHashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
            n_documents: 0,
            fitted: false,
            analyzer,
            char_tokenizer,
        })
    }

    /// Rebuild a fitted featurizer from its saved state.
    pub fn from_state(state: FeaturizerState) -> Result<Self> {
        if state.terms.len() != state.idf.len() {
            return Err(SentimentError::serialization(format!(
                "featurizer state has {} terms but {} idf weights",
                state.terms.len(),
                state.idf.len()
            )));
        }

        let mut featurizer = Self::new(state.options)?;
        featurizer.vocabulary = state
            .terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        if featurizer.vocabulary.len() != state.terms.len() {
            return Err(SentimentError::serialization(
                "featurizer state contains duplicate terms",
            ));
        }
        featurizer.terms = state.terms;
        featurizer.idf = state.idf;
        featurizer.n_documents = state.n_documents;
        featurizer.fitted = true;
        Ok(featurizer)
    }

    /// Snapshot of the fitted state for persistence.
    pub fn state(&self) -> FeaturizerState {
        FeaturizerState {
            options: self.options.clone(),
            terms: self.terms.clone(),
            idf: self.idf.clone(),
            n_documents: self.n_documents,
        }
    }

    pub fn options(&self) -> &FeaturizerOptions {
        &self.options
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Index of a raw term (`w:` or `c:` prefixed), if known.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Term stored at an index.
    pub fn term(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Expand a document into its (prefixed) terms, duplicates included.
    pub fn terms_of(&self, text: &str) -> Result<Vec<String>> {
        let words = self.analyzer.terms(text)?;
        let mut terms = Vec::new();

        for n in 1..=self.options.word_ngram_length {
            for window in words.windows(n) {
                terms.push(format!("{WORD_PREFIX}{}", window.join(" ")));
            }
        }

        if let Some(tokenizer) = &self.char_tokenizer {
            for word in &words {
                let padded = format!("<{word}>");
                for gram in tokenizer.tokenize(&padded)? {
                    terms.push(format!("{CHAR_PREFIX}{}", gram.text));
                }
            }
        }

        Ok(terms)
    }
}

impl Featurizer for TextFeaturizer {
    fn fit(&mut self, documents: &[&str]) -> Result<()> {
        let term_lists: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.terms_of(doc))
            .collect::<Result<_>>()?;

        // Count document frequencies
        let mut document_frequency: AHashMap<&str, usize> = AHashMap::new();
        for terms in &term_lists {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        // Assign indices in order of first occurrence
        let mut vocabulary = AHashMap::new();
        let mut ordered_terms = Vec::new();
        for term in term_lists.iter().flatten() {
            let df = document_frequency.get(term.as_str()).copied().unwrap_or(0);
            if df >= self.options.min_document_frequency && !vocabulary.contains_key(term) {
                vocabulary.insert(term.clone(), ordered_terms.len());
                ordered_terms.push(term.clone());
            }
        }

        // IDF = log((N + 1) / (df + 1)) + 1
        let n_documents = documents.len();
        let idf = ordered_terms
            .iter()
            .map(|term| {
                let df = document_frequency.get(term.as_str()).copied().unwrap_or(0);
                ((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0
            })
            .collect();

        self.vocabulary = vocabulary;
        self.terms = ordered_terms;
        self.idf = idf;
        self.n_documents = n_documents;
        self.fitted = true;
        Ok(())
    }

    fn featurize(&self, text: &str) -> Result<FeatureVector> {
        let entries: Vec<(usize, f64)> = self
            .terms_of(text)?
            .iter()
            .filter_map(|term| self.vocabulary.get(term))
            .map(|&index| {
                let weight = match self.options.weighting {
                    Weighting::Tf => 1.0,
                    Weighting::TfIdf => self.idf[index],
                };
                (index, weight)
            })
            .collect();

        let mut vector = FeatureVector::from_entries(self.dimension(), entries);
        if self.options.normalize {
            vector.normalize_l2();
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.terms.len()
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unigrams() -> FeaturizerOptions {
        FeaturizerOptions {
            word_ngram_length: 1,
            char_ngram_length: 0,
            normalize: false,
            ..FeaturizerOptions::default()
        }
    }

    #[test]
    fn test_terms_of() {
        let featurizer = TextFeaturizer::new(FeaturizerOptions {
            word_ngram_length: 2,
            char_ngram_length: 3,
            ..FeaturizerOptions::default()
        })
        .unwrap();

        let terms = featurizer.terms_of("Not bad").unwrap();
        assert_eq!(
            terms,
            vec![
                "w:not", "w:bad", "w:not bad", "c:<no", "c:not", "c:ot>", "c:<ba", "c:bad",
                "c:ad>"
            ]
        );
    }

    #[test]
    fn test_fit_builds_ordered_vocabulary() {
        let mut featurizer = TextFeaturizer::new(unigrams()).unwrap();
        featurizer
            .fit(&["great food", "awful food", "great service"])
            .unwrap();

        assert!(featurizer.is_fitted());
        assert_eq!(featurizer.dimension(), 4);
        assert_eq!(featurizer.term(0), Some("w:great"));
        assert_eq!(featurizer.term(1), Some("w:food"));
        assert_eq!(featurizer.term(2), Some("w:awful"));
        assert_eq!(featurizer.term(3), Some("w:service"));
        assert_eq!(featurizer.term_index("w:service"), Some(3));
    }

    #[test]
    fn test_tf_counts() {
        let mut featurizer = TextFeaturizer::new(unigrams()).unwrap();
        featurizer.fit(&["good good food", "bad"]).unwrap();

        let v = featurizer.featurize("Good, GOOD and good food!").unwrap();
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.get(0), 3.0);
        assert_eq!(v.get(1), 1.0);
        assert_eq!(v.get(2), 0.0);
    }

    #[test]
    fn test_tfidf_weights_rare_terms_higher() {
        let mut featurizer = TextFeaturizer::new(FeaturizerOptions {
            weighting: Weighting::TfIdf,
            ..unigrams()
        })
        .unwrap();
        featurizer
            .fit(&["food great", "food awful", "food fine"])
            .unwrap();

        let v = featurizer.featurize("food great").unwrap();
        let food = featurizer.term_index("w:food").unwrap();
        let great = featurizer.term_index("w:great").unwrap();
        assert!(v.get(great) > v.get(food));
        assert!((v.get(food) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_document_frequency() {
        let mut featurizer = TextFeaturizer::new(FeaturizerOptions {
            min_document_frequency: 2,
            ..unigrams()
        })
        .unwrap();
        featurizer
            .fit(&["great food", "great service", "awful"])
            .unwrap();
        assert_eq!(featurizer.dimension(), 1);
        assert_eq!(featurizer.term(0), Some("w:great"));
    }

    #[test]
    fn test_normalized_vectors_have_unit_length() {
        let mut featurizer = TextFeaturizer::new(FeaturizerOptions::default()).unwrap();
        featurizer
            .fit(&["The pasta was amazing", "Service was slow and rude"])
            .unwrap();

        let v = featurizer.featurize("amazing pasta, slow service").unwrap();
        assert!((v.squared_norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_unknown_text_is_zero() {
        let mut featurizer = TextFeaturizer::new(FeaturizerOptions::default()).unwrap();
        featurizer.fit(&["tasty"]).unwrap();

        let empty = featurizer.featurize("").unwrap();
        assert!(empty.is_zero());
        assert_eq!(empty.dimension(), featurizer.dimension());

        let unknown = featurizer.featurize("zzz").unwrap();
        assert!(unknown.is_zero());
    }

    #[test]
    fn test_state_round_trip() {
        let mut featurizer = TextFeaturizer::new(FeaturizerOptions::default()).unwrap();
        featurizer
            .fit(&["loved the crust", "crust is not good"])
            .unwrap();

        let restored = TextFeaturizer::from_state(featurizer.state()).unwrap();
        assert_eq!(restored.dimension(), featurizer.dimension());
        assert_eq!(
            restored.featurize("good crust").unwrap(),
            featurizer.featurize("good crust").unwrap()
        );
    }

    #[test]
    fn test_invalid_options() {
        let options = FeaturizerOptions {
            word_ngram_length: 0,
            ..FeaturizerOptions::default()
        };
        assert!(matches!(
            TextFeaturizer::new(options).unwrap_err(),
            SentimentError::InvalidConfig(_)
        ));
    }
}
