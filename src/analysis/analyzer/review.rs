//! Analyzer tuned for short review sentences.
//!
//! # Pipeline
//!
//! 1. RegexTokenizer (word characters, contractions kept whole)
//! 2. LowercaseFilter
//! 3. StopFilter (optional, negations never removed)
//!
//! # Examples
//!
//! ```
//! use sentiment::analysis::analyzer::{Analyzer, ReviewAnalyzer};
//!
//! let analyzer = ReviewAnalyzer::new().unwrap();
//! let terms = analyzer.terms("The crust was NOT good.").unwrap();
//! assert_eq!(terms, vec!["the", "crust", "was", "not", "good"]);
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::{LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// Default analyzer used by the featurizer.
pub struct ReviewAnalyzer {
    inner: PipelineAnalyzer,
    remove_stop_words: bool,
}

impl ReviewAnalyzer {
    /// Create a review analyzer that keeps every word.
    pub fn new() -> Result<Self> {
        Self::with_stop_words(false)
    }

    /// Create a review analyzer, optionally dropping stop words.
    pub fn with_stop_words(remove_stop_words: bool) -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let mut analyzer =
            PipelineAnalyzer::new(tokenizer).add_filter(Arc::new(LowercaseFilter::new()));
        if remove_stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::new()));
        }

        Ok(ReviewAnalyzer {
            inner: analyzer,
            remove_stop_words,
        })
    }

    /// Whether this analyzer removes stop words.
    pub fn removes_stop_words(&self) -> bool {
        self.remove_stop_words
    }
}

impl Analyzer for ReviewAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        if self.remove_stop_words {
            "review_no_stop"
        } else {
            "review"
        }
    }
}

impl std::fmt::Debug for ReviewAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_analyzer() {
        let analyzer = ReviewAnalyzer::new().unwrap();
        let terms = analyzer.terms("I LOVE this spaghetti.").unwrap();
        assert_eq!(terms, vec!["i", "love", "this", "spaghetti"]);
        assert_eq!(analyzer.name(), "review");
    }

    #[test]
    fn test_review_analyzer_with_stop_words() {
        let analyzer = ReviewAnalyzer::with_stop_words(true).unwrap();
        let terms = analyzer.terms("This was not a good meal").unwrap();
        assert_eq!(terms, vec!["not", "good", "meal"]);
        assert!(analyzer.removes_stop_words());
    }

    #[test]
    fn test_empty_input() {
        let analyzer = ReviewAnalyzer::new().unwrap();
        assert!(analyzer.terms("").unwrap().is_empty());
    }
}
