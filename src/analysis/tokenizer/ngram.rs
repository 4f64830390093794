//! Character n-gram tokenizer.
//!
//! Splits text into overlapping windows of grapheme clusters, so accented
//! letters and emoji are never cut in half. Character n-grams make the
//! featurizer tolerant of misspellings ("outstading" still shares most of
//! its trigrams with "outstanding").
//!
//! # Examples
//!
//! ```
//! use sentiment::analysis::tokenizer::ngram::CharNgramTokenizer;
//! use sentiment::analysis::tokenizer::Tokenizer;
//!
//! let tokenizer = CharNgramTokenizer::new(3).unwrap();
//! let grams: Vec<_> = tokenizer.tokenize("good").unwrap().map(|t| t.text).collect();
//! assert_eq!(grams, vec!["goo", "ood"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{Result, SentimentError};

/// A tokenizer that generates fixed-length character n-grams.
#[derive(Clone, Debug)]
pub struct CharNgramTokenizer {
    gram: usize,
}

impl CharNgramTokenizer {
    /// Create a new n-gram tokenizer producing grams of `gram` graphemes.
    ///
    /// # Errors
    ///
    /// Returns an error if `gram` is 0.
    pub fn new(gram: usize) -> Result<Self> {
        if gram == 0 {
            return Err(SentimentError::analysis("gram length must be at least 1"));
        }
        Ok(Self { gram })
    }

    /// The n-gram length.
    pub fn gram(&self) -> usize {
        self.gram
    }
}

impl Tokenizer for CharNgramTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let graphemes: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
        if graphemes.len() < self.gram {
            return Ok(Box::new(std::iter::empty()));
        }

        let tokens: Vec<Token> = graphemes
            .windows(self.gram)
            .enumerate()
            .map(|(position, window)| {
                let start = window[0].0;
                let (last_start, last) = window[self.gram - 1];
                let end = last_start + last.len();
                Token::with_offsets(&text[start..end], position, start, end)
            })
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "char_ngram"
    }
}
