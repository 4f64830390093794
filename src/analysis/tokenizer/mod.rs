//! Tokenizer implementations for text analysis.
//!
//! - [`RegexTokenizer`] - word tokens matched by a regular expression
//! - [`CharNgramTokenizer`] - character n-grams over grapheme clusters

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod ngram;
pub mod regex;

pub use ngram::CharNgramTokenizer;
pub use regex::RegexTokenizer;
