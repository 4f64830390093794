//! Text analysis: tokenizers, token filters and the analyzers that chain
//! them. The featurizer consumes analyzer output to build its vocabulary.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::*;
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
