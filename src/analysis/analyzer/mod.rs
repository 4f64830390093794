//! Analyzer implementations that combine tokenizers and filters.

mod analyzer;
mod pipeline;
mod review;

pub use analyzer::Analyzer;
pub use pipeline::PipelineAnalyzer;
pub use review::ReviewAnalyzer;
