//! LLM-backed analysis of scraped competitor content and brand commentary.

pub mod error;
pub mod extract;
pub mod insight;
pub mod llm;
pub mod sentiment;

pub use error::AnalysisError;
pub use extract::{extract_json_document, extract_json_object};
pub use insight::{
    analyze_competitor, build_insight_prompt, parse_insight_entry, parse_insight_response,
    AnalysisOutcome, ParseError, ParsedEntry,
};
pub use llm::{AnalysisService, GeminiClient, GeminiConfig};
pub use sentiment::{
    analyze_sentiment, build_sentiment_prompt, parse_sentiment_response, repair_breakdown,
    SentimentAnalysis,
};
