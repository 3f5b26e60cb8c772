//! Competitor-scan analysis: one prompt covering every scraped document, and
//! tolerant per-entry parsing of the model's answer into insight drafts.

use std::collections::HashSet;
use std::fmt::Write as _;

use aether_core::{
    InsightDraft, InsightType, Priority, ScrapedDocument, Sentiment, INSIGHT_EXCERPT_LIMIT,
};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::AnalysisError;
use crate::extract::extract_json_document;
use crate::llm::AnalysisService;

/// Why a single response entry was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("entry has no boolean hasSignificantUpdate flag")]
    MissingSignificanceFlag,
    #[error("unknown insight type: {0}")]
    InvalidInsightType(String),
    #[error("unknown sentiment: {0}")]
    InvalidSentiment(String),
    #[error("required field missing: {0}")]
    MissingField(&'static str),
    #[error("documentIndex {index} out of range for {count} documents")]
    DocumentIndexOutOfRange { index: i64, count: usize },
    #[error("entry is not a JSON object")]
    Malformed,
}

/// A successfully parsed response entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEntry {
    Significant {
        document_index: usize,
        draft: InsightDraft,
    },
    NotSignificant {
        document_index: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub drafts: Vec<InsightDraft>,
    /// Entries dropped by validation, including duplicates for one document.
    pub rejected: usize,
    pub not_significant: usize,
}

/// Builds the single analysis request for a scan. Documents are numbered from
/// zero so the response can refer back to them.
#[must_use]
pub fn build_insight_prompt(competitor_name: &str, documents: &[ScrapedDocument]) -> String {
    let mut prompt = format!(
        "You are a competitive intelligence analyst tracking the company \"{competitor_name}\".\n\
         Below are {count} documents scraped from its website and social channels.\n\
         For EACH document decide whether it contains a significant competitive event \
         (product launch, feature update, pricing change, marketing campaign, executive hire, \
         partnership). Routine or boilerplate content is not significant.\n\n\
         Return ONLY a valid JSON object (no markdown, no code blocks) with this exact structure:\n\
         {{\n  \"insights\": [\n    {{\n\
         \x20     \"documentIndex\": <number of the document>,\n\
         \x20     \"hasSignificantUpdate\": true | false,\n\
         \x20     \"summary\": \"2-3 sentence summary\",\n\
         \x20     \"type\": \"product_launch\" | \"feature_update\" | \"pricing_change\" | \"marketing_campaign\" | \"executive_hire\" | \"partnership\" | \"other\",\n\
         \x20     \"sentiment\": \"threat\" | \"opportunity\" | \"neutral\",\n\
         \x20     \"priority\": \"high\" | \"medium\" | \"low\",\n\
         \x20     \"keyPoints\": [\"point 1\", \"point 2\", \"point 3\"],\n\
         \x20     \"recommendations\": [\"recommendation 1\", \"recommendation 2\"],\n\
         \x20     \"impact\": \"impact on our business\",\n\
         \x20     \"tags\": [\"tag\"],\n\
         \x20     \"labels\": [\"label\"],\n\
         \x20     \"publicOpinionPositive\": <integer 0-100>,\n\
         \x20     \"publicOpinionNegative\": <integer 0-100>\n\
         \x20   }}\n  ]\n}}\n\
         Only documents with hasSignificantUpdate true need the remaining fields. \
         The two public opinion estimates are independent and need not sum to 100.\n\n\
         Documents:\n",
        count = documents.len(),
    );

    for (index, document) in documents.iter().enumerate() {
        let _ = write!(
            prompt,
            "\n[{index}] platform: {}\nurl: {}\ncontent: {}\n",
            document.platform, document.url, document.content
        );
    }
    prompt
}

/// Sends every document to the analysis service in one request and maps the
/// answer to insight drafts.
///
/// # Errors
///
/// Returns [`AnalysisError`] only when the service call itself fails. A
/// response that cannot be parsed yields an empty [`AnalysisOutcome`].
pub async fn analyze_competitor(
    service: &dyn AnalysisService,
    competitor_name: &str,
    documents: &[ScrapedDocument],
) -> Result<AnalysisOutcome, AnalysisError> {
    if documents.is_empty() {
        return Ok(AnalysisOutcome::default());
    }
    let prompt = build_insight_prompt(competitor_name, documents);
    let response = service.generate(&prompt).await?;
    Ok(parse_insight_response(&response, documents))
}

/// Interprets raw model output. Never fails: unusable output produces zero
/// drafts, and each bad entry is dropped without affecting its siblings.
#[must_use]
pub fn parse_insight_response(response: &str, documents: &[ScrapedDocument]) -> AnalysisOutcome {
    let mut outcome = AnalysisOutcome::default();

    let Some(json_text) = extract_json_document(response) else {
        tracing::warn!(
            response_chars = response.len(),
            "analysis response contained no JSON object"
        );
        return outcome;
    };
    let root: Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "analysis response JSON is invalid");
            return outcome;
        }
    };

    let entries: Vec<Value> = match root {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("insights") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                tracing::warn!("analysis response field insights is not an array");
                return outcome;
            }
            // A bare object answers for the first document.
            None => vec![Value::Object(obj)],
        },
        _ => return outcome,
    };

    let mut covered: HashSet<usize> = HashSet::new();
    for (position, entry) in entries.iter().enumerate() {
        match parse_insight_entry(entry, position, documents) {
            Ok(ParsedEntry::Significant {
                document_index,
                draft,
            }) => {
                if covered.insert(document_index) {
                    outcome.drafts.push(draft);
                } else {
                    tracing::debug!(document_index, "duplicate insight entry ignored");
                    outcome.rejected += 1;
                }
            }
            Ok(ParsedEntry::NotSignificant { .. }) => outcome.not_significant += 1,
            Err(e) => {
                tracing::warn!(entry = position, error = %e, "dropping invalid insight entry");
                outcome.rejected += 1;
            }
        }
    }
    outcome
}

/// Validates one response entry against the document it refers to.
///
/// `position` is the entry's index in the response array and stands in for a
/// missing `documentIndex`.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first problem found.
pub fn parse_insight_entry(
    entry: &Value,
    position: usize,
    documents: &[ScrapedDocument],
) -> Result<ParsedEntry, ParseError> {
    let obj = entry.as_object().ok_or(ParseError::Malformed)?;

    let document_index = resolve_document_index(obj, position, documents.len())?;
    let significant = bool_field(obj, "hasSignificantUpdate")
        .ok_or(ParseError::MissingSignificanceFlag)?;
    if !significant {
        return Ok(ParsedEntry::NotSignificant { document_index });
    }

    let document = &documents[document_index];

    let summary = non_empty_str(obj, "summary").ok_or(ParseError::MissingField("summary"))?;
    let raw_type = non_empty_str(obj, "type")
        .or_else(|| non_empty_str(obj, "insightType"))
        .ok_or(ParseError::MissingField("type"))?;
    let insight_type = InsightType::parse(raw_type)
        .ok_or_else(|| ParseError::InvalidInsightType(raw_type.to_string()))?;
    let raw_sentiment =
        non_empty_str(obj, "sentiment").ok_or(ParseError::MissingField("sentiment"))?;
    let sentiment = Sentiment::parse(raw_sentiment)
        .ok_or_else(|| ParseError::InvalidSentiment(raw_sentiment.to_string()))?;
    let priority = non_empty_str(obj, "priority")
        .and_then(Priority::parse)
        .unwrap_or_default();

    let source_url = non_empty_str(obj, "sourceUrl")
        .map(str::to_string)
        .or_else(|| Some(document.url.clone()));

    let draft = InsightDraft {
        platform: document.platform.clone(),
        source_url,
        raw_content: excerpt(&document.content, INSIGHT_EXCERPT_LIMIT),
        summary: summary.to_string(),
        insight_type,
        sentiment,
        priority,
        key_points: string_list(obj, "keyPoints"),
        recommendations: string_list(obj, "recommendations"),
        impact: non_empty_str(obj, "impact").map(str::to_string),
        tags: string_list(obj, "tags"),
        labels: string_list(obj, "labels"),
        public_opinion_positive: percentage(obj, "publicOpinionPositive"),
        public_opinion_negative: percentage(obj, "publicOpinionNegative"),
    };
    Ok(ParsedEntry::Significant {
        document_index,
        draft,
    })
}

fn resolve_document_index(
    obj: &Map<String, Value>,
    position: usize,
    count: usize,
) -> Result<usize, ParseError> {
    let raw = match obj.get("documentIndex") {
        None | Some(Value::Null) => i64::try_from(position).unwrap_or(i64::MAX),
        Some(Value::Number(n)) => n.as_i64().ok_or(ParseError::Malformed)?,
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| ParseError::Malformed)?,
        Some(_) => return Err(ParseError::Malformed),
    };
    usize::try_from(raw)
        .ok()
        .filter(|idx| *idx < count)
        .ok_or(ParseError::DocumentIndexOutOfRange { index: raw, count })
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    match obj.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn non_empty_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Integer percentage clamped to 0..=100; anything unusable is 0.
#[allow(clippy::cast_possible_truncation)]
fn percentage(obj: &Map<String, Value>, key: &str) -> i32 {
    let raw = match obj.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
        .map_or(0, |v| v.round().clamp(0.0, 100.0) as i32)
}

fn excerpt(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
#[path = "insight_test.rs"]
mod tests;
