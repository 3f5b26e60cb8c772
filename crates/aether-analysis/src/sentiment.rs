//! Brand-sentiment analysis over collected public comments.

use std::fmt::Write as _;

use aether_core::{RawComment, SentimentBreakdown};
use serde_json::Value;

use crate::error::AnalysisError;
use crate::extract::extract_json_object;
use crate::llm::AnalysisService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentAnalysis {
    pub breakdown: SentimentBreakdown,
    pub positive_summary: Vec<String>,
    pub neutral_summary: Vec<String>,
    pub negative_summary: Vec<String>,
}

/// Builds the numbered `N. [platform] text` comment prompt.
#[must_use]
pub fn build_sentiment_prompt(comments: &[RawComment]) -> String {
    let mut listing = String::new();
    for (i, comment) in comments.iter().enumerate() {
        let _ = writeln!(listing, "{}. [{}] {}", i + 1, comment.platform, comment.text);
    }

    format!(
        "Analyze the sentiment of the following social media comments and provide a detailed breakdown.\n\n\
         Comments:\n{listing}\n\
         Return ONLY a valid JSON object (no markdown, no code blocks) with this exact structure:\n\
         {{\n\
         \x20 \"sentimentBreakdown\": {{\n\
         \x20   \"positive\": <percentage as integer>,\n\
         \x20   \"neutral\": <percentage as integer>,\n\
         \x20   \"negative\": <percentage as integer>\n\
         \x20 }},\n\
         \x20 \"positiveSummary\": [\"key point 1\", \"key point 2\", \"key point 3\"],\n\
         \x20 \"neutralSummary\": [\"key point 1\", \"key point 2\", \"key point 3\"],\n\
         \x20 \"negativeSummary\": [\"key point 1\", \"key point 2\", \"key point 3\"]\n\
         }}\n\n\
         Requirements:\n\
         - positive + neutral + negative must equal exactly 100\n\
         - Each summary should contain 3-5 key points\n\
         - Summaries should be concise and actionable\n\
         - Focus on themes, patterns, and actionable insights"
    )
}

/// Forces the breakdown to sum to 100 by adjusting the neutral bucket.
///
/// Positive and negative are kept as reported. If they alone exceed 100,
/// neutral drops to 0 and the overflow is taken from negative so every bucket
/// stays within 0..=100.
#[must_use]
pub fn repair_breakdown(raw: SentimentBreakdown) -> SentimentBreakdown {
    let positive = raw.positive.clamp(0, 100);
    let negative = raw.negative.clamp(0, 100);
    let neutral = raw.neutral.clamp(0, 100);

    let sum = positive + neutral + negative;
    if sum == 100 {
        return SentimentBreakdown {
            positive,
            neutral,
            negative,
        };
    }

    let repaired_neutral = neutral + (100 - sum);
    if repaired_neutral >= 0 {
        return SentimentBreakdown {
            positive,
            neutral: repaired_neutral,
            negative,
        };
    }

    SentimentBreakdown {
        positive,
        neutral: 0,
        negative: 100 - positive,
    }
}

/// Interprets raw model output for a sentiment scan.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidResponse`] when no JSON object with a
/// `sentimentBreakdown` can be found.
pub fn parse_sentiment_response(response: &str) -> Result<SentimentAnalysis, AnalysisError> {
    let json_text = extract_json_object(response).ok_or_else(|| {
        AnalysisError::InvalidResponse("no JSON object in sentiment response".to_string())
    })?;
    let root: Value = serde_json::from_str(json_text).map_err(|source| {
        AnalysisError::Deserialize {
            context: "sentiment analysis response".to_string(),
            source,
        }
    })?;

    let breakdown = root
        .get("sentimentBreakdown")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AnalysisError::InvalidResponse("sentimentBreakdown missing".to_string())
        })?;

    let raw = SentimentBreakdown {
        positive: rounded(breakdown.get("positive")),
        neutral: rounded(breakdown.get("neutral")),
        negative: rounded(breakdown.get("negative")),
    };
    let repaired = repair_breakdown(raw);
    if repaired != raw {
        tracing::debug!(?raw, ?repaired, "sentiment breakdown repaired");
    }

    Ok(SentimentAnalysis {
        breakdown: repaired,
        positive_summary: summary(&root, "positiveSummary"),
        neutral_summary: summary(&root, "neutralSummary"),
        negative_summary: summary(&root, "negativeSummary"),
    })
}

/// Runs one sentiment analysis over `comments`.
///
/// # Errors
///
/// Returns [`AnalysisError`] when the service fails or its answer cannot be
/// interpreted.
pub async fn analyze_sentiment(
    service: &dyn AnalysisService,
    comments: &[RawComment],
) -> Result<SentimentAnalysis, AnalysisError> {
    let prompt = build_sentiment_prompt(comments);
    let response = service.generate(&prompt).await?;
    parse_sentiment_response(&response)
}

#[allow(clippy::cast_possible_truncation)]
fn rounded(value: Option<&Value>) -> i32 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
        .map_or(0, |v| v.round().clamp(-1000.0, 1000.0) as i32)
}

fn summary(root: &Value, key: &str) -> Vec<String> {
    root.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
