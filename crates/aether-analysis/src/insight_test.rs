use async_trait::async_trait;
use serde_json::json;

use super::*;

fn doc(platform: &str, url: &str, content: &str) -> ScrapedDocument {
    ScrapedDocument {
        platform: platform.to_string(),
        url: url.to_string(),
        content: content.to_string(),
    }
}

fn two_docs() -> Vec<ScrapedDocument> {
    vec![
        doc("website", "https://acme.test", "New pricing: $99/mo"),
        doc("linkedin", "https://www.linkedin.com/company/acme", "We hired a new CTO"),
    ]
}

fn significant(index: usize) -> Value {
    json!({
        "documentIndex": index,
        "hasSignificantUpdate": true,
        "summary": "Acme changed something",
        "type": "pricing_change",
        "sentiment": "threat",
        "priority": "high",
        "keyPoints": ["a", "b", "c"],
        "recommendations": ["x", "y"],
        "impact": "margin pressure",
        "tags": ["pricing"],
        "labels": ["watch"],
        "publicOpinionPositive": 35,
        "publicOpinionNegative": 40
    })
}

struct Canned(Result<String, u16>);

#[async_trait]
impl AnalysisService for Canned {
    async fn generate(&self, _prompt: &str) -> Result<String, AnalysisError> {
        match &self.0 {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(AnalysisError::UnexpectedStatus {
                status: *status,
                body: "unavailable".to_string(),
            }),
        }
    }
}

#[test]
fn prompt_numbers_every_document() {
    let prompt = build_insight_prompt("Acme", &two_docs());
    assert!(prompt.contains("\"Acme\""));
    assert!(prompt.contains("[0] platform: website"));
    assert!(prompt.contains("[1] platform: linkedin"));
    assert!(prompt.contains("We hired a new CTO"));
}

#[test]
fn full_entry_becomes_draft_with_document_provenance() {
    let docs = two_docs();
    let parsed = parse_insight_entry(&significant(1), 0, &docs).unwrap();
    let ParsedEntry::Significant {
        document_index,
        draft,
    } = parsed
    else {
        panic!("expected significant entry");
    };
    assert_eq!(document_index, 1);
    assert_eq!(draft.platform, "linkedin");
    assert_eq!(
        draft.source_url.as_deref(),
        Some("https://www.linkedin.com/company/acme")
    );
    assert_eq!(draft.raw_content, "We hired a new CTO");
    assert_eq!(draft.insight_type, InsightType::PricingChange);
    assert_eq!(draft.sentiment, Sentiment::Threat);
    assert_eq!(draft.priority, Priority::High);
    assert_eq!(draft.key_points.len(), 3);
    assert_eq!(draft.public_opinion_positive, 35);
    assert_eq!(draft.public_opinion_negative, 40);
}

#[test]
fn out_of_set_sentiment_is_dropped_and_siblings_kept() {
    let docs = two_docs();
    let mut bad = significant(0);
    bad["sentiment"] = json!("bullish");
    let response = json!({ "insights": [bad, significant(1)] }).to_string();

    let outcome = parse_insight_response(&response, &docs);
    assert_eq!(outcome.drafts.len(), 1);
    assert_eq!(outcome.drafts[0].platform, "linkedin");
    assert_eq!(outcome.rejected, 1);
}

#[test]
fn invalid_sentiment_reports_the_label() {
    let mut entry = significant(0);
    entry["sentiment"] = json!("bullish");
    let err = parse_insight_entry(&entry, 0, &two_docs()).unwrap_err();
    assert_eq!(err, ParseError::InvalidSentiment("bullish".to_string()));
}

#[test]
fn enum_labels_are_folded_before_matching() {
    let mut entry = significant(0);
    entry["type"] = json!("Pricing Change");
    entry["sentiment"] = json!("Opportunity");
    entry["priority"] = json!("LOW");
    let ParsedEntry::Significant { draft, .. } = parse_insight_entry(&entry, 0, &two_docs()).unwrap()
    else {
        panic!("expected significant entry");
    };
    assert_eq!(draft.insight_type, InsightType::PricingChange);
    assert_eq!(draft.sentiment, Sentiment::Opportunity);
    assert_eq!(draft.priority, Priority::Low);
}

#[test]
fn unknown_insight_type_is_rejected() {
    let mut entry = significant(0);
    entry["type"] = json!("merger");
    let err = parse_insight_entry(&entry, 0, &two_docs()).unwrap_err();
    assert_eq!(err, ParseError::InvalidInsightType("merger".to_string()));
}

#[test]
fn missing_or_unknown_priority_defaults_to_medium() {
    let docs = two_docs();
    let mut missing = significant(0);
    missing.as_object_mut().unwrap().remove("priority");
    let mut unknown = significant(1);
    unknown["priority"] = json!("urgent");

    let outcome = parse_insight_response(&json!({ "insights": [missing, unknown] }).to_string(), &docs);
    assert_eq!(outcome.drafts.len(), 2);
    assert!(outcome.drafts.iter().all(|d| d.priority == Priority::Medium));
}

#[test]
fn missing_sequences_become_empty_and_opinions_are_clamped() {
    let entry = json!({
        "documentIndex": 0,
        "hasSignificantUpdate": true,
        "summary": "s",
        "type": "other",
        "sentiment": "neutral",
        "keyPoints": "not-an-array",
        "publicOpinionPositive": 150,
        "publicOpinionNegative": -5
    });
    let ParsedEntry::Significant { draft, .. } = parse_insight_entry(&entry, 0, &two_docs()).unwrap()
    else {
        panic!("expected significant entry");
    };
    assert!(draft.key_points.is_empty());
    assert!(draft.recommendations.is_empty());
    assert!(draft.tags.is_empty());
    assert!(draft.labels.is_empty());
    assert_eq!(draft.impact, None);
    assert_eq!(draft.public_opinion_positive, 100);
    assert_eq!(draft.public_opinion_negative, 0);
}

#[test]
fn missing_opinions_default_to_zero() {
    let mut entry = significant(0);
    let obj = entry.as_object_mut().unwrap();
    obj.remove("publicOpinionPositive");
    obj.remove("publicOpinionNegative");
    let ParsedEntry::Significant { draft, .. } = parse_insight_entry(&entry, 0, &two_docs()).unwrap()
    else {
        panic!("expected significant entry");
    };
    assert_eq!(draft.public_opinion_positive, 0);
    assert_eq!(draft.public_opinion_negative, 0);
}

#[test]
fn raw_content_is_capped_at_excerpt_limit() {
    let docs = vec![doc("website", "https://acme.test", &"é".repeat(4_000))];
    let ParsedEntry::Significant { draft, .. } =
        parse_insight_entry(&significant(0), 0, &docs).unwrap()
    else {
        panic!("expected significant entry");
    };
    assert_eq!(draft.raw_content.chars().count(), 1000);
}

#[test]
fn source_url_override_requires_non_empty_string() {
    let docs = two_docs();
    let mut with_url = significant(0);
    with_url["sourceUrl"] = json!("https://acme.test/pricing");
    let mut blank_url = significant(1);
    blank_url["sourceUrl"] = json!("  ");

    let outcome = parse_insight_response(
        &json!({ "insights": [with_url, blank_url] }).to_string(),
        &docs,
    );
    assert_eq!(
        outcome.drafts[0].source_url.as_deref(),
        Some("https://acme.test/pricing")
    );
    assert_eq!(
        outcome.drafts[1].source_url.as_deref(),
        Some("https://www.linkedin.com/company/acme")
    );
}

#[test]
fn at_most_one_draft_per_document() {
    let outcome = parse_insight_response(
        &json!({ "insights": [significant(0), significant(0)] }).to_string(),
        &two_docs(),
    );
    assert_eq!(outcome.drafts.len(), 1);
    assert_eq!(outcome.rejected, 1);
}

#[test]
fn not_significant_entries_are_counted_not_drafted() {
    let outcome = parse_insight_response(
        r#"{"insights":[{"documentIndex":0,"hasSignificantUpdate":false},{"documentIndex":1}]}"#,
        &two_docs(),
    );
    assert!(outcome.drafts.is_empty());
    assert_eq!(outcome.not_significant, 1);
    assert_eq!(outcome.rejected, 1, "entry without the flag is rejected");
}

#[test]
fn out_of_range_index_is_rejected() {
    let err = parse_insight_entry(&significant(9), 0, &two_docs()).unwrap_err();
    assert_eq!(
        err,
        ParseError::DocumentIndexOutOfRange { index: 9, count: 2 }
    );
}

#[test]
fn bare_object_answers_for_first_document() {
    let mut entry = significant(0);
    entry.as_object_mut().unwrap().remove("documentIndex");
    let text = format!("Here you go:\n```json\n{entry}\n```");

    let outcome = parse_insight_response(&text, &two_docs());
    assert_eq!(outcome.drafts.len(), 1);
    assert_eq!(outcome.drafts[0].platform, "website");
}

#[test]
fn braces_in_commentary_do_not_hide_the_answer() {
    let text = format!(
        "I filled every {{field}} you asked for:\n```json\n{}\n```",
        json!({ "insights": [significant(0)] })
    );

    let outcome = parse_insight_response(&text, &two_docs());
    assert_eq!(outcome.drafts.len(), 1);
    assert_eq!(outcome.rejected, 0);
}

#[test]
fn top_level_array_is_read_as_the_entry_list() {
    let text = json!([significant(0), significant(1)]).to_string();

    let outcome = parse_insight_response(&text, &two_docs());
    assert_eq!(outcome.drafts.len(), 2);
    assert_eq!(outcome.drafts[1].platform, "linkedin");
}

#[test]
fn unparseable_response_yields_zero_drafts() {
    let docs = two_docs();
    assert_eq!(
        parse_insight_response("I could not find anything.", &docs),
        AnalysisOutcome::default()
    );
    assert_eq!(
        parse_insight_response("{ not: valid json }", &docs),
        AnalysisOutcome::default()
    );
    assert_eq!(
        parse_insight_response(r#"{"insights": "none"}"#, &docs),
        AnalysisOutcome::default()
    );
}

#[tokio::test]
async fn analyze_competitor_parses_fenced_service_output() {
    let response = format!(
        "```json\n{}\n```",
        json!({ "insights": [significant(0)] })
    );
    let service = Canned(Ok(response));
    let outcome = analyze_competitor(&service, "Acme", &two_docs()).await.unwrap();
    assert_eq!(outcome.drafts.len(), 1);
    assert_eq!(outcome.drafts[0].insight_type, InsightType::PricingChange);
}

#[tokio::test]
async fn analyze_competitor_propagates_service_failure() {
    let service = Canned(Err(503));
    let err = analyze_competitor(&service, "Acme", &two_docs()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::UnexpectedStatus { status: 503, .. }));
}
