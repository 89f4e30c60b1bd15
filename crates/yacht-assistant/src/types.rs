//! Wire types for the answer service and answer payload parsing

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use yacht_core::{CallSource, ChatRole, ChatTurn, Confidence};

/// One prior turn sent as conversation context
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// `user` or `assistant`
    pub role: ChatRole,
    /// Turn text
    pub content: String,
}

impl From<&ChatTurn> for HistoryEntry {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The new question
    pub question: String,
    /// Trailing window of earlier turns, oldest first
    #[serde(default)]
    pub conversation_history: Vec<HistoryEntry>,
}

/// Reply of `POST /api/chat` as received.
///
/// `answer` is frequently itself a JSON document carrying the structured
/// answer; see [`parse_answer_payload`]. Top-level `sources` and
/// `confidence` in the reply are not read: only the ones nested in the
/// answer document count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RawAnswer {
    /// Answer text, possibly JSON-encoded
    pub answer: String,
}

impl RawAnswer {
    /// Plain-text answer
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

/// Structured answer ready to become an assistant turn
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnswer {
    /// Answer text
    pub answer: String,
    /// Cited calls
    pub sources: Vec<CallSource>,
    /// Confidence; `None` when the payload was not structured
    pub confidence: Option<Confidence>,
}

impl ParsedAnswer {
    /// Assistant turn stamped now
    pub fn into_turn(self) -> ChatTurn {
        ChatTurn::assistant(self.answer, self.sources, self.confidence)
    }
}

/// Interpret an answer payload.
///
/// When `answer` parses as a JSON object with an `answer` field, its
/// `answer`, `sources` and `confidence` are used, and a missing or
/// unrecognised confidence reads as medium. Otherwise the raw text is the
/// answer, with no sources and no confidence. Never fails.
pub fn parse_answer_payload(raw: &RawAnswer) -> ParsedAnswer {
    let structured = serde_json::from_str::<Value>(raw.answer.trim())
        .ok()
        .and_then(|value| match value {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .and_then(|map| {
            let answer = map.get("answer")?.as_str()?.to_string();
            Some((answer, map))
        });

    let Some((answer, map)) = structured else {
        debug!("answer payload is not structured, using raw text");
        return ParsedAnswer {
            answer: raw.answer.clone(),
            sources: Vec::new(),
            confidence: None,
        };
    };

    let sources = map
        .get("sources")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(lenient_source).collect())
        .unwrap_or_default();

    let confidence = map
        .get("confidence")
        .and_then(Value::as_str)
        .and_then(parse_confidence)
        .unwrap_or(Confidence::Medium);

    ParsedAnswer {
        answer,
        sources,
        confidence: Some(confidence),
    }
}

/// Parse `low`, `medium` or `high`, ignoring case
pub fn parse_confidence(raw: &str) -> Option<Confidence> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Some(Confidence::Low),
        "medium" => Some(Confidence::Medium),
        "high" => Some(Confidence::High),
        _ => None,
    }
}

/// Read a source reference, treating nulls as absent fields.
///
/// Sources without a call id cannot be linked and are dropped.
pub fn lenient_source(value: &Value) -> Option<CallSource> {
    let Value::Object(map) = value else {
        return None;
    };
    let cleaned: serde_json::Map<String, Value> = map
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match (k.as_str(), v) {
                ("call_id", Value::Number(n)) => Value::String(n.to_string()),
                _ => v.clone(),
            };
            (k.clone(), v)
        })
        .collect();

    serde_json::from_value::<CallSource>(Value::Object(cleaned))
        .ok()
        .filter(|source| !source.call_id.is_empty())
}

/// "3 relevant calls" / "1 relevant call"
pub fn sources_label(count: usize) -> String {
    format!(
        "{count} relevant call{}",
        if count == 1 { "" } else { "s" }
    )
}

/// Link target for a cited call
pub fn source_link(source: &CallSource) -> String {
    format!("/recent-calls/{}", urlencoding::encode(&source.call_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_structured_payload() {
        let raw = RawAnswer::text(
            json!({
                "answer": "GPS calibration is the top issue.",
                "sources": [
                    {"call_id": "c-1", "agent_id": "sarah", "similarity": 0.91, "summary": null},
                    {"agent_id": "orphan"}
                ],
                "confidence": "high"
            })
            .to_string(),
        );

        let parsed = parse_answer_payload(&raw);
        assert_eq!(parsed.answer, "GPS calibration is the top issue.");
        assert_eq!(parsed.sources.len(), 1);
        assert_eq!(parsed.sources[0].agent_name, "sarah");
        assert_eq!(parsed.confidence, Some(Confidence::High));
    }

    #[test]
    fn test_structured_payload_defaults_to_medium() {
        let raw = RawAnswer::text(r#"{"answer": "Three calls were escalated."}"#);
        let parsed = parse_answer_payload(&raw);
        assert_eq!(parsed.confidence, Some(Confidence::Medium));
        assert!(parsed.sources.is_empty());
    }

    #[rstest]
    #[case("Plain words, no JSON here.")]
    #[case("{\"answer\": 42}")]
    #[case("[1, 2, 3]")]
    #[case("{\"answer\": \"unterminated")]
    #[case("")]
    fn test_unstructured_payload_is_verbatim(#[case] text: &str) {
        let raw: RawAnswer = serde_json::from_value(json!({
            "answer": text,
            "sources": [{"call_id": "ignored"}],
            "confidence": "high",
        }))
        .unwrap();

        let parsed = parse_answer_payload(&raw);
        assert_eq!(parsed.answer, text);
        assert!(parsed.sources.is_empty());
        assert_eq!(parsed.confidence, None);
    }

    #[test]
    fn test_numeric_call_id_accepted() {
        let source = lenient_source(&json!({"call_id": 17, "customer_name": "Robert Chen"}));
        assert_eq!(source.map(|s| s.call_id), Some("17".to_string()));
    }

    #[test]
    fn test_labels_and_links() {
        assert_eq!(sources_label(1), "1 relevant call");
        assert_eq!(sources_label(3), "3 relevant calls");

        let source = CallSource {
            call_id: "a b".to_string(),
            ..CallSource::default()
        };
        assert_eq!(source_link(&source), "/recent-calls/a%20b");
    }

    #[test]
    fn test_request_wire_format() {
        let request = ChatRequest {
            question: "Top issues?".to_string(),
            conversation_history: vec![HistoryEntry {
                role: ChatRole::Assistant,
                content: "Hello".to_string(),
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).ok(),
            Some(json!({
                "question": "Top issues?",
                "conversation_history": [{"role": "assistant", "content": "Hello"}]
            }))
        );
    }
}
