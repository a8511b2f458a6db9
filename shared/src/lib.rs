use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Endpoint paths and query parameter names
pub mod endpoints;

// API error types
pub mod api;
pub use api::ApiError;

/// Literal response body the compile-check service returns for a clean build.
pub const COMPILE_SUCCESS_RESPONSE: &str = "SUCCESS";

/// Diagnostics text recorded when the compile-check service cannot be reached.
pub const CHECK_UNAVAILABLE_MESSAGE: &str =
    "Compile check unavailable: compiler diagnostics could not be retrieved.";

/// Model tier the caller selects before starting a session.
///
/// Forwarded verbatim to the explanation and correction streams; has no
/// influence on the client workflow itself.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    #[default]
    Fast,
    Medium,
    Slow,
}

impl ModelTier {
    /// All tiers, in menu order.
    pub const ALL: [ModelTier; 3] = [ModelTier::Fast, ModelTier::Medium, ModelTier::Slow];

    /// Wire form used as the `tier` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTier::Fast => "fast",
            ModelTier::Medium => "medium",
            ModelTier::Slow => "slow",
        }
    }

    /// Parse the wire form back; unknown values fall back to the default.
    pub fn from_param(value: &str) -> ModelTier {
        match value {
            "medium" => ModelTier::Medium,
            "slow" => ModelTier::Slow,
            _ => ModelTier::Fast,
        }
    }
}

impl std::fmt::Display for ModelTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the one-shot compile check for the submitted source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompileOutcome {
    /// Check not yet resolved for this session.
    #[default]
    Pending,
    /// Clean build; there is nothing to correct.
    Success,
    /// Build failed; the payload is the compiler diagnostics text.
    Failure(String),
}

impl CompileOutcome {
    /// Interpret the raw check response: the literal `"SUCCESS"` or an
    /// empty body mean a clean build, anything else is diagnostics text.
    pub fn from_response(body: &str) -> CompileOutcome {
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == COMPILE_SUCCESS_RESPONSE {
            CompileOutcome::Success
        } else {
            CompileOutcome::Failure(body.to_string())
        }
    }

    /// Outcome recorded when the check service itself is unreachable.
    /// Deliberately a `Failure` so the correction path stays available.
    pub fn unavailable() -> CompileOutcome {
        CompileOutcome::Failure(CHECK_UNAVAILABLE_MESSAGE.to_string())
    }

    /// The persisted textual form, mirroring what the check service sent.
    pub fn response_text(&self) -> &str {
        match self {
            CompileOutcome::Pending => "",
            CompileOutcome::Success => COMPILE_SUCCESS_RESPONSE,
            CompileOutcome::Failure(diagnostics) => diagnostics,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CompileOutcome::Failure(_))
    }
}

/// A completed session as submitted to the history service.
///
/// Constructed by the client when a stream terminates; the history service
/// assigns identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationRecord {
    /// The submitted source text, verbatim.
    pub source: String,
    /// Raw compile-check response (`"SUCCESS"` or diagnostics).
    pub compiler_output: String,
    /// Accumulated explanation text (fragments joined).
    pub explanation: String,
    /// Accumulated correction text; empty when no correction was streamed.
    pub correction: String,
}

/// A persisted session as returned by the history service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub source: String,
    pub compiler_output: String,
    pub explanation: String,
    pub correction: String,
    /// ISO 8601 timestamp assigned by the history service.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_wire_format() {
        assert_eq!(ModelTier::Fast.as_str(), "fast");
        assert_eq!(ModelTier::Medium.as_str(), "medium");
        assert_eq!(ModelTier::Slow.as_str(), "slow");

        let json = serde_json::to_string(&ModelTier::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let parsed: ModelTier = serde_json::from_str("\"slow\"").unwrap();
        assert_eq!(parsed, ModelTier::Slow);
    }

    #[test]
    fn tier_from_param_falls_back_to_default() {
        assert_eq!(ModelTier::from_param("medium"), ModelTier::Medium);
        assert_eq!(ModelTier::from_param("slow"), ModelTier::Slow);
        assert_eq!(ModelTier::from_param("turbo"), ModelTier::Fast);
        assert_eq!(ModelTier::from_param(""), ModelTier::Fast);
    }

    #[test]
    fn outcome_from_response() {
        assert_eq!(
            CompileOutcome::from_response("SUCCESS"),
            CompileOutcome::Success
        );
        assert_eq!(CompileOutcome::from_response(""), CompileOutcome::Success);
        assert_eq!(
            CompileOutcome::from_response("  \n"),
            CompileOutcome::Success
        );

        match CompileOutcome::from_response("error: missing semicolon") {
            CompileOutcome::Failure(diagnostics) => {
                assert_eq!(diagnostics, "error: missing semicolon");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn outcome_unavailable_is_failure() {
        let outcome = CompileOutcome::unavailable();
        assert!(outcome.is_failure());
        assert_eq!(outcome.response_text(), CHECK_UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn outcome_response_text_roundtrip() {
        assert_eq!(CompileOutcome::Success.response_text(), "SUCCESS");
        let failure = CompileOutcome::from_response("boom");
        assert_eq!(
            CompileOutcome::from_response(failure.response_text()),
            failure
        );
    }

    #[test]
    fn record_roundtrip() {
        let record = ExplanationRecord {
            source: "class Foo {}".to_string(),
            compiler_output: "SUCCESS".to_string(),
            explanation: "No issues found".to_string(),
            correction: String::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""compiler_output":"SUCCESS""#));
        let parsed: ExplanationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn history_entry_deserializes() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "source": "class Foo {}",
            "compiler_output": "error: oops",
            "explanation": "Exp",
            "correction": "Corr",
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let entry: HistoryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.explanation, "Exp");
        assert!(CompileOutcome::from_response(&entry.compiler_output).is_failure());
    }
}
