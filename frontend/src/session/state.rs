//! In-memory record of the current explain/correct session.

use shared::{CompileOutcome, ExplanationRecord, HistoryEntry, ModelTier};

/// Where the workflow currently stands.
///
/// The phase is the single source of truth for the busy/streaming state of
/// the view; everything the UI disables or spins on is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No session started; the editor is freely editable.
    #[default]
    Idle,
    /// Compile check in flight; no stream open yet.
    CheckPending,
    /// Explanation stream open and accumulating fragments.
    Explaining,
    /// Explanation finished (or replayed); correction may be available.
    ExplanationDone,
    /// Correction stream open and accumulating fragments.
    Correcting,
    /// Correction finished; terminal for the session.
    CorrectionDone,
}

impl SessionPhase {
    /// A stream channel is open in this phase.
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionPhase::Explaining | SessionPhase::Correcting)
    }

    /// The session cannot accept a new submit or edits to the source.
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionPhase::CheckPending) || self.is_streaming()
    }
}

/// Ordered fragments of one streamed text.
///
/// Fragments render joined by single spaces, in arrival order; the joined
/// form is what gets persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    fragments: Vec<String>,
}

impl TokenStream {
    /// Stream holding one pre-joined text, for replaying a persisted entry.
    pub fn seed(text: &str) -> TokenStream {
        if text.is_empty() {
            TokenStream::default()
        } else {
            TokenStream {
                fragments: vec![text.to_string()],
            }
        }
    }

    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn joined(&self) -> String {
        self.fragments.join(" ")
    }
}

/// Snapshot of everything the view renders for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// Submitted source text; fixed for the lifetime of the session.
    pub source: String,
    /// Tier forwarded to both streams.
    pub tier: ModelTier,
    pub outcome: CompileOutcome,
    pub explanation: TokenStream,
    pub correction: TokenStream,
    pub phase: SessionPhase,
    /// The last stream ended on a transport error; the accumulated text may
    /// be incomplete.
    pub truncated: bool,
    /// Persisting the finished session failed; the in-memory result is
    /// still shown but the history list will not contain it.
    pub save_error: Option<String>,
}

impl SessionState {
    /// Fresh state for a newly submitted source, awaiting the compile check.
    pub fn begin(source: String, tier: ModelTier) -> SessionState {
        SessionState {
            source,
            tier,
            phase: SessionPhase::CheckPending,
            ..SessionState::default()
        }
    }

    /// State seeded from a persisted entry, as if its streams had finished.
    pub fn replay(entry: &HistoryEntry, tier: ModelTier) -> SessionState {
        SessionState {
            source: entry.source.clone(),
            tier,
            outcome: CompileOutcome::from_response(&entry.compiler_output),
            explanation: TokenStream::seed(&entry.explanation),
            correction: TokenStream::seed(&entry.correction),
            phase: SessionPhase::ExplanationDone,
            truncated: false,
            save_error: None,
        }
    }

    /// The record handed to the history store when a stream terminates.
    pub fn to_record(&self) -> ExplanationRecord {
        ExplanationRecord {
            source: self.source.clone(),
            compiler_output: self.outcome.response_text().to_string(),
            explanation: self.explanation.joined(),
            correction: self.correction.joined(),
        }
    }

    /// Correction is offered only after an explanation finished for a
    /// source the compiler rejected.
    pub fn can_request_correction(&self) -> bool {
        self.phase == SessionPhase::ExplanationDone && self.outcome.is_failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn fragments_join_in_arrival_order() {
        let mut stream = TokenStream::default();
        stream.push("t1".to_string());
        stream.push("t2".to_string());
        stream.push("t3".to_string());
        assert_eq!(stream.joined(), "t1 t2 t3");
    }

    #[test]
    fn seed_of_empty_text_stays_empty() {
        assert!(TokenStream::seed("").is_empty());
        let seeded = TokenStream::seed("already joined");
        assert_eq!(seeded.joined(), "already joined");
    }

    #[test]
    fn clear_resets_accumulation() {
        let mut stream = TokenStream::seed("old");
        stream.clear();
        assert!(stream.is_empty());
        assert_eq!(stream.joined(), "");
    }

    #[test]
    fn phase_predicates() {
        assert!(!SessionPhase::Idle.is_busy());
        assert!(SessionPhase::CheckPending.is_busy());
        assert!(!SessionPhase::CheckPending.is_streaming());
        assert!(SessionPhase::Explaining.is_streaming());
        assert!(SessionPhase::Correcting.is_busy());
        assert!(!SessionPhase::ExplanationDone.is_busy());
        assert!(!SessionPhase::CorrectionDone.is_busy());
    }

    #[test]
    fn replay_seeds_outcome_and_streams() {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            source: "class X {}".to_string(),
            compiler_output: "E1".to_string(),
            explanation: "Exp".to_string(),
            correction: "Corr".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let state = SessionState::replay(&entry, ModelTier::Medium);
        assert_eq!(state.phase, SessionPhase::ExplanationDone);
        assert_eq!(state.explanation.joined(), "Exp");
        assert_eq!(state.correction.joined(), "Corr");
        assert!(state.can_request_correction());
        assert_eq!(state.tier, ModelTier::Medium);
    }

    #[test]
    fn record_carries_joined_streams() {
        let mut state = SessionState::begin("class Foo {}".to_string(), ModelTier::Fast);
        state.outcome = CompileOutcome::Success;
        state.explanation.push("a".to_string());
        state.explanation.push("b".to_string());
        let record = state.to_record();
        assert_eq!(record.explanation, "a b");
        assert_eq!(record.correction, "");
        assert_eq!(record.compiler_output, "SUCCESS");
    }

    #[test]
    fn correction_not_offered_after_clean_build() {
        let mut state = SessionState::begin("class Foo {}".to_string(), ModelTier::Fast);
        state.outcome = CompileOutcome::Success;
        state.phase = SessionPhase::ExplanationDone;
        assert!(!state.can_request_correction());
    }
}
