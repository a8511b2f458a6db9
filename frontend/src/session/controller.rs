//! Controller for the explain-then-correct workflow.
//!
//! The controller is a pure machine: user intents and transport events go
//! in, [`SessionState`] mutations happen, and [`Effect`]s come out for the
//! view layer to execute. Nothing here touches the DOM or the network,
//! which is what keeps the whole workflow testable off-browser.

use shared::{CompileOutcome, ExplanationRecord, HistoryEntry, ModelTier};

use super::state::{SessionPhase, SessionState};

/// Identity of one opened stream channel.
///
/// Every open allocates a fresh id and events are tagged with it, so a
/// late or duplicate event from a channel that is no longer live is
/// recognizably stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelId(u64);

/// Lifecycle events a stream channel delivers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Opened,
    /// One text fragment pushed by the service.
    Message(String),
    /// Transport-level failure; the stream will deliver nothing more.
    Error,
    /// Normal end of stream.
    Closed,
}

/// Parameters for opening a stream channel, one variant per stream kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamRequest {
    Explanation {
        source: String,
        tier: ModelTier,
    },
    Correction {
        source: String,
        diagnostics: String,
        tier: ModelTier,
    },
}

/// Side effects the view layer carries out after feeding the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the one-shot compile check and report back with the same `seq`.
    FetchCheck { seq: u64, source: String },
    /// Open a stream channel under the given id.
    OpenStream {
        channel: ChannelId,
        request: StreamRequest,
    },
    /// Release the transport handle for the given id.
    CloseStream { channel: ChannelId },
    /// Append the finished session to the history store.
    Persist { record: ExplanationRecord },
}

/// Drives [`SessionState`] through the workflow phases.
///
/// Invariant: at most one channel id is live at any time; a live channel
/// only exists in the `Explaining` and `Correcting` phases.
#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
    active_channel: Option<ChannelId>,
    next_channel: u64,
    check_seq: u64,
}

impl SessionController {
    pub fn new() -> SessionController {
        SessionController::default()
    }

    /// Read-only snapshot for rendering.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Start a new session for `source`. Ignored while the current session
    /// is busy; from a done phase it abandons the old session.
    pub fn submit(&mut self, source: String, tier: ModelTier) -> Vec<Effect> {
        if self.state.phase.is_busy() {
            log::debug!("submit ignored: session is busy");
            return Vec::new();
        }
        self.check_seq += 1;
        self.state = SessionState::begin(source.clone(), tier);
        vec![Effect::FetchCheck {
            seq: self.check_seq,
            source,
        }]
    }

    /// Deliver the compile-check result. The explanation stream opens
    /// whatever the outcome was; a response with a stale `seq`, or one
    /// arriving outside `CheckPending`, is dropped.
    pub fn check_resolved(&mut self, seq: u64, outcome: CompileOutcome) -> Vec<Effect> {
        if self.state.phase != SessionPhase::CheckPending || seq != self.check_seq {
            log::debug!("stale compile-check response ignored");
            return Vec::new();
        }
        self.state.outcome = outcome;
        self.state.explanation.clear();
        self.state.phase = SessionPhase::Explaining;
        let channel = self.allocate_channel();
        vec![Effect::OpenStream {
            channel,
            request: StreamRequest::Explanation {
                source: self.state.source.clone(),
                tier: self.state.tier,
            },
        }]
    }

    /// Open the correction stream. Only permitted right after an
    /// explanation finished for a rejected source; everywhere else the
    /// request is dropped (the UI disables the button, but double-clicks
    /// and stale views happen).
    pub fn request_correction(&mut self) -> Vec<Effect> {
        if self.active_channel.is_some() || !self.state.can_request_correction() {
            log::debug!("correction request ignored in phase {:?}", self.state.phase);
            return Vec::new();
        }
        let diagnostics = match &self.state.outcome {
            CompileOutcome::Failure(diagnostics) => diagnostics.clone(),
            _ => return Vec::new(),
        };
        self.state.correction.clear();
        self.state.truncated = false;
        self.state.phase = SessionPhase::Correcting;
        let channel = self.allocate_channel();
        vec![Effect::OpenStream {
            channel,
            request: StreamRequest::Correction {
                source: self.state.source.clone(),
                diagnostics,
                tier: self.state.tier,
            },
        }]
    }

    /// Deliver a transport event. Events for anything but the live channel
    /// are dropped: that covers duplicate terminal events, events racing a
    /// close, and handles left over from a previous stream.
    pub fn stream_event(&mut self, channel: ChannelId, event: StreamEvent) -> Vec<Effect> {
        if self.active_channel != Some(channel) {
            log::debug!("event for stale channel ignored: {:?}", event);
            return Vec::new();
        }
        match event {
            StreamEvent::Opened => {
                log::debug!("stream opened in phase {:?}", self.state.phase);
                Vec::new()
            }
            StreamEvent::Message(fragment) => {
                match self.state.phase {
                    SessionPhase::Explaining => self.state.explanation.push(fragment),
                    SessionPhase::Correcting => self.state.correction.push(fragment),
                    // Unreachable while the channel is live; fragments are
                    // never retracted, so late ones are simply dropped.
                    _ => log::warn!("fragment outside a streaming phase dropped"),
                }
                Vec::new()
            }
            StreamEvent::Error => self.finish_stream(channel, true),
            StreamEvent::Closed => self.finish_stream(channel, false),
        }
    }

    /// Seed the session from a persisted entry. Opens nothing and never
    /// persists; an entry loaded from history is already stored.
    pub fn load_entry(&mut self, entry: &HistoryEntry, tier: ModelTier) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(channel) = self.active_channel.take() {
            effects.push(Effect::CloseStream { channel });
        }
        self.state = SessionState::replay(entry, tier);
        effects
    }

    /// Record a failed history append. In-memory state is kept; only the
    /// banner flag changes.
    pub fn persistence_failed(&mut self, message: String) {
        log::error!("failed to persist session: {}", message);
        self.state.save_error = Some(message);
    }

    /// Both terminal transport events land here: the phase advances and
    /// the finished session is persisted either way, with a transport
    /// error additionally flagging the result as possibly incomplete.
    fn finish_stream(&mut self, channel: ChannelId, truncated: bool) -> Vec<Effect> {
        self.active_channel = None;
        self.state.truncated = truncated;
        self.state.phase = match self.state.phase {
            SessionPhase::Explaining => SessionPhase::ExplanationDone,
            SessionPhase::Correcting => SessionPhase::CorrectionDone,
            phase => phase,
        };
        vec![
            Effect::CloseStream { channel },
            Effect::Persist {
                record: self.state.to_record(),
            },
        ]
    }

    fn allocate_channel(&mut self) -> ChannelId {
        self.next_channel += 1;
        let id = ChannelId(self.next_channel);
        self.active_channel = Some(id);
        id
    }
}
