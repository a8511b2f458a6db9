//! ExplainView component - the editor plus the streaming workflow.
//!
//! Owns the [`SessionController`] and interprets its effects: one-shot
//! compile checks and history appends go out through `spawn_local`, stream
//! channels are opened/closed here, and a stall watchdog wraps every open
//! channel with a deadline the transport itself does not provide.

use gloo::timers::callback::Timeout;
use shared::{CompileOutcome, HistoryEntry, ModelTier};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::api;
use crate::session::{
    ChannelId, Effect, SessionController, SessionPhase, SessionState, StreamChannel, StreamEvent,
};

/// Milliseconds without a fragment before an open stream is abandoned.
const STREAM_STALL_TIMEOUT_MS: u32 = 120_000;

/// localStorage key remembering the selected model tier.
const TIER_STORAGE_KEY: &str = "explain-model-tier";

/// Props for the ExplainView component
#[derive(Properties, PartialEq)]
pub struct ExplainViewProps {
    /// Persisted entry to replay instead of starting empty.
    #[prop_or_default]
    pub entry: Option<HistoryEntry>,
    /// Emitted after a session was appended to history.
    pub on_saved: Callback<()>,
    /// Emitted when the user navigates back to the history browser.
    pub on_back: Callback<()>,
}

/// Messages for the ExplainView component
pub enum ExplainViewMsg {
    UpdateSource(String),
    SelectTier(ModelTier),
    Submit,
    RequestCorrection,
    CheckResolved { seq: u64, outcome: CompileOutcome },
    Stream(ChannelId, StreamEvent),
    StreamStalled(ChannelId),
    Saved,
    SaveFailed(String),
    Back,
}

pub struct ExplainView {
    controller: SessionController,
    /// Live transport handle; `None` whenever no stream is open.
    channel: Option<StreamChannel>,
    stall_timer: Option<Timeout>,
    /// Editor contents; becomes the session source on submit.
    source_input: String,
    tier: ModelTier,
}

impl Component for ExplainView {
    type Message = ExplainViewMsg;
    type Properties = ExplainViewProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut controller = SessionController::new();
        let tier = load_tier();
        let mut source_input = String::new();

        if let Some(entry) = &ctx.props().entry {
            source_input = entry.source.clone();
            // Replay path: a fresh controller has nothing to close, so
            // there are no effects to run.
            controller.load_entry(entry, tier);
        }

        Self {
            controller,
            channel: None,
            stall_timer: None,
            source_input,
            tier,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            ExplainViewMsg::UpdateSource(value) => {
                self.source_input = value;
                true
            }
            ExplainViewMsg::SelectTier(tier) => {
                self.tier = tier;
                save_tier(tier);
                true
            }
            ExplainViewMsg::Submit => {
                if self.source_input.trim().is_empty() {
                    return false;
                }
                let effects = self
                    .controller
                    .submit(self.source_input.clone(), self.tier);
                self.run_effects(ctx, effects);
                true
            }
            ExplainViewMsg::RequestCorrection => {
                let effects = self.controller.request_correction();
                self.run_effects(ctx, effects);
                true
            }
            ExplainViewMsg::CheckResolved { seq, outcome } => {
                let effects = self.controller.check_resolved(seq, outcome);
                self.run_effects(ctx, effects);
                true
            }
            ExplainViewMsg::Stream(channel, event) => {
                let rearm = matches!(event, StreamEvent::Message(_));
                let effects = self.controller.stream_event(channel, event);
                if rearm && self.holds_channel(channel) {
                    self.arm_stall_timer(ctx, channel);
                }
                self.run_effects(ctx, effects);
                true
            }
            ExplainViewMsg::StreamStalled(channel) => {
                // Deadline wrapper around the transport: close the hung
                // channel and feed the controller a synthesized error so a
                // silent stream cannot pin the session open forever.
                if self.holds_channel(channel) {
                    log::warn!("stream stalled, abandoning channel");
                    let effects = self.controller.stream_event(channel, StreamEvent::Error);
                    self.run_effects(ctx, effects);
                    true
                } else {
                    false
                }
            }
            ExplainViewMsg::Saved => {
                ctx.props().on_saved.emit(());
                false
            }
            ExplainViewMsg::SaveFailed(message) => {
                self.controller.persistence_failed(message);
                true
            }
            ExplainViewMsg::Back => {
                ctx.props().on_back.emit(());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let state = self.controller.state();
        let busy = state.phase.is_busy();

        let oninput = link.callback(|e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            ExplainViewMsg::UpdateSource(input.value())
        });
        let on_tier_change = link.callback(|e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            ExplainViewMsg::SelectTier(ModelTier::from_param(&select.value()))
        });
        let on_submit = link.callback(|_: MouseEvent| ExplainViewMsg::Submit);
        let on_correction = link.callback(|_: MouseEvent| ExplainViewMsg::RequestCorrection);
        let on_back = link.callback(|_: MouseEvent| ExplainViewMsg::Back);

        html! {
            <div class="explain-view">
                <h2>{ "Explain a snippet" }</h2>

                <textarea
                    class="source-editor"
                    rows="8"
                    placeholder="Paste the source to explain"
                    value={self.source_input.clone()}
                    oninput={oninput}
                    disabled={busy}
                />

                { render_outcome(state) }
                { render_streams(state) }

                <label for="tier-select">{ "Model tier" }</label>
                <select id="tier-select" onchange={on_tier_change} disabled={busy}>
                    { for ModelTier::ALL.iter().map(|tier| html! {
                        <option value={tier.as_str()} selected={*tier == self.tier}>
                            { tier.as_str() }
                        </option>
                    }) }
                </select>

                <div class="action-row">
                    <button class="submit-button" onclick={on_submit} disabled={busy}>
                        { "Check & explain" }
                        if matches!(state.phase, SessionPhase::CheckPending | SessionPhase::Explaining) {
                            <span class="spinner" role="status" aria-hidden="true"></span>
                        }
                    </button>
                    <button
                        class="correction-button"
                        onclick={on_correction}
                        disabled={!state.can_request_correction()}
                    >
                        { "Stream a correction" }
                        if state.phase == SessionPhase::Correcting {
                            <span class="spinner" role="status" aria-hidden="true"></span>
                        }
                    </button>
                    <button class="back-button" onclick={on_back} disabled={busy}>
                        { "History" }
                    </button>
                </div>
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        // Tearing the view down must release any live connection.
        if let Some(handle) = self.channel.take() {
            handle.close();
        }
    }
}

impl ExplainView {
    fn holds_channel(&self, channel: ChannelId) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|handle| handle.id() == channel)
    }

    fn run_effects(&mut self, ctx: &Context<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchCheck { seq, source } => {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        let outcome = api::compile_check(&source).await;
                        link.send_message(ExplainViewMsg::CheckResolved { seq, outcome });
                    });
                }
                Effect::OpenStream { channel, request } => {
                    // A leftover handle here would mean two live
                    // connections; drop it before opening.
                    if let Some(stale) = self.channel.take() {
                        stale.close();
                    }
                    let link = ctx.link().clone();
                    let on_event = Callback::from(move |(id, event)| {
                        link.send_message(ExplainViewMsg::Stream(id, event));
                    });
                    match StreamChannel::open(channel, &request, on_event) {
                        Ok(handle) => {
                            self.channel = Some(handle);
                            self.arm_stall_timer(ctx, channel);
                        }
                        Err(err) => {
                            log::error!("failed to open stream: {}", err);
                            ctx.link()
                                .send_message(ExplainViewMsg::Stream(channel, StreamEvent::Error));
                        }
                    }
                }
                Effect::CloseStream { channel } => {
                    if self.holds_channel(channel) {
                        if let Some(handle) = self.channel.take() {
                            handle.close();
                        }
                    }
                    self.stall_timer = None;
                }
                Effect::Persist { record } => {
                    let link = ctx.link().clone();
                    spawn_local(async move {
                        match api::save_record(&record).await {
                            Ok(_) => link.send_message(ExplainViewMsg::Saved),
                            Err(err) => {
                                link.send_message(ExplainViewMsg::SaveFailed(err.to_string()))
                            }
                        }
                    });
                }
            }
        }
    }

    fn arm_stall_timer(&mut self, ctx: &Context<Self>, channel: ChannelId) {
        let link = ctx.link().clone();
        self.stall_timer = Some(Timeout::new(STREAM_STALL_TIMEOUT_MS, move || {
            link.send_message(ExplainViewMsg::StreamStalled(channel));
        }));
    }
}

fn render_outcome(state: &SessionState) -> Html {
    match &state.outcome {
        CompileOutcome::Pending => {
            if state.phase == SessionPhase::CheckPending {
                html! { <div class="outcome outcome-pending">{ "Checking compilation..." }</div> }
            } else {
                html! {}
            }
        }
        CompileOutcome::Success => html! {
            <div class="outcome outcome-success">{ "Compilation succeeded" }</div>
        },
        CompileOutcome::Failure(diagnostics) => html! {
            <div class="outcome outcome-failure">
                <h5>{ "Compiler diagnostics" }</h5>
                <pre>{ diagnostics.clone() }</pre>
            </div>
        },
    }
}

fn render_streams(state: &SessionState) -> Html {
    html! {
        <>
            if !state.explanation.is_empty() {
                <div class="stream-panel explanation-panel">
                    <h5>{ "Explanation" }</h5>
                    <pre>{ state.explanation.joined() }</pre>
                </div>
            }
            if !state.correction.is_empty() {
                <div class="stream-panel correction-panel">
                    <h5>{ "Correction" }</h5>
                    <pre>{ state.correction.joined() }</pre>
                </div>
            }
            if state.truncated {
                <div class="banner banner-truncated">
                    { "The stream ended unexpectedly; the result may be incomplete." }
                </div>
            }
            if let Some(error) = &state.save_error {
                <div class="banner banner-save-error">
                    { format!("Saving to history failed: {}", error) }
                </div>
            }
        </>
    }
}

/// Load the last selected model tier from localStorage
fn load_tier() -> ModelTier {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(TIER_STORAGE_KEY).ok().flatten())
        .map(|value| ModelTier::from_param(&value))
        .unwrap_or_default()
}

/// Save the selected model tier to localStorage
fn save_tier(tier: ModelTier) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(TIER_STORAGE_KEY, tier.as_str());
    }
}
