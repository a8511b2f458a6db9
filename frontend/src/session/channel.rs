//! Server-push channel over `EventSource`.
//!
//! The only module that touches the transport. One [`StreamChannel`] wraps
//! one live SSE connection and forwards its lifecycle as
//! [`StreamEvent`]s tagged with the channel id; the controller decides what
//! the events mean.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use shared::endpoints;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventSource, MessageEvent};
use yew::Callback;

use super::controller::{ChannelId, StreamEvent, StreamRequest};
use crate::utils;

type SharedSource = Rc<RefCell<Option<EventSource>>>;

/// Owning handle for one server-push connection.
///
/// The registered callbacks live exactly as long as the handle, and the
/// connection is released on every exit path: explicit `close`, the error
/// callback, or drop.
pub struct StreamChannel {
    id: ChannelId,
    source: SharedSource,
    _onopen: Closure<dyn FnMut(Event)>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(Event)>,
}

impl StreamChannel {
    /// Open the connection for `request` and deliver its events, tagged
    /// with `id`, through `on_event`.
    pub fn open(
        id: ChannelId,
        request: &StreamRequest,
        on_event: Callback<(ChannelId, StreamEvent)>,
    ) -> Result<StreamChannel, String> {
        let url = request_url(request);
        let source: SharedSource = Rc::new(RefCell::new(None));
        let saw_fragment = Rc::new(Cell::new(false));

        let onopen: Closure<dyn FnMut(Event)> = {
            let on_event = on_event.clone();
            Closure::new(move |_: Event| {
                on_event.emit((id, StreamEvent::Opened));
            })
        };

        let onmessage: Closure<dyn FnMut(MessageEvent)> = {
            let on_event = on_event.clone();
            let saw_fragment = saw_fragment.clone();
            Closure::new(move |event: MessageEvent| {
                saw_fragment.set(true);
                let fragment = event.data().as_string().unwrap_or_default();
                on_event.emit((id, StreamEvent::Message(fragment)));
            })
        };

        // The browser reports both a server-side end of stream and a real
        // transport failure as `error`, then reconnects on its own. Shut
        // the connection down on the first one and classify it: fragments
        // already delivered mean the stream ran to its end.
        let onerror: Closure<dyn FnMut(Event)> = {
            let source = source.clone();
            Closure::new(move |_: Event| {
                close_source(&source);
                let event = if saw_fragment.get() {
                    StreamEvent::Closed
                } else {
                    StreamEvent::Error
                };
                on_event.emit((id, event));
            })
        };

        let event_source = EventSource::new(&url).map_err(|err| format!("{:?}", err))?;
        event_source.set_onopen(Some(onopen.as_ref().unchecked_ref()));
        event_source.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        event_source.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        *source.borrow_mut() = Some(event_source);

        Ok(StreamChannel {
            id,
            source,
            _onopen: onopen,
            _onmessage: onmessage,
            _onerror: onerror,
        })
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Release the connection. Idempotent, and safe to call from inside an
    /// event handler of this same channel.
    pub fn close(&self) {
        close_source(&self.source);
    }
}

impl Drop for StreamChannel {
    fn drop(&mut self) {
        close_source(&self.source);
    }
}

fn close_source(source: &SharedSource) {
    if let Some(event_source) = source.borrow_mut().take() {
        event_source.set_onopen(None);
        event_source.set_onmessage(None);
        event_source.set_onerror(None);
        event_source.close();
    }
}

fn request_url(request: &StreamRequest) -> String {
    match request {
        StreamRequest::Explanation { source, tier } => utils::api_url_with_query(
            endpoints::EXPLAIN_STREAM,
            &[
                (endpoints::PARAM_TIER, tier.as_str()),
                (endpoints::PARAM_SOURCE, source),
            ],
        ),
        StreamRequest::Correction {
            source,
            diagnostics,
            tier,
        } => utils::api_url_with_query(
            endpoints::CORRECTION_STREAM,
            &[
                (endpoints::PARAM_SOURCE, source),
                (endpoints::PARAM_DIAGNOSTICS, diagnostics),
                (endpoints::PARAM_TIER, tier.as_str()),
            ],
        ),
    }
}
