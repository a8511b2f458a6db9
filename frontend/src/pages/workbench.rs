//! Workbench page - switches between the history browser and the editor.

use shared::HistoryEntry;
use web_sys::MouseEvent;
use yew::prelude::*;

use super::explain_view::ExplainView;
use crate::components::HistoryList;
use crate::hooks::use_history;

/// Which of the two views the page shows.
#[derive(Clone, PartialEq)]
enum Mode {
    /// Browsing persisted sessions.
    Browse,
    /// Editing/streaming, optionally seeded from a picked entry.
    Compose(Option<HistoryEntry>),
}

#[function_component(WorkbenchPage)]
pub fn workbench_page() -> Html {
    let history = use_history();
    let mode = use_state(|| Mode::Browse);

    let on_new = {
        let mode = mode.clone();
        Callback::from(move |_: MouseEvent| mode.set(Mode::Compose(None)))
    };

    let on_pick = {
        let mode = mode.clone();
        Callback::from(move |entry: HistoryEntry| mode.set(Mode::Compose(Some(entry))))
    };

    // Leaving the editor re-reads the snapshot so a session persisted
    // while composing shows up immediately.
    let on_back = {
        let mode = mode.clone();
        let refresh = history.refresh.clone();
        Callback::from(move |_| {
            refresh.emit(());
            mode.set(Mode::Browse);
        })
    };

    let on_saved = {
        let refresh = history.refresh.clone();
        Callback::from(move |_| refresh.emit(()))
    };

    match (*mode).clone() {
        Mode::Browse => html! {
            <div class="workbench workbench-browse">
                <header class="workbench-header">
                    <h2>{ "History" }</h2>
                    <button class="new-snippet-button" onclick={on_new}>
                        { "New snippet" }
                    </button>
                </header>
                <HistoryList
                    entries={history.entries.clone()}
                    loading={history.loading}
                    {on_pick}
                />
            </div>
        },
        Mode::Compose(entry) => html! {
            <div class="workbench workbench-compose">
                <ExplainView {entry} {on_saved} {on_back} />
            </div>
        },
    }
}
