//! Browsable list of persisted sessions.

use shared::HistoryEntry;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::utils::truncate_lines;

/// Lines of each field shown before a preview is cut off.
const PREVIEW_LINES: usize = 3;

#[derive(Properties, PartialEq)]
pub struct HistoryListProps {
    pub entries: Vec<HistoryEntry>,
    pub loading: bool,
    /// Emitted with the entry the user double-clicked.
    pub on_pick: Callback<HistoryEntry>,
}

/// Read-only projection of the history store; double-click loads an entry
/// back into the editor.
#[function_component(HistoryList)]
pub fn history_list(props: &HistoryListProps) -> Html {
    if props.loading {
        return html! { <p class="history-empty">{ "Loading history..." }</p> };
    }
    if props.entries.is_empty() {
        return html! { <p class="history-empty">{ "No sessions recorded yet" }</p> };
    }

    html! {
        <ul class="history-list">
            { for props.entries.iter().map(|entry| render_entry(entry, &props.on_pick)) }
        </ul>
    }
}

fn render_entry(entry: &HistoryEntry, on_pick: &Callback<HistoryEntry>) -> Html {
    let ondblclick = {
        let on_pick = on_pick.clone();
        let picked = entry.clone();
        Callback::from(move |_: MouseEvent| on_pick.emit(picked.clone()))
    };

    html! {
        <li key={entry.id.to_string()} class="history-entry" {ondblclick}>
            <div class="history-field">
                <strong>{ "Source" }</strong>
                <pre class="history-source">{ truncate_lines(&entry.source, PREVIEW_LINES) }</pre>
            </div>
            <div class="history-field">
                <strong>{ "Diagnostics" }</strong>
                <p class="history-diagnostics">{ truncate_lines(&entry.compiler_output, PREVIEW_LINES) }</p>
            </div>
            <div class="history-field">
                <strong>{ "Explanation" }</strong>
                <p>{ truncate_lines(&entry.explanation, PREVIEW_LINES) }</p>
            </div>
            if !entry.correction.is_empty() {
                <div class="history-field">
                    <strong>{ "Correction" }</strong>
                    <p class="history-correction">{ truncate_lines(&entry.correction, PREVIEW_LINES) }</p>
                </div>
            }
        </li>
    }
}
