//! Hook for the cached history snapshot.

use shared::HistoryEntry;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;

/// Return value from the use_history hook.
pub struct UseHistory {
    /// Current snapshot of persisted sessions
    pub entries: Vec<HistoryEntry>,
    /// Whether the initial load is still in flight
    pub loading: bool,
    /// Manually trigger a refresh
    pub refresh: Callback<()>,
}

/// Hook for fetching the history list.
///
/// Fetches once on mount; the list is a snapshot, so callers re-emit
/// `refresh` after every successful persist and when returning to the
/// browse view.
#[hook]
pub fn use_history() -> UseHistory {
    let entries = use_state(Vec::<HistoryEntry>::new);
    let loading = use_state(|| true);
    let refresh_trigger = use_state(|| 0u32);

    // Fetch entries callback
    let fetch_entries = {
        let entries = entries.clone();
        let loading = loading.clone();

        Callback::from(move |set_loading: bool| {
            let entries = entries.clone();
            let loading = loading.clone();

            spawn_local(async move {
                match api::fetch_history().await {
                    Ok(list) => entries.set(list),
                    Err(err) => log::error!("Failed to fetch history: {}", err),
                }
                if set_loading {
                    loading.set(false);
                }
            });
        })
    };

    // Initial fetch
    {
        let fetch_entries = fetch_entries.clone();
        use_effect_with((), move |_| {
            fetch_entries.emit(true);
            || ()
        });
    }

    // Refresh trigger effect
    {
        let fetch_entries = fetch_entries.clone();
        let refresh = *refresh_trigger;
        use_effect_with(refresh, move |_| {
            if refresh > 0 {
                fetch_entries.emit(false);
            }
            || ()
        });
    }

    // Manual refresh callback
    let refresh = {
        let refresh_trigger = refresh_trigger.clone();
        Callback::from(move |_| {
            refresh_trigger.set(*refresh_trigger + 1);
        })
    };

    UseHistory {
        entries: (*entries).clone(),
        loading: *loading,
        refresh,
    }
}
