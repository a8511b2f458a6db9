//! Endpoint contract shared with the explanation service.
//!
//! The client consumes four collaborators: a one-shot compile check, two
//! server-sent-event streams, and the history store. Paths and query
//! parameter names are pinned here so the URL-building code cannot drift
//! from the service routes.

/// One-shot compile check: `GET {COMPILE_CHECK}?source=...` returns plain
/// text (`"SUCCESS"` or compiler diagnostics).
pub const COMPILE_CHECK: &str = "/api/check";

/// Explanation stream: `GET {EXPLAIN_STREAM}?tier=...&source=...` as SSE;
/// each `message` event carries one explanation fragment.
pub const EXPLAIN_STREAM: &str = "/api/explain";

/// Correction stream: `GET {CORRECTION_STREAM}?source=...&diagnostics=...&tier=...`
/// as SSE; each `message` event carries one correction fragment.
pub const CORRECTION_STREAM: &str = "/api/correct";

/// History store: `GET {HISTORY}` lists entries, `POST {HISTORY}` appends a
/// completed record and returns the stored entry.
pub const HISTORY: &str = "/api/history";

pub const PARAM_SOURCE: &str = "source";
pub const PARAM_TIER: &str = "tier";
pub const PARAM_DIAGNOSTICS: &str = "diagnostics";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_stable() {
        assert_eq!(COMPILE_CHECK, "/api/check");
        assert_eq!(EXPLAIN_STREAM, "/api/explain");
        assert_eq!(CORRECTION_STREAM, "/api/correct");
        assert_eq!(HISTORY, "/api/history");
    }
}
