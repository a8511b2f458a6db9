//! HTTP adapters for the compile-check and history collaborators.
//!
//! Everything here is fire-and-interpret: callers get either a domain value
//! or an [`ApiError`]; nothing panics on a misbehaving service.

use gloo_net::http::Request;
use shared::api::ApiError;
use shared::{endpoints, CompileOutcome, ExplanationRecord, HistoryEntry};

use crate::utils;

/// Run the one-shot compile check for `source`.
///
/// A transport failure or error status never blocks the workflow: it
/// collapses to [`CompileOutcome::unavailable`], which keeps the session
/// moving and the correction path open.
pub async fn compile_check(source: &str) -> CompileOutcome {
    let url =
        utils::api_url_with_query(endpoints::COMPILE_CHECK, &[(endpoints::PARAM_SOURCE, source)]);
    let response = match Request::get(&url).send().await {
        Ok(response) => response,
        Err(err) => {
            log::error!("compile check request failed: {:?}", err);
            return CompileOutcome::unavailable();
        }
    };
    if !response.ok() {
        log::error!("compile check returned status {}", response.status());
        return CompileOutcome::unavailable();
    }
    match response.text().await {
        Ok(body) => CompileOutcome::from_response(&body),
        Err(err) => {
            log::error!("compile check body unreadable: {:?}", err);
            CompileOutcome::unavailable()
        }
    }
}

/// Fetch the history snapshot.
pub async fn fetch_history() -> Result<Vec<HistoryEntry>, ApiError> {
    let url = utils::api_url(endpoints::HISTORY);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(ApiError::Server {
            status: response.status(),
            message: response.status_text(),
        });
    }
    response
        .json::<Vec<HistoryEntry>>()
        .await
        .map_err(|err| ApiError::Parse(err.to_string()))
}

/// Append a finished session to the history store.
pub async fn save_record(record: &ExplanationRecord) -> Result<HistoryEntry, ApiError> {
    let url = utils::api_url(endpoints::HISTORY);
    let request = Request::post(&url)
        .json(record)
        .map_err(|err| ApiError::Parse(err.to_string()))?;
    let response = request
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(ApiError::Server {
            status: response.status(),
            message: response.status_text(),
        });
    }
    response
        .json::<HistoryEntry>()
        .await
        .map_err(|err| ApiError::Parse(err.to_string()))
}
