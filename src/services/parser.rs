//! Parse request client.
//!
//! This module provides:
//! - One-shot POST requests to the parser service from background threads
//! - Cooperative cancellation, so a superseded request never reaches the UI
//!   as anything but [`ParseOutcome::Cancelled`]
//! - A monotonic generation number per request for stale-response filtering
//!
//! The client itself never blocks the caller: `submit` spawns a worker and
//! returns immediately, and the result arrives later through the bridge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::protocol::{self, ParseResponse};
use crate::services::bridge::UiMessage;

/// How a parse request ended.
#[derive(Debug, PartialEq)]
pub enum ParseOutcome {
    /// The service returned a well-formed response.
    Success(ParseResponse),
    /// The request was cancelled before its result was wanted. Not an
    /// error; consumers drop it without any visible effect.
    Cancelled,
    /// The request never produced a usable HTTP response, or the service
    /// answered with an error status.
    TransportError(String),
    /// The service answered 200 but the body failed decoding or the
    /// structural checks.
    InvalidResponse(String),
}

/// Issues parse requests, at most one in flight at a time.
///
/// Submitting a new request first cancels the previous one. Workers
/// deliver their outcome through the bridge sender together with the
/// generation that `submit` returned, and the consumer is expected to
/// ignore any generation other than the latest.
pub struct ParserClient {
    server_url: String,
    timeout: Duration,
    bridge_tx: mpsc::Sender<UiMessage>,
    generation: u64,
    cancel_current: Option<Arc<AtomicBool>>,
}

impl ParserClient {
    pub fn new(server_url: &str, timeout: Duration, bridge_tx: mpsc::Sender<UiMessage>) -> Self {
        ParserClient {
            server_url: server_url.trim_end_matches('/').to_string(),
            timeout,
            bridge_tx,
            generation: 0,
            cancel_current: None,
        }
    }

    /// Generation of the most recently submitted request.
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Cancels the in-flight request and submits `text` as a new one.
    /// Returns the new request's generation.
    pub fn submit(&mut self, text: &str) -> u64 {
        self.cancel_in_flight();

        self.generation += 1;
        let generation = self.generation;
        let cancel = Arc::new(AtomicBool::new(false));
        self.cancel_current = Some(cancel.clone());

        let url = format!("{}/parse", self.server_url);
        let body = text.to_string();
        let timeout = self.timeout;
        let tx = self.bridge_tx.clone();

        tracing::debug!(generation, url = %url, bytes = body.len(), "Submitting parse request");
        thread::spawn(move || {
            let outcome = fetch_parse(&url, &body, timeout, &cancel);
            let _ = tx.send(UiMessage::ParseFinished {
                generation,
                outcome,
            });
        });

        generation
    }

    /// Flags the current request as cancelled, if one is in flight. The
    /// worker notices at its next check and reports `Cancelled`.
    pub fn cancel_in_flight(&mut self) {
        if let Some(cancel) = self.cancel_current.take() {
            tracing::debug!(generation = self.generation, "Cancelling in-flight request");
            cancel.store(true, Ordering::SeqCst);
        }
    }
}

impl Drop for ParserClient {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

/// Performs one parse request (blocking worker side).
///
/// The cancel flag is checked before the request goes out and again after
/// the transport finishes, so a cancellation during the blocking call
/// still wins over whatever the transport returned.
fn fetch_parse(url: &str, body: &str, timeout: Duration, cancel: &AtomicBool) -> ParseOutcome {
    if cancel.load(Ordering::SeqCst) {
        return ParseOutcome::Cancelled;
    }

    let result = ureq::post(url)
        .set("Content-Type", "text/plain; charset=utf-8")
        .set("Cache-Control", "no-cache")
        .timeout(timeout)
        .send_string(body);

    if cancel.load(Ordering::SeqCst) {
        return ParseOutcome::Cancelled;
    }

    match result {
        Ok(response) => {
            let text = match response.into_string() {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!("Failed to read response body: {}", e);
                    return ParseOutcome::TransportError(format!(
                        "failed to read response body: {}",
                        e
                    ));
                }
            };
            decode_response(&text)
        }
        Err(ureq::Error::Status(code, response)) => {
            // The service reports parse problems as an error status with a
            // plain text explanation in the body.
            let detail = response.into_string().unwrap_or_default();
            let detail = detail.trim();
            tracing::debug!(code, detail, "Parser service returned an error status");
            if detail.is_empty() {
                ParseOutcome::TransportError(format!("server returned status {}", code))
            } else {
                ParseOutcome::TransportError(format!("server returned status {}: {}", code, detail))
            }
        }
        Err(e) => {
            tracing::debug!("Parse request failed: {}", e);
            ParseOutcome::TransportError(format!("request failed: {}", e))
        }
    }
}

fn decode_response(body: &str) -> ParseOutcome {
    let response: ParseResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Response body is not a parse response: {}", e);
            return ParseOutcome::InvalidResponse(format!("response is not valid JSON: {}", e));
        }
    };
    match protocol::validate(&response) {
        Ok(()) => ParseOutcome::Success(response),
        Err(reason) => {
            tracing::debug!(reason = %reason, "Response failed structural checks");
            ParseOutcome::InvalidResponse(reason)
        }
    }
}
