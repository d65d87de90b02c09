//! Fetch transport for the vectorization backend.
//!
//! One function, one attempt: build the multipart form, race the fetch
//! against the attempt's timeout, classify what happened into a
//! [`RequestFailure`]. Retrying is the client's job (`client.rs`);
//! this layer never loops.
//!
//! There is no network-level cancellation: when the timeout wins the
//! race the fetch keeps running in the browser and its eventual result
//! goes unobserved.

use std::time::Duration;

use senga_core::protocol::{
    FIELD_FILE, FIELD_PARAMETERS, FIELD_SELECTED_METHOD, VECTORIZE_PATH,
};
use senga_core::{ErrorResponse, RequestFailure, TraceMethod, VectorizeResponse};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// One outbound vectorization request, borrowed from session state.
#[derive(Debug, Clone, Copy)]
pub struct VectorizePayload<'a> {
    /// Raw bytes of the uploaded image.
    pub image: &'a [u8],
    /// MIME type of the uploaded image (e.g. `image/png`).
    pub content_type: &'a str,
    /// Original filename, forwarded in the multipart part.
    pub filename: &'a str,
    /// Full parameter map as a JSON string (always every method).
    pub parameters_json: &'a str,
    /// Recompute only this method; `None` computes all methods.
    pub selected: Option<TraceMethod>,
}

/// Best-effort human text from a JS error value.
fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Build the multipart form for a payload.
fn build_form(payload: &VectorizePayload<'_>) -> Result<web_sys::FormData, RequestFailure> {
    let form = web_sys::FormData::new()
        .map_err(|e| RequestFailure::Transport(js_message(&e)))?;

    let bytes = js_sys::Uint8Array::from(payload.image);
    let parts = js_sys::Array::new();
    parts.push(&bytes.buffer());
    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type(payload.content_type);
    let blob = web_sys::Blob::new_with_buffer_source_sequence_and_options(&parts, &opts)
        .map_err(|e| RequestFailure::Transport(js_message(&e)))?;

    form.append_with_blob_and_filename(FIELD_FILE, &blob, payload.filename)
        .map_err(|e| RequestFailure::Transport(js_message(&e)))?;
    form.append_with_str(FIELD_PARAMETERS, payload.parameters_json)
        .map_err(|e| RequestFailure::Transport(js_message(&e)))?;
    form.append_with_str(
        FIELD_SELECTED_METHOD,
        payload.selected.map_or("", TraceMethod::as_str),
    )
    .map_err(|e| RequestFailure::Transport(js_message(&e)))?;

    Ok(form)
}

/// A promise that resolves to `undefined` after `timeout` -- raced
/// against the fetch so a stalled backend cannot hang an attempt.
fn timeout_promise(timeout: Duration) -> js_sys::Promise {
    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    wasm_bindgen_futures::future_to_promise(async move {
        gloo_timers::future::TimeoutFuture::new(millis).await;
        Ok(JsValue::UNDEFINED)
    })
}

/// Send one vectorization attempt and classify the outcome.
///
/// # Errors
///
/// Returns a [`RequestFailure`]:
/// - [`Timeout`](RequestFailure::Timeout) when nothing arrived within
///   the attempt window,
/// - [`Transport`](RequestFailure::Transport) when the fetch itself
///   rejected (no HTTP response),
/// - [`Status`](RequestFailure::Status) for non-2xx responses, carrying
///   the server's `detail` when the error body parses,
/// - [`Malformed`](RequestFailure::Malformed) when a 2xx body is not
///   the expected JSON.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
pub async fn send_vectorize(
    endpoint: &str,
    payload: VectorizePayload<'_>,
    timeout: Duration,
) -> Result<VectorizeResponse, RequestFailure> {
    let form = build_form(&payload)?;

    let init = web_sys::RequestInit::new();
    init.set_method("POST");
    init.set_body(form.as_ref());

    let url = format!("{}{VECTORIZE_PATH}", endpoint.trim_end_matches('/'));
    let request = web_sys::Request::new_with_str_and_init(&url, &init)
        .map_err(|e| RequestFailure::Transport(js_message(&e)))?;

    let window = web_sys::window()
        .ok_or_else(|| RequestFailure::Transport("no global window".to_owned()))?;

    let race = js_sys::Promise::race(&js_sys::Array::of2(
        &window.fetch_with_request(&request),
        &timeout_promise(timeout),
    ));

    let settled = JsFuture::from(race)
        .await
        .map_err(|e| RequestFailure::Transport(js_message(&e)))?;

    // The timeout arm resolves to `undefined`; only a real fetch result
    // casts to a Response.
    let response: web_sys::Response = settled
        .dyn_into()
        .map_err(|_| RequestFailure::Timeout(timeout))?;

    let status = response.status();
    let body_promise = response
        .text()
        .map_err(|e| RequestFailure::Malformed(js_message(&e)))?;
    let body = JsFuture::from(body_promise)
        .await
        .map_err(|e| RequestFailure::Malformed(js_message(&e)))?
        .as_string()
        .unwrap_or_default();

    if !(200..300).contains(&status) {
        // FastAPI error bodies are `{"detail": "..."}`; tolerate
        // anything else and fall back to the bare status.
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .and_then(|e| e.detail);
        return Err(RequestFailure::Status { status, detail });
    }

    serde_json::from_str(&body).map_err(|e| RequestFailure::Malformed(e.to_string()))
}
