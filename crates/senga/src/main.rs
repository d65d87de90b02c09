use std::rc::Rc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use senga_core::{
    DebounceFire, DebounceTicket, Dispatch, FullCall, ParamValue, PartialCall, RetryState,
    Session, TraceMethod, QUIESCENCE,
};
use senga_io::{
    asset, ExportPanel, ImageUpload, MethodControls, MethodTabs, PreviewContent, ResultPreview,
    VectorizeClient, VectorizePayload,
};

/// Backend base URL. Override at build time with `SENGA_BACKEND_URL`.
const BACKEND_URL: &str = match option_env!("SENGA_BACKEND_URL") {
    Some(url) => url,
    None => "http://localhost:8000",
};

/// Which engine a fresh session starts on.
const DEFAULT_METHOD: TraceMethod = TraceMethod::Vtracer;

/// The uploaded image plus its display handle.
struct UploadedImage {
    bytes: Vec<u8>,
    /// Full filename, forwarded in the multipart part.
    filename: String,
    /// Filename without extension, used for exports.
    stem: String,
    content_type: String,
    /// Object URL for `<img>` display; revoked on replace/remove.
    blob_url: String,
}

fn main() {
    dioxus::launch(app);
}

/// Root application component.
///
/// The [`Session`] signal is the single source of truth for selection,
/// parameters, and results; every handler routes its mutation through
/// the session and acts on the returned dispatch decision.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let mut session = use_signal(|| Session::new(DEFAULT_METHOD));
    let mut image = use_signal(|| Option::<Rc<UploadedImage>>::None);
    let retry = use_signal(RetryState::default);
    let mut error = use_signal(|| Option::<String>::None);

    // --- Upload handler: full dispatch for the new image ---
    let on_upload = move |(bytes, name, mime): (Vec<u8>, String, String)| {
        let blob_url = match asset::image_blob_url(&bytes, &mime) {
            Ok(url) => url,
            Err(e) => {
                error.set(Some(format!("Could not load image: {e}")));
                return;
            }
        };
        if let Some(prev) = image.peek().as_ref() {
            asset::revoke_blob_url(&prev.blob_url);
        }
        let stem = name
            .rsplit_once('.')
            .map_or(name.as_str(), |(base, _)| base)
            .to_owned();
        let uploaded = Rc::new(UploadedImage {
            bytes,
            filename: name,
            stem,
            content_type: mime,
            blob_url,
        });
        image.set(Some(Rc::clone(&uploaded)));
        error.set(None);

        let call = session.write().load_asset();
        spawn(run_call(session, uploaded, retry, error, CallKind::Full(call)));
    };

    // --- Remove handler: tear the session down ---
    let on_remove = move |_| {
        if let Some(prev) = image.peek().as_ref() {
            asset::revoke_blob_url(&prev.blob_url);
        }
        image.set(None);
        session.write().remove_asset();
        error.set(None);
    };

    // --- Method switch ---
    let on_select = move |method: TraceMethod| {
        let dispatch = session.write().select_method(method);
        handle_dispatch(session, image, retry, error, dispatch);
    };

    // --- Parameter edit ---
    let on_edit = move |(method, name, value): (TraceMethod, String, ParamValue)| {
        let result = session.write().edit_parameter(method, &name, value);
        match result {
            Ok(dispatch) => handle_dispatch(session, image, retry, error, dispatch),
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    // --- Derived view state ---
    let content = PreviewContent::from(session.read().display_state());
    let selected = session.read().selected();
    let params = session.read().params().clone();
    let busy = session.read().is_busy();
    let export_svg = session
        .read()
        .results()
        .outcome(selected)
        .and_then(|o| o.svg().map(str::to_owned));
    let has_image = image.read().is_some();
    let image_url = image.read().as_ref().map(|i| i.blob_url.clone());
    let export_name = image
        .read()
        .as_ref()
        .map_or_else(|| "vectorized".to_owned(), |i| format!("{}-{selected}", i.stem));
    let retry_state = retry();
    let retry_attempt =
        (retry_state.waiting || retry_state.attempt > 1).then_some(retry_state.attempt);

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/style.css") }

        div { class: "app",
            header { class: "app-header",
                h1 { class: "app-title", "senga" }
                p { class: "app-tagline", "Trace raster images into SVG vector art" }
            }

            div { class: "app-main",
                // Left: result stage
                div { class: "app-stage",
                    ResultPreview {
                        content: content,
                        image_url: image_url,
                        retry_attempt: retry_attempt,
                    }

                    if let Some(ref err) = error() {
                        div { class: "error-banner",
                            p { "{err}" }
                        }
                    }

                    if busy && has_image {
                        p { class: "busy-note", "Updating trace..." }
                    }
                }

                // Right: method tabs, controls, export
                if has_image {
                    aside { class: "app-sidebar",
                        MethodTabs {
                            selected: selected,
                            on_select: on_select,
                        }

                        div { class: "panel",
                            h3 { class: "panel-title", "{selected.label()} Settings" }
                            MethodControls {
                                method: selected,
                                params: params,
                                on_edit: on_edit,
                            }
                        }

                        ExportPanel {
                            svg: export_svg,
                            filename: export_name,
                        }

                        button {
                            class: "btn btn-ghost",
                            onclick: on_remove,
                            "Remove image"
                        }
                    }
                }
            }

            // Footer: upload zone (compact once an image is loaded)
            div { class: "app-footer",
                ImageUpload {
                    on_upload: on_upload,
                    compact: has_image,
                }
            }
        }
    }
}

/// Which kind of backend call a task is running.
#[derive(Clone, Copy)]
enum CallKind {
    Full(FullCall),
    Partial(PartialCall),
}

/// Act on a session dispatch decision: fire a call now, arm the
/// debounce timer, or do nothing.
fn handle_dispatch(
    mut session: Signal<Session>,
    image: Signal<Option<Rc<UploadedImage>>>,
    retry: Signal<RetryState>,
    error: Signal<Option<String>>,
    dispatch: Dispatch,
) {
    match dispatch {
        Dispatch::None => {}
        Dispatch::Now(call) => {
            let img = image.peek().clone();
            if let Some(img) = img {
                spawn(run_call(session, img, retry, error, CallKind::Partial(call)));
            } else {
                // No asset to send; release the claim.
                session.write().fail_partial(call);
            }
        }
        Dispatch::Later(ticket) => {
            spawn(run_debounced(session, image, retry, error, ticket));
        }
    }
}

/// Wait out the quiescence window, then dispatch for whichever method
/// is selected when the timer fires. Superseded timers dissolve
/// silently; a busy method re-arms for another window.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
async fn run_debounced(
    mut session: Signal<Session>,
    image: Signal<Option<Rc<UploadedImage>>>,
    retry: Signal<RetryState>,
    error: Signal<Option<String>>,
    ticket: DebounceTicket,
) {
    let mut ticket = ticket;
    loop {
        let millis = u32::try_from(QUIESCENCE.as_millis()).unwrap_or(500);
        TimeoutFuture::new(millis).await;

        let fired = session.write().fire_debounce(ticket);
        match fired {
            DebounceFire::Dispatch(call) => {
                let img = image.peek().clone();
                if let Some(img) = img {
                    run_call(session, img, retry, error, CallKind::Partial(call)).await;
                } else {
                    session.write().fail_partial(call);
                }
                return;
            }
            DebounceFire::Rearmed(next) => ticket = next,
            DebounceFire::Stale => return,
        }
    }
}

/// Run one backend call to completion and reconcile the outcome into
/// the session. Stale completions (superseded asset) change nothing.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
async fn run_call(
    mut session: Signal<Session>,
    image: Rc<UploadedImage>,
    mut retry: Signal<RetryState>,
    mut error: Signal<Option<String>>,
    call: CallKind,
) {
    let wire = session.peek().params().to_wire();
    let params_json = match wire {
        Ok(json) => json,
        Err(e) => {
            release_claim(&mut session, call);
            error.set(Some(format!("Internal error: {e}")));
            return;
        }
    };
    let selected = match call {
        CallKind::Full(_) => None,
        CallKind::Partial(partial) => Some(partial.method),
    };

    let client = VectorizeClient::new(BACKEND_URL);
    let payload = VectorizePayload {
        image: &image.bytes,
        content_type: &image.content_type,
        filename: &image.filename,
        parameters_json: &params_json,
        selected,
    };
    let outcome = client.vectorize(payload, move |state| retry.set(state)).await;

    match (call, outcome) {
        (CallKind::Full(full), Ok(response)) => {
            if session.write().complete_full(full, response.outcomes()) {
                error.set(None);
            }
        }
        (CallKind::Partial(partial), Ok(response)) => {
            if session.write().complete_partial(partial, response.outcomes()) {
                error.set(None);
            }
        }
        (CallKind::Full(full), Err(e)) => {
            if session.write().fail_full(full) {
                error.set(Some(e.user_message()));
            }
        }
        (CallKind::Partial(partial), Err(e)) => {
            if session.write().fail_partial(partial) {
                error.set(Some(e.user_message()));
            }
        }
    }
}

/// Release an in-flight claim without a network round trip (the call
/// never left the client).
fn release_claim(session: &mut Signal<Session>, call: CallKind) {
    match call {
        CallKind::Full(full) => {
            session.write().fail_full(full);
        }
        CallKind::Partial(partial) => {
            session.write().fail_partial(partial);
        }
    }
}
