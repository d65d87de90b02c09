//! End-to-end coordination scenarios at the session level.
//!
//! These drive the session, store, debounce gate, and retry machinery
//! together the way the app does, without a UI or network harness: the
//! "timer" is firing tickets by hand and the "network" is feeding
//! failures and responses directly.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::collections::BTreeMap;
use std::time::Duration;

use senga_core::{
    DebounceFire, Dispatch, DisplayState, MethodOutcome, ParamValue, RequestError,
    RequestFailure, RetryPolicy, RetryRun, RetryState, RetryStep, Session, TraceMethod,
    VectorizeResponse,
};

fn svg_map(pairs: &[(TraceMethod, &str)]) -> BTreeMap<TraceMethod, MethodOutcome> {
    pairs
        .iter()
        .map(|&(m, text)| (m, MethodOutcome::from_wire(text)))
        .collect()
}

/// A slider drag (many rapid edits) ends in exactly one dispatch, and
/// the dispatch carries the selected method.
#[test]
fn slider_drag_produces_one_dispatch() {
    let mut session = Session::new(TraceMethod::Vtracer);
    let full = session.load_asset();
    session.complete_full(full, svg_map(&[(TraceMethod::Vtracer, "<svg>v</svg>")]));

    let mut tickets = Vec::new();
    for value in 1..=8 {
        let dispatch = session
            .edit_parameter(TraceMethod::Vtracer, "color_precision", ParamValue::Int(value))
            .unwrap();
        match dispatch {
            Dispatch::Later(ticket) => tickets.push(ticket),
            other => panic!("slider edits must debounce, got {other:?}"),
        }
    }

    let fired: Vec<_> = tickets
        .into_iter()
        .filter_map(|t| match session.fire_debounce(t) {
            DebounceFire::Dispatch(call) => Some(call),
            _ => None,
        })
        .collect();

    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].method, TraceMethod::Vtracer);

    // The dispatch resolves with only the recomputed method; the store
    // merge leaves nothing else disturbed and the value it carries wins.
    session.complete_partial(fired[0], svg_map(&[(TraceMethod::Vtracer, "<svg>v8</svg>")]));
    assert_eq!(session.display_state(), DisplayState::Ready("<svg>v8</svg>"));
}

/// Switch away while a dispatch is in flight, dispatch
/// for the new method, and let the first response arrive late. Both
/// methods end up with their own correct result.
#[test]
fn method_switch_during_inflight_dispatch_is_safe() {
    let mut session = Session::new(TraceMethod::Potrace);
    let full = session.load_asset();
    session.complete_full(
        full,
        svg_map(&[
            (TraceMethod::Potrace, "<svg>p1</svg>"),
            (TraceMethod::Vtracer, "<svg>v1</svg>"),
        ]),
    );

    // A discrete potrace edit dispatches immediately.
    let Dispatch::Now(potrace_call) = session
        .edit_parameter(TraceMethod::Potrace, "invert", ParamValue::Bool(true))
        .unwrap()
    else {
        panic!("discrete edits dispatch immediately");
    };

    // Switch to vtracer before potrace resolves; the switch dispatches
    // independently for vtracer.
    let Dispatch::Now(vtracer_call) = session.select_method(TraceMethod::Vtracer) else {
        panic!("method switch dispatches for the new method");
    };

    // Responses arrive out of order.
    assert!(session.complete_partial(vtracer_call, svg_map(&[(TraceMethod::Vtracer, "<svg>v2</svg>")])));
    assert!(session.complete_partial(potrace_call, svg_map(&[(TraceMethod::Potrace, "<svg>p2</svg>")])));

    // The late potrace response merged under its own key and did not
    // clobber vtracer's newer, independently computed result.
    assert_eq!(
        session.results().outcome(TraceMethod::Potrace),
        Some(&MethodOutcome::Svg("<svg>p2</svg>".to_owned()))
    );
    assert_eq!(session.display_state(), DisplayState::Ready("<svg>v2</svg>"));
}

/// The retry schedule a flaky backend observes: progressive timeouts,
/// tabulated backoffs, idle state after terminal success.
#[test]
fn flaky_backend_sees_the_documented_schedule() {
    let mut run = RetryRun::new(RetryPolicy::default());
    let mut timeouts = Vec::new();
    let mut waits = Vec::new();

    // Two retryable failures, then success on the third attempt.
    for _ in 0..2 {
        timeouts.push(run.current_timeout());
        match run.on_failure(RequestFailure::Timeout(run.current_timeout())) {
            RetryStep::Backoff(delay) => {
                assert!(run.state().waiting);
                waits.push(delay);
                run.resume();
            }
            RetryStep::GiveUp(err) => panic!("unexpected give-up: {err}"),
        }
    }
    timeouts.push(run.current_timeout());
    run.on_success();

    assert_eq!(
        timeouts,
        [
            Duration::from_millis(60_000),
            Duration::from_millis(90_000),
            Duration::from_millis(120_000),
        ]
    );
    assert_eq!(waits, [Duration::from_millis(2_000), Duration::from_millis(5_000)]);
    assert_eq!(run.state(), RetryState::default());
}

/// A 400-class response is attempted exactly once and never enters the
/// backoff wait.
#[test]
fn client_error_response_never_retries() {
    let mut run = RetryRun::new(RetryPolicy::default());
    let step = run.on_failure(RequestFailure::Status {
        status: 400,
        detail: Some("File must be an image".to_owned()),
    });
    let RetryStep::GiveUp(err) = step else {
        panic!("a 4xx must not retry");
    };
    assert_eq!(err.user_message(), "File must be an image");
    assert_eq!(run.state(), RetryState::default());
}

/// With a two-attempt budget, two retryable failures terminate with the
/// last underlying failure and an idle retry state.
#[test]
fn exhausted_retries_surface_the_last_failure() {
    let mut run = RetryRun::new(RetryPolicy { max_attempts: 2 });

    assert!(matches!(
        run.on_failure(RequestFailure::Transport("connection refused".into())),
        RetryStep::Backoff(_)
    ));
    run.resume();

    let step = run.on_failure(RequestFailure::Timeout(Duration::from_secs(90)));
    let RetryStep::GiveUp(RequestError::Exhausted { attempts, last }) = step else {
        panic!("expected exhausted retries");
    };
    assert_eq!(attempts, 2);
    assert_eq!(last, RequestFailure::Timeout(Duration::from_secs(90)));
    assert_eq!(run.state(), RetryState::default());
}

/// A request-level failure during reprocessing leaves every stored
/// result readable; a per-method failure in an otherwise good response
/// replaces only its own slot.
#[test]
fn failures_never_destroy_unrelated_results() {
    let mut session = Session::new(TraceMethod::Potrace);
    let full = session.load_asset();
    session.complete_full(
        full,
        svg_map(&[
            (TraceMethod::Potrace, "<svg>p</svg>"),
            (TraceMethod::Vtracer, "<svg>v</svg>"),
        ]),
    );

    // Request-level failure: nothing in the store changes.
    let Dispatch::Now(call) = session
        .edit_parameter(TraceMethod::Potrace, "invert", ParamValue::Bool(true))
        .unwrap()
    else {
        panic!("discrete edits dispatch immediately");
    };
    session.fail_partial(call);
    assert_eq!(session.display_state(), DisplayState::Ready("<svg>p</svg>"));

    // Per-method failure: stored like a success, scoped to its key.
    let Dispatch::Now(call) = session
        .edit_parameter(TraceMethod::Potrace, "opticurve", ParamValue::Bool(false))
        .unwrap()
    else {
        panic!("discrete edits dispatch immediately");
    };
    session.complete_partial(
        call,
        svg_map(&[(TraceMethod::Potrace, "Error: Potrace processing failed: exit 1")]),
    );
    assert_eq!(
        session.display_state(),
        DisplayState::Failed("Potrace processing failed: exit 1")
    );
    assert_eq!(
        session.results().outcome(TraceMethod::Vtracer),
        Some(&MethodOutcome::Svg("<svg>v</svg>".to_owned()))
    );
}

/// Parsing a backend response and pushing it through the session: the
/// whole pipeline from JSON to display state.
#[test]
fn response_json_flows_through_to_display() {
    let body = r#"{
        "success": true,
        "vectorized": {
            "potrace": "<svg>traced</svg>",
            "vtracer": "Error: VTracer processing failed: unsupported mode"
        }
    }"#;
    let response: VectorizeResponse = serde_json::from_str(body).unwrap();

    let mut session = Session::new(TraceMethod::Potrace);
    let full = session.load_asset();
    session.complete_full(full, response.outcomes());

    assert_eq!(session.display_state(), DisplayState::Ready("<svg>traced</svg>"));
    session.select_method(TraceMethod::Vtracer);
    assert_eq!(
        session.display_state(),
        DisplayState::Failed("VTracer processing failed: unsupported mode")
    );
}
