//! senga-core: Reprocessing and retry coordination core (sans-IO).
//!
//! Everything the interactive vectorization client needs to decide
//! *when* to call the backend and *how* to reconcile what comes back:
//! the method enumeration, per-method parameter schemas and storage,
//! the wire protocol types, the result store with its method-key-scoped
//! merge, the progressive-timeout retry policy, the debounce gate, and
//! the session object that ties the decisions together.
//!
//! This crate has **no I/O dependencies** -- it never touches the
//! network, timers, or the DOM. All browser interaction lives in
//! `senga-io`.

pub mod debounce;
pub mod method;
pub mod params;
pub mod protocol;
pub mod retry;
pub mod session;
pub mod store;

pub use debounce::{DebounceGate, DebounceTicket, QUIESCENCE};
pub use method::{TraceMethod, UnknownMethod};
pub use params::{ControlClass, ParamDomain, ParamError, ParamSpec, ParamValue, ParameterSet, schema};
pub use protocol::{ErrorResponse, VectorizeResponse};
pub use retry::{
    RequestError, RequestFailure, RetryPolicy, RetryRun, RetryState, RetryStep,
};
pub use session::{DebounceFire, Dispatch, DisplayState, FullCall, PartialCall, Session};
pub use store::{MethodOutcome, ResultStore};
