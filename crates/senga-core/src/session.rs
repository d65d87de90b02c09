//! The live editing session for one uploaded image.
//!
//! [`Session`] owns everything the coordination protocol needs: the
//! selected method, every method's parameter values, the result store,
//! the debounce gate, and the in-flight bookkeeping. Each mutation
//! returns a [`Dispatch`] decision telling the caller whether to fire a
//! backend call now, arm the debounce timer, or do nothing -- the
//! session itself never performs I/O, so every decision path is
//! testable without a UI or network harness.
//!
//! # Staleness
//!
//! Calls are stamped with the session's asset epoch. Replacing or
//! removing the image bumps the epoch, so a response computed from a
//! previous image can never merge into the current image's results.
//! Within one epoch, late partial responses always merge -- the
//! per-method-key merge makes them harmless regardless of arrival
//! order.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::debounce::{DebounceGate, DebounceTicket};
use crate::method::TraceMethod;
use crate::params::{ControlClass, ParamError, ParamValue, ParameterSet};
use crate::store::{MethodOutcome, ResultStore};

/// Claim on an in-flight full (all-methods) dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullCall {
    epoch: u64,
}

/// Claim on an in-flight single-method dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialCall {
    /// The method this call recomputes.
    pub method: TraceMethod,
    epoch: u64,
}

/// What the caller should do after a session mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No backend call required.
    None,
    /// Fire a single-method call now.
    Now(PartialCall),
    /// Arm a timer for the quiescence window, then call
    /// [`Session::fire_debounce`] with this ticket.
    Later(DebounceTicket),
}

/// Result of a debounce timer expiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceFire {
    /// Dispatch a single-method call now.
    Dispatch(PartialCall),
    /// A call for the method is still in flight; the gate re-armed
    /// itself -- wait another quiescence window with this ticket.
    Rearmed(DebounceTicket),
    /// Superseded or cancelled; do nothing.
    Stale,
}

/// What the result pane should show for the selected method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState<'a> {
    /// No image uploaded yet.
    Empty,
    /// No result computed yet (upload or reprocess underway).
    Processing,
    /// SVG ready to render.
    Ready(&'a str),
    /// The backend reported this method failed.
    Failed(&'a str),
}

/// Live session state and dispatch decisions for one uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    selected: TraceMethod,
    params: ParameterSet,
    results: ResultStore,
    debounce: DebounceGate,
    has_asset: bool,
    epoch: u64,
    full_inflight: bool,
    partials_inflight: BTreeSet<TraceMethod>,
}

impl Session {
    /// Create an empty session with the given default method selected.
    #[must_use]
    pub fn new(default_method: TraceMethod) -> Self {
        Self {
            selected: default_method,
            params: ParameterSet::default(),
            results: ResultStore::default(),
            debounce: DebounceGate::default(),
            has_asset: false,
            epoch: 0,
            full_inflight: false,
            partials_inflight: BTreeSet::new(),
        }
    }

    /// The currently selected method.
    #[must_use]
    pub const fn selected(&self) -> TraceMethod {
        self.selected
    }

    /// Every method's parameter values.
    #[must_use]
    pub const fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// The per-method result store.
    #[must_use]
    pub const fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Whether an image is loaded.
    #[must_use]
    pub const fn has_asset(&self) -> bool {
        self.has_asset
    }

    /// Whether any dispatch is underway or pending -- drives the busy
    /// indicator.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.full_inflight || !self.partials_inflight.is_empty() || self.debounce.is_pending()
    }

    // --- Asset lifecycle ------------------------------------------------

    /// A new image was uploaded (replacing any previous one).
    ///
    /// Cancels any pending debounce, drops all results, invalidates
    /// in-flight calls from the previous image, and claims the full
    /// dispatch the caller must now fire.
    pub fn load_asset(&mut self) -> FullCall {
        self.epoch += 1;
        self.debounce.cancel();
        self.results.clear();
        self.partials_inflight.clear();
        self.has_asset = true;
        self.full_inflight = true;
        FullCall { epoch: self.epoch }
    }

    /// The image was removed. Pending timers are cancelled so nothing
    /// can dispatch against an absent asset.
    pub fn remove_asset(&mut self) {
        self.epoch += 1;
        self.debounce.cancel();
        self.results.clear();
        self.partials_inflight.clear();
        self.has_asset = false;
        self.full_inflight = false;
    }

    // --- Edits ----------------------------------------------------------

    /// Select a method. No-op if already selected; otherwise switches
    /// and dispatches for the newly selected method when an image is
    /// loaded and no full dispatch is in flight. A pending debounce
    /// for the previous selection is left alone -- if it fires it will
    /// target the new selection and coalesce through the in-flight
    /// check.
    pub fn select_method(&mut self, method: TraceMethod) -> Dispatch {
        if method == self.selected {
            return Dispatch::None;
        }
        self.selected = method;
        if !self.has_asset || self.full_inflight {
            return Dispatch::None;
        }
        self.request_single(method)
    }

    /// Validate and store a parameter edit, deciding how to dispatch.
    ///
    /// Continuous controls coalesce through the debounce gate; discrete
    /// controls dispatch immediately. Edits to a non-selected method
    /// are stored but never dispatch (the active UI only exposes the
    /// selected method's controls).
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] when the name or value fails schema
    /// validation; session state is unchanged in that case.
    pub fn edit_parameter(
        &mut self,
        method: TraceMethod,
        name: &str,
        value: ParamValue,
    ) -> Result<Dispatch, ParamError> {
        let spec = self.params.set(method, name, value)?;
        if method != self.selected || !self.has_asset {
            return Ok(Dispatch::None);
        }
        Ok(match spec.control_class() {
            ControlClass::Continuous => Dispatch::Later(self.debounce.schedule()),
            ControlClass::Discrete => self.request_single(method),
        })
    }

    /// Decide how to run a single-method dispatch right now, keeping
    /// the one-outstanding-call-per-method invariant: if a call that
    /// would write this method's slot is already in flight, the request
    /// re-enters the debounce gate instead of firing concurrently.
    fn request_single(&mut self, method: TraceMethod) -> Dispatch {
        if self.full_inflight || self.partials_inflight.contains(&method) {
            return Dispatch::Later(self.debounce.schedule());
        }
        self.partials_inflight.insert(method);
        Dispatch::Now(PartialCall {
            method,
            epoch: self.epoch,
        })
    }

    // --- Debounce expiry ------------------------------------------------

    /// The quiescence timer for `ticket` expired.
    ///
    /// Fires a dispatch for the *currently* selected method if the
    /// ticket is still the latest and an image is present; re-arms when
    /// the method is busy; reports stale tickets so superseded timers
    /// dissolve silently.
    pub fn fire_debounce(&mut self, ticket: DebounceTicket) -> DebounceFire {
        if !self.debounce.try_fire(ticket) {
            return DebounceFire::Stale;
        }
        if !self.has_asset {
            return DebounceFire::Stale;
        }
        match self.request_single(self.selected) {
            Dispatch::Now(call) => DebounceFire::Dispatch(call),
            Dispatch::Later(next) => DebounceFire::Rearmed(next),
            Dispatch::None => DebounceFire::Stale,
        }
    }

    // --- Call completion ------------------------------------------------

    /// Merge a completed full dispatch. Returns false (and changes
    /// nothing) when the call was superseded by a newer upload or
    /// removal.
    pub fn complete_full(
        &mut self,
        call: FullCall,
        outcomes: BTreeMap<TraceMethod, MethodOutcome>,
    ) -> bool {
        if call.epoch != self.epoch {
            return false;
        }
        self.full_inflight = false;
        self.results.apply(outcomes, false);
        true
    }

    /// A full dispatch failed at the request level. Clears the loading
    /// flag; stored results are untouched. Returns false when stale.
    pub fn fail_full(&mut self, call: FullCall) -> bool {
        if call.epoch != self.epoch {
            return false;
        }
        self.full_inflight = false;
        true
    }

    /// Merge a completed single-method dispatch by method key. A late
    /// response for a method that is no longer selected still merges
    /// under its own key. Returns false when the asset changed since
    /// the call began.
    pub fn complete_partial(
        &mut self,
        call: PartialCall,
        outcomes: BTreeMap<TraceMethod, MethodOutcome>,
    ) -> bool {
        if call.epoch != self.epoch {
            return false;
        }
        self.partials_inflight.remove(&call.method);
        self.results.apply(outcomes, true);
        true
    }

    /// A single-method dispatch failed at the request level. Clears the
    /// in-flight claim; stored results are untouched. Returns false
    /// when stale.
    pub fn fail_partial(&mut self, call: PartialCall) -> bool {
        if call.epoch != self.epoch {
            return false;
        }
        self.partials_inflight.remove(&call.method);
        true
    }

    // --- Display --------------------------------------------------------

    /// What to render for the selected method. Never panics, whatever
    /// state the session is in.
    #[must_use]
    pub fn display_state(&self) -> DisplayState<'_> {
        if !self.has_asset {
            return DisplayState::Empty;
        }
        match self.results.outcome(self.selected) {
            None => DisplayState::Processing,
            Some(MethodOutcome::Svg(svg)) => DisplayState::Ready(svg),
            Some(MethodOutcome::Failed(detail)) => DisplayState::Failed(detail),
        }
    }
}
