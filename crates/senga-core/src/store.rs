//! Result reconciliation store.
//!
//! The single source of truth for "what vector output currently exists
//! for each method". Partial (single-method) responses merge by method
//! key; only a full dispatch may replace the whole map. A request-level
//! failure never touches stored results.

use std::collections::BTreeMap;

use crate::method::TraceMethod;

/// Prefix the backend uses to tag a per-method computation failure
/// inside an otherwise successful response.
pub const ERROR_PREFIX: &str = "Error:";

/// Outcome of one method's tracing run.
///
/// A failed method is stored exactly like a successful one -- the
/// success/failure distinction is a value-level tag, not a separate
/// channel -- so one engine failing never disturbs the other's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodOutcome {
    /// Tracing succeeded; the SVG document text.
    Svg(String),
    /// The backend reported this method failed; human-readable detail.
    Failed(String),
}

impl MethodOutcome {
    /// Classify one slot of the backend's `vectorized` map.
    #[must_use]
    pub fn from_wire(text: &str) -> Self {
        match text.strip_prefix(ERROR_PREFIX) {
            Some(detail) => {
                let detail = detail.trim();
                if detail.is_empty() {
                    Self::Failed(text.to_owned())
                } else {
                    Self::Failed(detail.to_owned())
                }
            }
            None => Self::Svg(text.to_owned()),
        }
    }

    /// The SVG text, if tracing succeeded.
    #[must_use]
    pub fn svg(&self) -> Option<&str> {
        match self {
            Self::Svg(svg) => Some(svg),
            Self::Failed(_) => None,
        }
    }
}

/// Per-method vector outputs for the current asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultStore {
    results: BTreeMap<TraceMethod, MethodOutcome>,
}

impl ResultStore {
    /// Reconcile a response into the store.
    ///
    /// `partial = true` (single-method dispatch): every method key in
    /// `outcomes` overwrites its own entry; all other entries are left
    /// byte-identical. `partial = false` (full dispatch): the whole map
    /// is replaced -- methods absent from the response revert to
    /// not-computed.
    pub fn apply(&mut self, outcomes: BTreeMap<TraceMethod, MethodOutcome>, partial: bool) {
        if partial {
            for (method, outcome) in outcomes {
                self.results.insert(method, outcome);
            }
        } else {
            self.results = outcomes;
        }
    }

    /// Stored outcome for a method, if one has been computed.
    #[must_use]
    pub fn outcome(&self, method: TraceMethod) -> Option<&MethodOutcome> {
        self.results.get(&method)
    }

    /// Drop every stored result (asset replaced or removed).
    pub fn clear(&mut self) {
        self.results.clear();
    }

    /// Number of methods with a stored outcome.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no method has a stored outcome.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
