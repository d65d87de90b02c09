//! Vectorization method identifiers.
//!
//! The backend exposes a closed set of tracing engines. Everything that
//! is keyed per-method (parameters, results, in-flight bookkeeping)
//! uses [`TraceMethod`] so an unknown method name can never reach the
//! result store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier for one of the backend's tracing engines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TraceMethod {
    /// Classic monochrome bitmap tracer (smooth outlines, single color).
    Potrace,
    /// Color-preserving tracer (stacked color regions).
    Vtracer,
}

impl TraceMethod {
    /// All methods, in display order.
    pub const ALL: [Self; 2] = [Self::Potrace, Self::Vtracer];

    /// Wire name as the backend expects it in form fields and JSON keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Potrace => "potrace",
            Self::Vtracer => "vtracer",
        }
    }

    /// Display label for the method tab.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Potrace => "Potrace",
            Self::Vtracer => "VTracer",
        }
    }

    /// One-line description shown under the method tab.
    #[must_use]
    pub const fn blurb(self) -> &'static str {
        match self {
            Self::Potrace => "Classic black & white tracing",
            Self::Vtracer => "Full-color tracing",
        }
    }
}

impl fmt::Display for TraceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a method name is not in the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vectorization method: {0:?}")]
pub struct UnknownMethod(pub String);

impl FromStr for TraceMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "potrace" => Ok(Self::Potrace),
            "vtracer" => Ok(Self::Vtracer),
            other => Err(UnknownMethod(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_variant() {
        // If you add a variant to TraceMethod, update ALL and this count.
        assert_eq!(TraceMethod::ALL.len(), 2);
        let mut seen = std::collections::HashSet::new();
        for method in TraceMethod::ALL {
            assert!(seen.insert(method), "duplicate method in ALL: {method}");
        }
    }

    #[test]
    fn wire_names_round_trip() {
        for method in TraceMethod::ALL {
            assert_eq!(method.as_str().parse::<TraceMethod>(), Ok(method));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "autotrace".parse::<TraceMethod>();
        assert_eq!(err, Err(UnknownMethod("autotrace".to_owned())));
    }

    #[test]
    fn serde_uses_wire_names() {
        #[allow(clippy::unwrap_used)]
        for method in TraceMethod::ALL {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("{:?}", method.as_str()));
            let back: TraceMethod = serde_json::from_str(&json).unwrap();
            assert_eq!(back, method);
        }
    }
}
