//! Per-method parameter schemas and typed value storage.
//!
//! The backend validates every parameter against fixed bounds and
//! rejects violations with HTTP 400, so the same bounds live here and
//! the client never sends a request it knows will be refused. Each
//! method has its own fixed, non-overlapping parameter namespace.
//!
//! Parameter values for *every* method persist in a [`ParameterSet`],
//! including methods that are not currently selected -- switching
//! methods must never destroy the other method's slider positions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::method::TraceMethod;

/// A single typed parameter value.
///
/// Serializes untagged so the wire form matches what the backend
/// expects, e.g. `{"turdsize": 2, "turnpolicy": "minority"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// On/off switch.
    Bool(bool),
    /// Whole-number setting.
    Int(i64),
    /// Fractional setting.
    Float(f64),
    /// One of a fixed set of named options.
    Choice(String),
}

impl ParamValue {
    /// Short name of the value's type, for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "number",
            Self::Choice(_) => "option",
        }
    }
}

/// How a parameter's control behaves in the UI, which decides how an
/// edit is dispatched to the backend.
///
/// Continuous controls (sliders) fire many events per user gesture and
/// are debounced; discrete controls (toggles, selects) fire exactly one
/// meaningful event and dispatch immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlClass {
    /// Slider-style control; edits coalesce through the debounce gate.
    Continuous,
    /// Toggle/select-style control; edits dispatch immediately.
    Discrete,
}

/// Value domain of one parameter, with its default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDomain {
    /// Boolean toggle.
    Toggle {
        /// Initial state.
        default: bool,
    },
    /// Integer slider over an inclusive range.
    IntRange {
        /// Lower bound (inclusive).
        min: i64,
        /// Upper bound (inclusive).
        max: i64,
        /// Initial value.
        default: i64,
    },
    /// Float slider over an inclusive range.
    FloatRange {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
        /// Slider step size.
        step: f64,
        /// Initial value.
        default: f64,
    },
    /// Enumerated select.
    Choice {
        /// Allowed option names, in display order.
        options: &'static [&'static str],
        /// Initial option; must be one of `options`.
        default: &'static str,
    },
}

/// Static description of one parameter: wire name, bounds, default,
/// and display strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Wire name used in the request JSON.
    pub name: &'static str,
    /// Display label for the control.
    pub label: &'static str,
    /// Help text shown under the control.
    pub description: &'static str,
    /// Value domain with bounds and default.
    pub domain: ParamDomain,
}

impl ParamSpec {
    /// The parameter's initial value.
    #[must_use]
    pub fn default_value(&self) -> ParamValue {
        match self.domain {
            ParamDomain::Toggle { default } => ParamValue::Bool(default),
            ParamDomain::IntRange { default, .. } => ParamValue::Int(default),
            ParamDomain::FloatRange { default, .. } => ParamValue::Float(default),
            ParamDomain::Choice { default, .. } => ParamValue::Choice(default.to_owned()),
        }
    }

    /// Whether edits to this parameter dispatch immediately or through
    /// the debounce gate.
    #[must_use]
    pub const fn control_class(&self) -> ControlClass {
        match self.domain {
            ParamDomain::IntRange { .. } | ParamDomain::FloatRange { .. } => {
                ControlClass::Continuous
            }
            ParamDomain::Toggle { .. } | ParamDomain::Choice { .. } => ControlClass::Discrete,
        }
    }
}

/// Potrace parameter schema. Bounds mirror the backend's validation.
pub const POTRACE_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "invert",
        label: "Invert",
        description: "Swap dark and light before tracing.",
        domain: ParamDomain::Toggle { default: false },
    },
    ParamSpec {
        name: "turdsize",
        label: "Speckle Size",
        description: "Suppress speckles up to this many pixels.",
        domain: ParamDomain::IntRange {
            min: 0,
            max: 100,
            default: 2,
        },
    },
    ParamSpec {
        name: "turnpolicy",
        label: "Turn Policy",
        description: "How ambiguous path turns are resolved.",
        domain: ParamDomain::Choice {
            options: &[
                "black", "white", "left", "right", "minority", "majority", "random",
            ],
            default: "minority",
        },
    },
    ParamSpec {
        name: "alphamax",
        label: "Corner Threshold",
        description: "Corner rounding. Lower keeps corners sharp.",
        domain: ParamDomain::FloatRange {
            min: 0.0,
            max: 2.0,
            step: 0.05,
            default: 1.0,
        },
    },
    ParamSpec {
        name: "opticurve",
        label: "Optimize Curves",
        description: "Join adjacent Bezier segments where possible.",
        domain: ParamDomain::Toggle { default: true },
    },
];

/// VTracer parameter schema. Bounds mirror the backend's validation.
pub const VTRACER_PARAMS: &[ParamSpec] = &[
    ParamSpec {
        name: "colormode",
        label: "Color Mode",
        description: "Trace in full color or black & white.",
        domain: ParamDomain::Choice {
            options: &["color", "binary"],
            default: "color",
        },
    },
    ParamSpec {
        name: "color_precision",
        label: "Color Precision",
        description: "Significant bits per color channel.",
        domain: ParamDomain::IntRange {
            min: 1,
            max: 8,
            default: 6,
        },
    },
    ParamSpec {
        name: "filter_speckle",
        label: "Filter Speckle",
        description: "Discard patches smaller than this many pixels.",
        domain: ParamDomain::IntRange {
            min: 1,
            max: 100,
            default: 4,
        },
    },
    ParamSpec {
        name: "corner_threshold",
        label: "Corner Threshold",
        description: "Minimum angle (degrees) counted as a corner.",
        domain: ParamDomain::IntRange {
            min: 0,
            max: 180,
            default: 60,
        },
    },
    ParamSpec {
        name: "length_threshold",
        label: "Length Threshold",
        description: "Minimum segment length before subdividing.",
        domain: ParamDomain::FloatRange {
            min: 0.0,
            max: 50.0,
            step: 0.5,
            default: 4.0,
        },
    },
    ParamSpec {
        name: "max_iterations",
        label: "Max Iterations",
        description: "Upper bound on curve-fitting passes.",
        domain: ParamDomain::IntRange {
            min: 1,
            max: 100,
            default: 10,
        },
    },
    ParamSpec {
        name: "splice_threshold",
        label: "Splice Threshold",
        description: "Minimum angle (degrees) for splicing splines.",
        domain: ParamDomain::IntRange {
            min: 0,
            max: 180,
            default: 45,
        },
    },
    ParamSpec {
        name: "path_precision",
        label: "Path Precision",
        description: "Decimal places in emitted path coordinates.",
        domain: ParamDomain::IntRange {
            min: 1,
            max: 10,
            default: 3,
        },
    },
];

/// The parameter schema for a method.
#[must_use]
pub const fn schema(method: TraceMethod) -> &'static [ParamSpec] {
    match method {
        TraceMethod::Potrace => POTRACE_PARAMS,
        TraceMethod::Vtracer => VTRACER_PARAMS,
    }
}

/// Look up one parameter's spec by wire name.
#[must_use]
pub fn spec(method: TraceMethod, name: &str) -> Option<&'static ParamSpec> {
    schema(method).iter().find(|s| s.name == name)
}

/// A rejected parameter edit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// The method has no parameter with this name.
    #[error("{method} has no parameter named {name:?}")]
    UnknownParameter {
        /// Method whose schema was consulted.
        method: TraceMethod,
        /// The rejected name.
        name: String,
    },
    /// The value's type does not match the parameter's domain.
    #[error("{name} expects a {expected} value, got {got}")]
    WrongType {
        /// Parameter wire name.
        name: &'static str,
        /// Expected type name.
        expected: &'static str,
        /// Provided type name.
        got: &'static str,
    },
    /// The value is outside the parameter's inclusive bounds.
    #[error("{name} must be between {min} and {max}")]
    OutOfRange {
        /// Parameter wire name.
        name: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// The value names an option the parameter does not offer.
    #[error("{name} must be one of {options:?}")]
    UnknownChoice {
        /// Parameter wire name.
        name: &'static str,
        /// Allowed options.
        options: &'static [&'static str],
    },
}

/// Validate a value against a spec, coercing where the wire format is
/// forgiving (an integer is accepted for a float parameter).
fn validate(spec: &'static ParamSpec, value: ParamValue) -> Result<ParamValue, ParamError> {
    match (spec.domain, value) {
        (ParamDomain::Toggle { .. }, v @ ParamValue::Bool(_)) => Ok(v),
        (ParamDomain::IntRange { min, max, .. }, ParamValue::Int(n)) => {
            if (min..=max).contains(&n) {
                Ok(ParamValue::Int(n))
            } else {
                #[allow(clippy::cast_precision_loss)]
                let (min, max) = (min as f64, max as f64);
                Err(ParamError::OutOfRange {
                    name: spec.name,
                    min,
                    max,
                })
            }
        }
        (ParamDomain::FloatRange { min, max, .. }, value) => {
            #[allow(clippy::cast_precision_loss)]
            let x = match value {
                ParamValue::Float(x) => x,
                ParamValue::Int(n) => n as f64,
                other => {
                    return Err(ParamError::WrongType {
                        name: spec.name,
                        expected: "number",
                        got: other.kind(),
                    });
                }
            };
            if x.is_finite() && (min..=max).contains(&x) {
                Ok(ParamValue::Float(x))
            } else {
                Err(ParamError::OutOfRange {
                    name: spec.name,
                    min,
                    max,
                })
            }
        }
        (ParamDomain::Choice { options, .. }, ParamValue::Choice(s)) => {
            if options.contains(&s.as_str()) {
                Ok(ParamValue::Choice(s))
            } else {
                Err(ParamError::UnknownChoice {
                    name: spec.name,
                    options,
                })
            }
        }
        (domain, other) => {
            let expected = match domain {
                ParamDomain::Toggle { .. } => "boolean",
                ParamDomain::IntRange { .. } => "integer",
                ParamDomain::FloatRange { .. } => "number",
                ParamDomain::Choice { .. } => "option",
            };
            Err(ParamError::WrongType {
                name: spec.name,
                expected,
                got: other.kind(),
            })
        }
    }
}

/// Every method's parameter values, keyed by method then wire name.
///
/// The full set is always sent to the backend, regardless of which
/// method a dispatch recomputes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    values: BTreeMap<TraceMethod, BTreeMap<String, ParamValue>>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        let values = TraceMethod::ALL
            .into_iter()
            .map(|method| {
                let defaults = schema(method)
                    .iter()
                    .map(|s| (s.name.to_owned(), s.default_value()))
                    .collect();
                (method, defaults)
            })
            .collect();
        Self { values }
    }
}

impl ParameterSet {
    /// Current value of one parameter.
    #[must_use]
    pub fn get(&self, method: TraceMethod, name: &str) -> Option<&ParamValue> {
        self.values.get(&method).and_then(|m| m.get(name))
    }

    /// Validate and store a new value, returning the parameter's spec
    /// so the caller can inspect its control class.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] if the name is unknown for the method or
    /// the value fails type/bounds validation; the stored value is left
    /// unchanged in that case.
    pub fn set(
        &mut self,
        method: TraceMethod,
        name: &str,
        value: ParamValue,
    ) -> Result<&'static ParamSpec, ParamError> {
        let spec = spec(method, name).ok_or_else(|| ParamError::UnknownParameter {
            method,
            name: name.to_owned(),
        })?;
        let value = validate(spec, value)?;
        self.values
            .entry(method)
            .or_default()
            .insert(spec.name.to_owned(), value);
        Ok(spec)
    }

    /// The full parameter map as the backend's `parameters` form field,
    /// e.g. `{"potrace":{...},"vtracer":{...}}`.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialization fails (only
    /// possible if a float value is non-finite, which validation
    /// prevents).
    pub fn to_wire(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn schemas_have_unique_names() {
        for method in TraceMethod::ALL {
            let mut seen = std::collections::HashSet::new();
            for s in schema(method) {
                assert!(seen.insert(s.name), "{method}: duplicate parameter {}", s.name);
            }
        }
    }

    #[test]
    fn choice_defaults_are_listed_options() {
        for method in TraceMethod::ALL {
            for s in schema(method) {
                if let ParamDomain::Choice { options, default } = s.domain {
                    assert!(
                        options.contains(&default),
                        "{method}.{}: default {default:?} not in options",
                        s.name
                    );
                }
            }
        }
    }

    #[test]
    fn defaults_validate_against_their_own_spec() {
        for method in TraceMethod::ALL {
            for s in schema(method) {
                assert!(
                    validate(s, s.default_value()).is_ok(),
                    "{method}.{} default fails its own bounds",
                    s.name
                );
            }
        }
    }

    #[test]
    fn default_set_covers_every_parameter() {
        let set = ParameterSet::default();
        for method in TraceMethod::ALL {
            for s in schema(method) {
                assert_eq!(set.get(method, s.name), Some(&s.default_value()));
            }
        }
    }

    #[test]
    fn set_accepts_in_range_values() {
        let mut set = ParameterSet::default();
        set.set(TraceMethod::Potrace, "turdsize", ParamValue::Int(50))
            .unwrap();
        assert_eq!(
            set.get(TraceMethod::Potrace, "turdsize"),
            Some(&ParamValue::Int(50))
        );
    }

    #[test]
    fn set_rejects_out_of_range() {
        let mut set = ParameterSet::default();
        let err = set
            .set(TraceMethod::Potrace, "turdsize", ParamValue::Int(101))
            .unwrap_err();
        assert!(matches!(err, ParamError::OutOfRange { name: "turdsize", .. }));
        // Stored value untouched.
        assert_eq!(
            set.get(TraceMethod::Potrace, "turdsize"),
            Some(&ParamValue::Int(2))
        );
    }

    #[test]
    fn set_rejects_unknown_parameter() {
        let mut set = ParameterSet::default();
        let err = set
            .set(TraceMethod::Vtracer, "turdsize", ParamValue::Int(2))
            .unwrap_err();
        assert!(matches!(err, ParamError::UnknownParameter { .. }));
    }

    #[test]
    fn set_rejects_wrong_type() {
        let mut set = ParameterSet::default();
        let err = set
            .set(TraceMethod::Potrace, "invert", ParamValue::Int(1))
            .unwrap_err();
        assert!(matches!(
            err,
            ParamError::WrongType {
                name: "invert",
                expected: "boolean",
                ..
            }
        ));
    }

    #[test]
    fn set_rejects_unknown_choice() {
        let mut set = ParameterSet::default();
        let err = set
            .set(
                TraceMethod::Potrace,
                "turnpolicy",
                ParamValue::Choice("diagonal".to_owned()),
            )
            .unwrap_err();
        assert!(matches!(err, ParamError::UnknownChoice { name: "turnpolicy", .. }));
    }

    #[test]
    fn float_parameter_accepts_integer_value() {
        let mut set = ParameterSet::default();
        set.set(TraceMethod::Potrace, "alphamax", ParamValue::Int(1))
            .unwrap();
        assert_eq!(
            set.get(TraceMethod::Potrace, "alphamax"),
            Some(&ParamValue::Float(1.0))
        );
    }

    #[test]
    fn editing_one_method_leaves_the_other_untouched() {
        let mut set = ParameterSet::default();
        set.set(TraceMethod::Vtracer, "color_precision", ParamValue::Int(8))
            .unwrap();
        // Potrace values persist unchanged.
        for s in POTRACE_PARAMS {
            assert_eq!(set.get(TraceMethod::Potrace, s.name), Some(&s.default_value()));
        }
    }

    #[test]
    fn wire_form_is_keyed_by_method_name() {
        let set = ParameterSet::default();
        let json: serde_json::Value =
            serde_json::from_str(&set.to_wire().unwrap()).unwrap();
        assert!(json.get("potrace").is_some());
        assert!(json.get("vtracer").is_some());
        assert_eq!(json["potrace"]["turnpolicy"], "minority");
        assert_eq!(json["vtracer"]["color_precision"], 6);
        assert_eq!(json["potrace"]["opticurve"], true);
    }

    #[test]
    fn sliders_are_continuous_and_toggles_discrete() {
        assert_eq!(
            spec(TraceMethod::Potrace, "turdsize").unwrap().control_class(),
            ControlClass::Continuous
        );
        assert_eq!(
            spec(TraceMethod::Potrace, "invert").unwrap().control_class(),
            ControlClass::Discrete
        );
        assert_eq!(
            spec(TraceMethod::Vtracer, "colormode").unwrap().control_class(),
            ControlClass::Discrete
        );
        assert_eq!(
            spec(TraceMethod::Vtracer, "length_threshold")
                .unwrap()
                .control_class(),
            ControlClass::Continuous
        );
    }
}
