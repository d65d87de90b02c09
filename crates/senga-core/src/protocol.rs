//! Wire types for the vectorization backend.
//!
//! The backend takes a `multipart/form-data` POST and answers with a
//! JSON body whose `vectorized` map carries one entry per computed
//! method: SVG text on success, or a string tagged with the
//! [`ERROR_PREFIX`](crate::store::ERROR_PREFIX) when that engine
//! failed. Metadata fields are echoed best-effort and default to empty
//! when absent.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::method::TraceMethod;
use crate::store::MethodOutcome;

/// Path of the vectorize endpoint relative to the backend root.
pub const VECTORIZE_PATH: &str = "/vectorize";

/// Form field carrying the image payload.
pub const FIELD_FILE: &str = "file";
/// Form field carrying the full parameter map as a JSON string.
pub const FIELD_PARAMETERS: &str = "parameters";
/// Form field naming the single method to recompute; empty means all.
pub const FIELD_SELECTED_METHOD: &str = "selected_method";

/// Successful response body from the vectorize endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VectorizeResponse {
    /// Always true on 200s; tolerated when absent.
    #[serde(default)]
    pub success: bool,
    /// Data URL of the uploaded image, echoed back for display.
    #[serde(default)]
    pub original_image: Option<String>,
    /// Method name -> SVG text or `"Error:"`-tagged failure string.
    #[serde(default)]
    pub vectorized: BTreeMap<String, String>,
    /// The parameter map the backend actually applied.
    #[serde(default)]
    pub parameters_used: Option<serde_json::Value>,
}

impl VectorizeResponse {
    /// Convert the raw `vectorized` map into typed per-method outcomes.
    ///
    /// Keys outside the method enumeration are dropped: the result
    /// store must never hold a method the client does not know.
    #[must_use]
    pub fn outcomes(&self) -> BTreeMap<TraceMethod, MethodOutcome> {
        self.vectorized
            .iter()
            .filter_map(|(name, text)| {
                TraceMethod::from_str(name)
                    .ok()
                    .map(|method| (method, MethodOutcome::from_wire(text)))
            })
            .collect()
    }
}

/// Error body the backend sends alongside non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable failure description.
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn response_parses_the_backend_shape() {
        let body = r#"{
            "success": true,
            "original_image": "data:image/png;base64,AAAA",
            "vectorized": {
                "potrace": "<svg>p</svg>",
                "vtracer": "Error: VTracer processing failed: bad image"
            },
            "parameters_used": {"potrace": {"turdsize": 2}}
        }"#;
        let response: VectorizeResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);

        let outcomes = response.outcomes();
        assert_eq!(
            outcomes.get(&TraceMethod::Potrace),
            Some(&MethodOutcome::Svg("<svg>p</svg>".to_owned()))
        );
        assert_eq!(
            outcomes.get(&TraceMethod::Vtracer),
            Some(&MethodOutcome::Failed(
                "VTracer processing failed: bad image".to_owned()
            ))
        );
    }

    #[test]
    fn response_tolerates_missing_metadata() {
        let response: VectorizeResponse =
            serde_json::from_str(r#"{"vectorized": {"potrace": "<svg/>"}}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.original_image, None);
        assert_eq!(response.outcomes().len(), 1);
    }

    #[test]
    fn unknown_method_keys_are_dropped() {
        let response: VectorizeResponse = serde_json::from_str(
            r#"{"vectorized": {"potrace": "<svg/>", "autotrace": "<svg/>"}}"#,
        )
        .unwrap();
        let outcomes = response.outcomes();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes.contains_key(&TraceMethod::Potrace));
    }

    #[test]
    fn error_body_detail_is_optional() {
        let with: ErrorResponse =
            serde_json::from_str(r#"{"detail": "File must be an image"}"#).unwrap();
        assert_eq!(with.detail.as_deref(), Some("File must be an image"));

        let without: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(without.detail, None);
    }
}
