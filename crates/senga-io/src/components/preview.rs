//! Result preview for the selected method.
//!
//! Dispatches between the placeholder states (nothing uploaded,
//! processing, per-method failure) and the comparison view once an SVG
//! is available. Rendering the backend's SVG text uses
//! `dangerous_inner_html`; the document comes from our own backend,
//! not arbitrary third parties.

use dioxus::prelude::*;
use senga_core::DisplayState;

use super::compare::CompareView;

/// Owned rendering state for the preview pane.
///
/// [`DisplayState`] borrows from the session; component props must own
/// their data, so the app converts at the call site via [`From`].
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewContent {
    /// No image uploaded yet.
    Empty,
    /// Result not computed yet.
    Processing,
    /// SVG ready to render.
    Ready(String),
    /// The backend reported this method failed.
    Failed(String),
}

impl From<DisplayState<'_>> for PreviewContent {
    fn from(state: DisplayState<'_>) -> Self {
        match state {
            DisplayState::Empty => Self::Empty,
            DisplayState::Processing => Self::Processing,
            DisplayState::Ready(svg) => Self::Ready(svg.to_owned()),
            DisplayState::Failed(detail) => Self::Failed(detail.to_owned()),
        }
    }
}

/// Props for the [`ResultPreview`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultPreviewProps {
    /// What to show.
    content: PreviewContent,
    /// Blob URL of the uploaded image, for the comparison overlay.
    image_url: Option<String>,
    /// True while a retry backoff is in progress; shows the attempt
    /// number under the spinner.
    retry_attempt: Option<u32>,
}

/// The main result pane: placeholder, error, or before/after view.
#[component]
pub fn ResultPreview(props: ResultPreviewProps) -> Element {
    match props.content {
        PreviewContent::Empty => rsx! {
            div { class: "preview-placeholder",
                p { class: "preview-hint", "Upload an image to get started" }
            }
        },
        PreviewContent::Processing => rsx! {
            div { class: "preview-placeholder",
                p { class: "preview-processing", "Processing..." }
                if let Some(attempt) = props.retry_attempt {
                    p { class: "preview-retry", "Retrying (attempt {attempt})..." }
                }
            }
        },
        PreviewContent::Failed(detail) => rsx! {
            div { class: "preview-placeholder preview-failed",
                p { class: "preview-error-title", "This method could not trace the image" }
                p { class: "preview-error-detail", "{detail}" }
            }
        },
        PreviewContent::Ready(svg) => {
            if let Some(url) = props.image_url {
                rsx! {
                    CompareView { image_url: url, svg: svg }
                }
            } else {
                // No original to compare against; show the SVG alone.
                rsx! {
                    div {
                        class: "preview-svg",
                        dangerous_inner_html: "{svg}",
                    }
                }
            }
        }
    }
}
