//! Before/after comparison slider.
//!
//! Overlays the traced SVG on the original raster and clips the
//! original to a user-draggable split position, so dragging sweeps
//! between "before" and "after". The split is purely visual state and
//! never triggers reprocessing.

use dioxus::prelude::*;

/// Props for the [`CompareView`] component.
#[derive(Props, Clone, PartialEq)]
pub struct CompareViewProps {
    /// Blob URL of the original uploaded image.
    image_url: String,
    /// SVG document text for the traced result.
    svg: String,
}

/// Split-view comparison of the original image and its vector trace.
#[component]
pub fn CompareView(props: CompareViewProps) -> Element {
    // Split position in percent; start in the middle.
    let mut split = use_signal(|| 50.0_f64);

    let clip = format!("inset(0 {:.1}% 0 0)", 100.0 - split());

    rsx! {
        div { class: "compare",
            div { class: "compare-stage",
                // The traced SVG fills the stage; the original sits on
                // top, clipped to the left of the split line.
                div {
                    class: "compare-after",
                    dangerous_inner_html: "{props.svg}",
                }
                div {
                    class: "compare-before",
                    style: "clip-path: {clip};",
                    img {
                        class: "compare-image",
                        src: "{props.image_url}",
                        alt: "Original image",
                    }
                }
                div {
                    class: "compare-divider",
                    style: "left: {split()}%;",
                }
            }

            div { class: "compare-controls",
                span { class: "compare-caption", "Original" }
                input {
                    r#type: "range",
                    min: "0",
                    max: "100",
                    step: "0.5",
                    value: "{split()}",
                    class: "compare-slider",
                    aria_label: "Comparison split position",
                    oninput: move |e| {
                        if let Ok(v) = e.value().parse::<f64>() {
                            split.set(v.clamp(0.0, 100.0));
                        }
                    },
                }
                span { class: "compare-caption", "Traced" }
            }
        }
    }
}
