//! Export panel with the SVG download button.

use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::LdDownload;
use dioxus_free_icons::Icon;

use crate::download;

/// Props for the [`ExportPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ExportPanelProps {
    /// The SVG to export. `None` disables the button.
    svg: Option<String>,
    /// Base filename (without extension) for the download.
    filename: String,
}

/// Download button for the selected method's SVG result.
#[component]
pub fn ExportPanel(props: ExportPanelProps) -> Element {
    let has_result = props.svg.is_some();
    let mut export_error = use_signal(|| Option::<String>::None);

    // Clear stale export errors when the result changes.
    let result_present = props.svg.is_some();
    use_effect(move || {
        // Subscribe to result_present so this fires on each change.
        let _ = result_present;
        export_error.set(None);
    });

    let svg_click = {
        let svg = props.svg.clone();
        let filename = props.filename;
        move |_| {
            if let Some(ref svg) = svg {
                match download::download_svg(svg, &filename) {
                    Ok(()) => export_error.set(None),
                    Err(e) => export_error.set(Some(format!("Download failed: {e}"))),
                }
            }
        }
    };

    rsx! {
        div { class: "export-panel",
            h3 { class: "panel-title", "Export" }

            if let Some(ref err) = export_error() {
                p { class: "export-error", "{err}" }
            }

            button {
                class: if has_result { "btn btn-primary" } else { "btn btn-disabled" },
                disabled: !has_result,
                onclick: svg_click,
                Icon { icon: LdDownload, width: 16, height: 16 }
                "Download SVG"
            }
        }
    }
}
